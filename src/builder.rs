//! Interactive assembly of one employee record.
//!
//! Assembly is a linear state machine:
//!
//! ```text
//! AwaitingName -> AwaitingIdentifier -> AwaitingEmail -> AwaitingPhone
//!   -> AwaitingDepartment -> AwaitingRole -> AwaitingSalary -> Complete
//! ```
//!
//! Each state owns an `accept_*` transition that turns one line of input into
//! either an accepted value or a retry message. The driver re-prompts on retry
//! forever; only end of input leaves a state without accepting.
//!
//! A duplicate query that cannot complete yields a warning (value kept) or a
//! retry (value dropped) depending on the checker's policy.
//!
//! Department and role are both numbered choices, but only department falls
//! back to free text. Salary is the one optional field and never re-prompts.
use crate::duplicate::{DuplicateCheck, DuplicateChecker};
use crate::prompt::Prompter;
use crate::record::{field, EmployeeRecord, DEPARTMENTS, ROLES};
use crate::render;
use crate::validate::{
    is_all_digits, normalize_email, normalize_identifier, normalize_phone, parse_salary,
    title_case, validate_email, validate_identifier_format, validate_name,
};
use anyhow::{anyhow, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    AwaitingName,
    AwaitingIdentifier,
    AwaitingEmail,
    AwaitingPhone,
    AwaitingDepartment,
    AwaitingRole,
    AwaitingSalary,
    Complete,
}

impl BuildState {
    pub fn next(self) -> Self {
        match self {
            BuildState::AwaitingName => BuildState::AwaitingIdentifier,
            BuildState::AwaitingIdentifier => BuildState::AwaitingEmail,
            BuildState::AwaitingEmail => BuildState::AwaitingPhone,
            BuildState::AwaitingPhone => BuildState::AwaitingDepartment,
            BuildState::AwaitingDepartment => BuildState::AwaitingRole,
            BuildState::AwaitingRole => BuildState::AwaitingSalary,
            BuildState::AwaitingSalary | BuildState::Complete => BuildState::Complete,
        }
    }

    fn prompt(self) -> &'static str {
        match self {
            BuildState::AwaitingName => "Full name: ",
            BuildState::AwaitingIdentifier => "PF number (employee ID): ",
            BuildState::AwaitingEmail => "Email address: ",
            BuildState::AwaitingPhone => "Phone number: ",
            BuildState::AwaitingDepartment => "Select department (1-8) or type custom: ",
            BuildState::AwaitingRole => "Select role (1-4): ",
            BuildState::AwaitingSalary => "Monthly salary (optional, press Enter to skip): ",
            BuildState::Complete => "",
        }
    }

    fn options(self) -> Option<(&'static str, &'static [&'static str])> {
        match self {
            BuildState::AwaitingDepartment => {
                Some(("Department options:", DEPARTMENTS.as_slice()))
            }
            BuildState::AwaitingRole => Some(("Role options:", ROLES.as_slice())),
            _ => None,
        }
    }
}

/// Result of feeding one line of input to a state.
#[derive(Debug, PartialEq)]
pub enum Step<T> {
    Accept(T),
    /// Accepted, but the operator should see the message.
    Warn(T, String),
    Retry(String),
}

fn retry<T>(message: &str) -> Step<T> {
    Step::Retry(message.to_string())
}

pub fn accept_name(input: &str) -> Step<String> {
    if validate_name(input) {
        Step::Accept(input.trim().to_string())
    } else {
        retry("Name must be at least 2 characters long")
    }
}

pub fn accept_identifier(input: &str, checker: &DuplicateChecker) -> Step<String> {
    let pf_number = normalize_identifier(input);
    if !validate_identifier_format(&pf_number) {
        return retry("PF Number must be 3-20 alphanumeric characters");
    }
    require_unique(pf_number, field::PF_NUMBER, "PF Number", checker)
}

pub fn accept_email(input: &str, checker: &DuplicateChecker) -> Step<String> {
    let email = normalize_email(input);
    if !validate_email(&email) {
        return retry("Please enter a valid email address");
    }
    require_unique(email, field::EMAIL, "Email", checker)
}

fn require_unique(
    value: String,
    field: &str,
    label: &str,
    checker: &DuplicateChecker,
) -> Step<String> {
    match checker.check(field, &value) {
        DuplicateCheck::Unique => Step::Accept(value),
        DuplicateCheck::Duplicate => Step::Retry(format!("{label} already exists in database")),
        DuplicateCheck::Unverified(err) if checker.rejects_unverified() => Step::Retry(format!(
            "Could not verify {label} is unique ({err}); try again"
        )),
        DuplicateCheck::Unverified(err) => {
            Step::Warn(value, format!("Could not check for duplicates: {err}"))
        }
    }
}

pub fn accept_phone(input: &str, country_code: &str) -> Step<String> {
    match normalize_phone(input.trim(), country_code) {
        Some(phone) => Step::Accept(phone),
        None => retry("Please enter a valid phone number (10-15 digits)"),
    }
}

/// Numbered selection, or any non-numeric text title-cased.
pub fn accept_department(input: &str) -> Step<String> {
    let choice = input.trim();
    if is_all_digits(choice) {
        return match pick(choice, &DEPARTMENTS) {
            Some(department) => Step::Accept(department.to_string()),
            None => retry("Please select a valid option or enter custom department"),
        };
    }
    if choice.is_empty() {
        return retry("Please select a valid option or enter custom department");
    }
    Step::Accept(title_case(choice))
}

/// Numbered selection only; there is no free-text role.
pub fn accept_role(input: &str) -> Step<String> {
    match pick(input.trim(), &ROLES) {
        Some(role) => Step::Accept(role.to_string()),
        None => retry("Please select a valid role (1-4)"),
    }
}

/// Anything that is not a plain non-negative decimal skips the field.
pub fn accept_salary(input: &str) -> Option<f64> {
    parse_salary(input)
}

fn pick<'o>(choice: &str, options: &[&'o str]) -> Option<&'o str> {
    if !is_all_digits(choice) {
        return None;
    }
    let index: usize = choice.parse().ok()?;
    index.checked_sub(1).and_then(|i| options.get(i)).copied()
}

#[derive(Debug, Default)]
struct Draft {
    name: Option<String>,
    pf_number: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    department: Option<String>,
    role: Option<String>,
    salary: Option<f64>,
}

impl Draft {
    fn into_record(self) -> Result<EmployeeRecord> {
        fn required(value: Option<String>, label: &str) -> Result<String> {
            value.ok_or_else(|| anyhow!("record completed without {label}"))
        }
        Ok(EmployeeRecord {
            name: required(self.name, "name")?,
            pf_number: required(self.pf_number, "PF number")?,
            email: required(self.email, "email")?,
            phone: required(self.phone, "phone")?,
            department: required(self.department, "department")?,
            role: required(self.role, "role")?,
            salary: self.salary,
            is_active: true,
            has_password: false,
        })
    }
}

fn fill<T>(step: Step<T>, slot: &mut Option<T>, next: BuildState) -> Step<BuildState> {
    match step {
        Step::Accept(value) => {
            *slot = Some(value);
            Step::Accept(next)
        }
        Step::Warn(value, message) => {
            *slot = Some(value);
            Step::Warn(next, message)
        }
        Step::Retry(message) => Step::Retry(message),
    }
}

pub struct RecordBuilder<'a> {
    checker: &'a DuplicateChecker<'a>,
    country_code: &'a str,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(checker: &'a DuplicateChecker<'a>, country_code: &'a str) -> Self {
        Self {
            checker,
            country_code,
        }
    }

    fn advance(&self, state: BuildState, input: &str, draft: &mut Draft) -> Step<BuildState> {
        let next = state.next();
        match state {
            BuildState::AwaitingName => fill(accept_name(input), &mut draft.name, next),
            BuildState::AwaitingIdentifier => fill(
                accept_identifier(input, self.checker),
                &mut draft.pf_number,
                next,
            ),
            BuildState::AwaitingEmail => {
                fill(accept_email(input, self.checker), &mut draft.email, next)
            }
            BuildState::AwaitingPhone => fill(
                accept_phone(input, self.country_code),
                &mut draft.phone,
                next,
            ),
            BuildState::AwaitingDepartment => {
                fill(accept_department(input), &mut draft.department, next)
            }
            BuildState::AwaitingRole => fill(accept_role(input), &mut draft.role, next),
            BuildState::AwaitingSalary => {
                draft.salary = accept_salary(input);
                Step::Accept(next)
            }
            BuildState::Complete => Step::Accept(BuildState::Complete),
        }
    }

    /// Run the prompts until a record is complete. `None` means the operator
    /// interrupted; nothing has been written in that case.
    pub fn build(&self, prompter: &mut dyn Prompter) -> Result<Option<EmployeeRecord>> {
        render::banner(prompter, "EMPLOYEE REGISTRATION")?;
        let mut draft = Draft::default();
        let mut state = BuildState::AwaitingName;
        while state != BuildState::Complete {
            let Some(input) = prompter.ask(state.prompt())? else {
                return Ok(None);
            };
            let next = match self.advance(state, &input, &mut draft) {
                Step::Accept(next) => next,
                Step::Warn(next, message) => {
                    prompter.say(&format!("warning: {message}"))?;
                    next
                }
                Step::Retry(message) => {
                    prompter.say(&format!("error: {message}"))?;
                    continue;
                }
            };
            if let Some((heading, options)) = next.options() {
                render::numbered_options(prompter, heading, options)?;
            }
            state = next;
        }
        draft.into_record().map(Some)
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
