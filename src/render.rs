//! Operator-facing text blocks.
use crate::prompt::Prompter;
use crate::record::{EmployeeRecord, ListedEmployee};
use anyhow::Result;

const RULE_WIDTH: usize = 60;
const MISSING: &str = "N/A";

pub fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

pub fn banner(prompter: &mut dyn Prompter, title: &str) -> Result<()> {
    prompter.say("")?;
    prompter.say(&rule('='))?;
    prompter.say(title)?;
    prompter.say(&rule('='))
}

pub fn numbered_options(
    prompter: &mut dyn Prompter,
    heading: &str,
    options: &[&str],
) -> Result<()> {
    prompter.say(heading)?;
    for (index, option) in options.iter().enumerate() {
        prompter.say(&format!("   {}. {option}", index + 1))?;
    }
    Ok(())
}

/// `KES 1,234,567.50`
pub fn format_salary(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("KES {grouped}.{cents}")
}

pub fn employee_summary(prompter: &mut dyn Prompter, record: &EmployeeRecord) -> Result<()> {
    banner(prompter, "EMPLOYEE SUMMARY")?;
    prompter.say(&format!("Name:         {}", record.name))?;
    prompter.say(&format!("PF Number:    {}", record.pf_number))?;
    prompter.say(&format!("Email:        {}", record.email))?;
    prompter.say(&format!("Phone:        {}", record.phone))?;
    prompter.say(&format!("Department:   {}", record.department))?;
    prompter.say(&format!("Role:         {}", record.role))?;
    if let Some(salary) = record.salary {
        prompter.say(&format!("Salary:       {}", format_salary(salary)))?;
    }
    let status = if record.is_active { "Active" } else { "Inactive" };
    prompter.say(&format!("Status:       {status}"))?;
    prompter.say(&rule('='))
}

pub fn bulk_summary(prompter: &mut dyn Prompter, records: &[EmployeeRecord]) -> Result<()> {
    banner(
        prompter,
        &format!("BULK REGISTRATION SUMMARY ({} employees)", records.len()),
    )?;
    for (index, record) in records.iter().enumerate() {
        prompter.say(&format!(
            "{}. {} (PF: {}) - {}",
            index + 1,
            record.name,
            record.pf_number,
            record.department
        ))?;
    }
    Ok(())
}

pub fn listing(prompter: &mut dyn Prompter, employees: &[ListedEmployee]) -> Result<()> {
    banner(prompter, "EMPLOYEE DATABASE")?;
    if employees.is_empty() {
        return prompter.say("No employees found in database");
    }
    prompter.say(&format!("Total employees: {}", employees.len()))?;
    prompter.say(&rule('-'))?;
    for (index, employee) in employees.iter().enumerate() {
        let field = |value: &Option<String>| value.clone().unwrap_or_else(|| MISSING.to_string());
        let status = if employee.is_active { "active" } else { "inactive" };
        let password = if employee.has_password { "yes" } else { "no" };
        prompter.say(&format!(
            "{:2}. [{status}] {}",
            index + 1,
            field(&employee.name)
        ))?;
        prompter.say(&format!(
            "     PF: {} | {} | {}",
            field(&employee.pf_number),
            field(&employee.department),
            field(&employee.role)
        ))?;
        prompter.say(&format!(
            "     {} | {}",
            field(&employee.email),
            field(&employee.phone)
        ))?;
        prompter.say(&format!("     Password set: {password}"))?;
        prompter.say(&rule('-'))?;
    }
    Ok(())
}
