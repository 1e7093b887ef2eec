//! Registration flows: single record, bulk batch, listing, and the menu that
//! ties them together.
//!
//! A session owns no connection state of its own; it borrows the collection
//! handle opened in `main` and hands it to the checker and the gateway.
use crate::builder::RecordBuilder;
use crate::duplicate::{DuplicateChecker, DuplicatePolicy};
use crate::gateway::PersistenceGateway;
use crate::prompt::{confirm, Prompter};
use crate::record::{field, EmployeeRecord, ListedEmployee};
use crate::render;
use crate::store::Collection;
use anyhow::{Context, Result};

/// Final state of a single registration.
#[derive(Debug, PartialEq, Eq)]
pub enum SingleOutcome {
    Saved { id: String },
    Failed { cause: String },
    /// Operator declined the confirmation or interrupted input.
    Cancelled,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BulkReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl BulkReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum BulkOutcome {
    Completed(BulkReport),
    /// Operator declined the aggregate confirmation; nothing was written.
    Cancelled { collected: usize },
}

pub struct Session<'a> {
    collection: &'a dyn Collection,
    checker: DuplicateChecker<'a>,
    country_code: String,
}

impl<'a> Session<'a> {
    pub fn new(
        collection: &'a dyn Collection,
        policy: DuplicatePolicy,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            collection,
            checker: DuplicateChecker::new(collection, policy),
            country_code: country_code.into(),
        }
    }

    fn builder(&self) -> RecordBuilder<'_> {
        RecordBuilder::new(&self.checker, &self.country_code)
    }

    fn gateway(&self) -> PersistenceGateway<'a> {
        PersistenceGateway::new(self.collection)
    }

    /// Build one record, confirm it, and save it once.
    pub fn add_single(&self, prompter: &mut dyn Prompter) -> Result<SingleOutcome> {
        let Some(record) = self.builder().build(prompter)? else {
            prompter.say("Registration cancelled by user")?;
            return Ok(SingleOutcome::Cancelled);
        };
        render::employee_summary(prompter, &record)?;

        if confirm(prompter, "Save this employee to database?")? != Some(true) {
            prompter.say("Employee registration cancelled")?;
            return Ok(SingleOutcome::Cancelled);
        }

        prompter.say("Saving employee to database...")?;
        match self.gateway().save(&record) {
            Ok(id) => {
                prompter.say("Employee successfully added to database")?;
                prompter.say(&format!("Document ID: {id}"))?;
                prompter.say(&format!(
                    "The employee can now register using PF Number: {}",
                    record.pf_number
                ))?;
                Ok(SingleOutcome::Saved { id })
            }
            Err(err) => {
                let cause = err.to_string();
                prompter.say(&format!("Failed to save employee: {cause}"))?;
                Ok(SingleOutcome::Failed { cause })
            }
        }
    }

    /// Collect records until the operator stops, then save them all after one
    /// confirmation. A failed save is counted and the run moves on.
    pub fn add_bulk(&self, prompter: &mut dyn Prompter) -> Result<BulkOutcome> {
        render::banner(prompter, "BULK EMPLOYEE REGISTRATION")?;
        let records = self.collect_records(prompter)?;

        if records.is_empty() {
            prompter.say("No employees collected")?;
            let report = BulkReport::default();
            render_bulk_report(prompter, &report)?;
            return Ok(BulkOutcome::Completed(report));
        }

        render::bulk_summary(prompter, &records)?;
        let question = format!("Save all {} employees to database?", records.len());
        if confirm(prompter, &question)? != Some(true) {
            prompter.say("Bulk registration cancelled")?;
            return Ok(BulkOutcome::Cancelled {
                collected: records.len(),
            });
        }

        let report = self.save_all(prompter, &records)?;
        render_bulk_report(prompter, &report)?;
        Ok(BulkOutcome::Completed(report))
    }

    fn collect_records(&self, prompter: &mut dyn Prompter) -> Result<Vec<EmployeeRecord>> {
        let mut records = Vec::new();
        loop {
            prompter.say(&format!("--- Adding employee {} ---", records.len() + 1))?;
            match self.builder().build(prompter)? {
                Some(record) => records.push(record),
                None => {
                    prompter.say("Entry interrupted; keeping completed employees")?;
                    break;
                }
            }
            if confirm(prompter, "Add another employee?")? != Some(true) {
                break;
            }
        }
        Ok(records)
    }

    fn save_all(
        &self,
        prompter: &mut dyn Prompter,
        records: &[EmployeeRecord],
    ) -> Result<BulkReport> {
        prompter.say(&format!(
            "Saving {} employees to database...",
            records.len()
        ))?;
        let gateway = self.gateway();
        let mut report = BulkReport::default();
        for (index, record) in records.iter().enumerate() {
            prompter.say(&format!(
                "Processing {}/{}: {}...",
                index + 1,
                records.len(),
                record.name
            ))?;
            match gateway.save(record) {
                Ok(_) => {
                    report.succeeded += 1;
                    prompter.say("  saved")?;
                }
                Err(err) => {
                    report.failed += 1;
                    prompter.say(&format!("  failed: {err}"))?;
                }
            }
        }
        Ok(report)
    }

    pub fn fetch_employees(&self) -> Result<Vec<ListedEmployee>> {
        let documents = self
            .collection
            .query_all(field::NAME)
            .with_context(|| format!("list {}", self.collection.name()))?;
        Ok(documents.iter().map(ListedEmployee::from).collect())
    }

    /// Print every employee ordered by name. A failed read is reported, not
    /// propagated.
    pub fn list_employees(&self, prompter: &mut dyn Prompter) -> Result<()> {
        match self.fetch_employees() {
            Ok(employees) => render::listing(prompter, &employees),
            Err(err) => prompter.say(&format!("Error listing employees: {err:#}")),
        }
    }

    /// Main menu loop. Returns when the operator picks exit or input ends.
    pub fn run_menu(&self, prompter: &mut dyn Prompter) -> Result<()> {
        loop {
            render::banner(prompter, "EMPLOYEE MANAGEMENT SYSTEM")?;
            prompter.say("1. Add single employee")?;
            prompter.say("2. Bulk add employees")?;
            prompter.say("3. List all employees")?;
            prompter.say("4. Exit")?;
            prompter.say(&render::rule('='))?;

            let Some(choice) = prompter.ask("Select option (1-4): ")? else {
                return Ok(());
            };
            match choice.trim() {
                "1" => {
                    self.add_single(prompter)?;
                }
                "2" => {
                    self.add_bulk(prompter)?;
                }
                "3" => self.list_employees(prompter)?,
                "4" => {
                    prompter.say("Goodbye!")?;
                    return Ok(());
                }
                _ => prompter.say("Invalid option. Please select 1-4.")?,
            }
        }
    }
}

fn render_bulk_report(prompter: &mut dyn Prompter, report: &BulkReport) -> Result<()> {
    render::banner(prompter, "BULK REGISTRATION COMPLETE")?;
    prompter.say(&format!("Successfully added: {}", report.succeeded))?;
    prompter.say(&format!("Failed: {}", report.failed))?;
    prompter.say(&format!("Total processed: {}", report.total()))
}

#[cfg(test)]
#[path = "flows_tests.rs"]
mod tests;
