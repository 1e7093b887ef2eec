//! Single-shot persistence of validated records.
use crate::record::EmployeeRecord;
use crate::store::{Collection, StoreError};
use std::time::Instant;

pub struct PersistenceGateway<'a> {
    collection: &'a dyn Collection,
}

impl<'a> PersistenceGateway<'a> {
    pub fn new(collection: &'a dyn Collection) -> Self {
        Self { collection }
    }

    /// Insert `record` as a new document. One attempt, no retry; the error is
    /// the caller's to report.
    pub fn save(&self, record: &EmployeeRecord) -> Result<String, StoreError> {
        let start = Instant::now();
        let result = self.collection.insert(&record.to_fields());
        let elapsed_ms = start.elapsed().as_millis();
        match &result {
            Ok(id) => tracing::info!(
                id = %id,
                pf_number = %record.pf_number,
                collection = self.collection.name(),
                elapsed_ms,
                "employee saved"
            ),
            Err(err) => tracing::info!(
                pf_number = %record.pf_number,
                collection = self.collection.name(),
                elapsed_ms,
                error = %err,
                "employee save failed"
            ),
        }
        result
    }
}
