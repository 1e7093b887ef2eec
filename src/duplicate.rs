//! Duplicate detection against the shared collection.
//!
//! The check is a plain equality query followed, later, by a separate insert.
//! Two operators registering the same PF number or email at the same time can
//! both pass the check; nothing at the store layer prevents the second write.
//!
//! When the query itself fails the checker logs a warning and reports the
//! value as unverified. The configured [`DuplicatePolicy`] decides whether the
//! operator may keep it; the default, `FailOpen`, lets registration continue
//! with a visible warning.
use crate::store::{Collection, StoreError, Value};
use serde::{Deserialize, Serialize};

/// What to conclude when the duplicate query cannot be completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Treat the value as unique and carry on.
    #[default]
    FailOpen,
    /// Make the operator re-enter the value until the check completes.
    FailClosed,
}

/// Raw result of one duplicate query, before policy is applied.
#[derive(Debug)]
pub enum DuplicateCheck {
    Unique,
    Duplicate,
    Unverified(StoreError),
}

pub struct DuplicateChecker<'a> {
    collection: &'a dyn Collection,
    policy: DuplicatePolicy,
}

impl<'a> DuplicateChecker<'a> {
    pub fn new(collection: &'a dyn Collection, policy: DuplicatePolicy) -> Self {
        Self { collection, policy }
    }

    /// Query for `field == normalized_value`. A failed query is logged here;
    /// what it means for the caller depends on [`Self::rejects_unverified`].
    pub fn check(&self, field: &str, normalized_value: &str) -> DuplicateCheck {
        let value = Value::String(normalized_value.to_string());
        match self.collection.query_eq(field, &value) {
            Ok(matches) if matches.is_empty() => DuplicateCheck::Unique,
            Ok(_) => DuplicateCheck::Duplicate,
            Err(err) => {
                tracing::warn!(
                    field,
                    collection = self.collection.name(),
                    policy = ?self.policy,
                    error = %err,
                    "could not check for duplicates"
                );
                DuplicateCheck::Unverified(err)
            }
        }
    }

    /// Whether an unverified value must be re-entered.
    pub fn rejects_unverified(&self) -> bool {
        self.policy == DuplicatePolicy::FailClosed
    }
}
