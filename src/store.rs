//! Remote document collection contract.
//!
//! Every component that touches persisted employees receives an explicit
//! `&dyn Collection` handle. The handle is opened once in `main` and threaded
//! through the flows, so tests can substitute an in-memory collection or a
//! failing double without any process-wide state.
//!
//! The contract is deliberately small: insert a document, query by field
//! equality, and scan everything ordered by one field. Nothing here is
//! transactional; callers that check-then-insert accept the race.
use rand::distr::Alphanumeric;
use rand::Rng;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use thiserror::Error;

mod firestore;
mod memory;
#[cfg(test)]
pub(crate) mod testing;

pub use firestore::{FirestoreCollection, FirestoreSettings};
pub use memory::MemoryCollection;

/// Length of generated document ids, matching Firestore client auto-ids.
pub const DOCUMENT_ID_LEN: usize = 20;

/// A single document field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    /// RFC 3339 timestamp as reported by the store.
    Timestamp(String),
    /// Placeholder the store replaces with its own clock at write time.
    ServerTimestamp,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(number) => Some(*number),
            Value::Integer(number) => Some(*number as f64),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&str> {
        match self {
            Value::Timestamp(text) => Some(text),
            _ => None,
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Integer(_) | Value::Double(_) => 2,
            Value::Timestamp(_) | Value::ServerTimestamp => 3,
            Value::String(_) => 4,
        }
    }
}

/// Total order used for `query_all`: values of different types sort by type
/// (null, bool, number, timestamp, string), then by value.
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::String(a), Value::String(b)) | (Value::Timestamp(a), Value::Timestamp(b)) => {
            a.cmp(b)
        }
        (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
        (a, b) if a.type_rank() == 2 && b.type_rank() == 2 => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.total_cmp(&b)
        }
        (a, b) => a.type_rank().cmp(&b.type_rank()),
    }
}

pub type Fields = BTreeMap<String, Value>;

/// A persisted document with its store-assigned id.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.fields.get(name).and_then(Value::as_bool)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: &'static str,
        timeout_secs: u64,
    },

    #[error("{operation} transport error: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    #[error("{operation} failed with HTTP {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("malformed {operation} response: {message}")]
    Malformed {
        operation: &'static str,
        message: String,
    },

    #[error("document {id} already exists")]
    AlreadyExists { id: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Blocking access to one named collection.
pub trait Collection {
    /// Collection name, used for logging.
    fn name(&self) -> &str;

    /// Insert a new document and return its generated id.
    fn insert(&self, fields: &Fields) -> StoreResult<String>;

    /// All documents whose `field` equals `value`, in store order.
    fn query_eq(&self, field: &str, value: &Value) -> StoreResult<Vec<Document>>;

    /// All documents carrying `order_by`, ascending by that field.
    fn query_all(&self, order_by: &str) -> StoreResult<Vec<Document>>;
}

pub fn generate_document_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(DOCUMENT_ID_LEN)
        .map(char::from)
        .collect()
}
