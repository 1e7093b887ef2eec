//! Process-local collection used for rehearsals and tests.
use super::{
    compare_values, generate_document_id, Collection, Document, Fields, StoreError, StoreResult,
    Value,
};
use chrono::{SecondsFormat, Utc};
use std::cell::RefCell;

/// In-memory collection. Contents live for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    name: String,
    documents: RefCell<Vec<Document>>,
}

impl MemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: RefCell::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl MemoryCollection {
    /// Seed a document with a known id, bypassing id generation.
    pub fn with_document(self, id: &str, fields: Fields) -> Self {
        self.documents.borrow_mut().push(Document {
            id: id.to_string(),
            fields,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.documents.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.borrow().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<Document> {
        self.documents
            .borrow()
            .iter()
            .find(|doc| doc.id == id)
            .cloned()
    }
}

impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn insert(&self, fields: &Fields) -> StoreResult<String> {
        let id = generate_document_id();
        let mut documents = self.documents.borrow_mut();
        if documents.iter().any(|doc| doc.id == id) {
            return Err(StoreError::AlreadyExists { id });
        }
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let resolved = fields
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::ServerTimestamp => Value::Timestamp(now.clone()),
                    other => other.clone(),
                };
                (key.clone(), value)
            })
            .collect();
        documents.push(Document {
            id: id.clone(),
            fields: resolved,
        });
        Ok(id)
    }

    fn query_eq(&self, field: &str, value: &Value) -> StoreResult<Vec<Document>> {
        Ok(self
            .documents
            .borrow()
            .iter()
            .filter(|doc| doc.fields.get(field) == Some(value))
            .cloned()
            .collect())
    }

    fn query_all(&self, order_by: &str) -> StoreResult<Vec<Document>> {
        let mut matches: Vec<Document> = self
            .documents
            .borrow()
            .iter()
            .filter(|doc| doc.fields.contains_key(order_by))
            .cloned()
            .collect();
        // Stable sort keeps insertion order among equal keys.
        matches.sort_by(|left, right| {
            match (left.fields.get(order_by), right.fields.get(order_by)) {
                (Some(a), Some(b)) => compare_values(a, b),
                _ => std::cmp::Ordering::Equal,
            }
        });
        Ok(matches)
    }
}
