//! Collection doubles shared by unit tests.
use super::{Collection, Document, Fields, MemoryCollection, StoreError, StoreResult, Value};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

/// Wraps a memory collection, counts calls, and fails on request.
pub(crate) struct ScriptedCollection {
    inner: MemoryCollection,
    pub(crate) insert_calls: Cell<usize>,
    pub(crate) query_calls: Cell<usize>,
    /// 1-based insert attempts that fail.
    failing_inserts: RefCell<BTreeSet<usize>>,
    fail_queries: bool,
}

impl ScriptedCollection {
    pub(crate) fn new(inner: MemoryCollection) -> Self {
        Self {
            inner,
            insert_calls: Cell::new(0),
            query_calls: Cell::new(0),
            failing_inserts: RefCell::new(BTreeSet::new()),
            fail_queries: false,
        }
    }

    pub(crate) fn empty() -> Self {
        Self::new(MemoryCollection::new("employees"))
    }

    pub(crate) fn failing_inserts(self, attempts: &[usize]) -> Self {
        self.failing_inserts.borrow_mut().extend(attempts);
        self
    }

    pub(crate) fn failing_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    pub(crate) fn inner(&self) -> &MemoryCollection {
        &self.inner
    }
}

impl Collection for ScriptedCollection {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn insert(&self, fields: &Fields) -> StoreResult<String> {
        let attempt = self.insert_calls.get() + 1;
        self.insert_calls.set(attempt);
        if self.failing_inserts.borrow().contains(&attempt) {
            return Err(StoreError::Status {
                operation: "commit",
                status: 503,
                body: "backend unavailable".to_string(),
            });
        }
        self.inner.insert(fields)
    }

    fn query_eq(&self, field: &str, value: &Value) -> StoreResult<Vec<Document>> {
        self.query_calls.set(self.query_calls.get() + 1);
        if self.fail_queries {
            return Err(StoreError::Transport {
                operation: "runQuery",
                message: "connection refused".to_string(),
            });
        }
        self.inner.query_eq(field, value)
    }

    fn query_all(&self, order_by: &str) -> StoreResult<Vec<Document>> {
        self.query_calls.set(self.query_calls.get() + 1);
        if self.fail_queries {
            return Err(StoreError::Timeout {
                operation: "runQuery",
                timeout_secs: 30,
            });
        }
        self.inner.query_all(order_by)
    }
}
