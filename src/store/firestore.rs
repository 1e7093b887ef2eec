//! Firestore REST (v1) collection over blocking HTTP.
//!
//! Inserts go through `documents:commit` so the `createdAt` server timestamp
//! can be expressed as a `REQUEST_TIME` field transform, and so the write can
//! carry an `exists: false` precondition on the client-generated id. Queries
//! go through `documents:runQuery` with a single collection selector.
//!
//! Every request is bounded by the agent's global timeout; a hung backend
//! surfaces as `StoreError::Timeout` instead of blocking the session forever.
//! Response bodies are capped at [`RESPONSE_BODY_LIMIT`] bytes.
use super::{generate_document_id, Collection, Document, Fields, StoreError, StoreResult, Value};
use serde_json::{json, Map};
use std::time::{Duration, Instant};

const PRODUCTION_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const ERROR_BODY_LIMIT: usize = 300;
/// Largest response body read; a full `list` of a big collection is the only
/// request that comes near it.
pub(crate) const RESPONSE_BODY_LIMIT: u64 = 64 * 1024 * 1024;

/// Connection settings resolved from config.
#[derive(Debug, Clone)]
pub struct FirestoreSettings {
    pub project_id: String,
    pub database: String,
    pub collection: String,
    /// `host:port` of a local emulator; switches to plain HTTP.
    pub emulator_host: Option<String>,
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl FirestoreSettings {
    fn base_url(&self) -> String {
        match self.emulator_host.as_deref() {
            Some(host) => format!("http://{}/v1", host.trim_end_matches('/')),
            None => PRODUCTION_BASE_URL.to_string(),
        }
    }

    fn database_path(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database
        )
    }

    fn document_name(&self, id: &str) -> String {
        format!("{}/{}/{}", self.database_path(), self.collection, id)
    }
}

pub struct FirestoreCollection {
    agent: ureq::Agent,
    settings: FirestoreSettings,
}

impl FirestoreCollection {
    pub fn connect(settings: FirestoreSettings) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(settings.timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            settings,
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/{}:{}",
            self.settings.base_url(),
            self.settings.database_path(),
            method
        )
    }

    fn post(&self, operation: &'static str, body: &serde_json::Value) -> StoreResult<String> {
        let url = self.endpoint(operation);
        let mut request = self.agent.post(url.as_str());
        if let Some(token) = self.settings.access_token.as_deref() {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let start = Instant::now();
        let result = request.send_json(body);
        let elapsed_ms = start.elapsed().as_millis();

        let mut response = match result {
            Ok(response) => response,
            Err(ureq::Error::Timeout(_)) => {
                tracing::info!(operation, elapsed_ms, "firestore request timed out");
                return Err(StoreError::Timeout {
                    operation,
                    timeout_secs: self.settings.timeout.as_secs(),
                });
            }
            Err(err) => {
                return Err(StoreError::Transport {
                    operation,
                    message: err.to_string(),
                })
            }
        };
        let status = response.status().as_u16();
        tracing::info!(
            operation,
            elapsed_ms,
            status,
            collection = %self.settings.collection,
            "firestore request complete"
        );

        let text = response
            .body_mut()
            .with_config()
            .limit(RESPONSE_BODY_LIMIT)
            .read_to_string()
            .map_err(|err| body_error(operation, err))?;
        if !(200..300).contains(&status) {
            return Err(StoreError::Status {
                operation,
                status,
                body: truncate_string(text.trim(), ERROR_BODY_LIMIT),
            });
        }
        Ok(text)
    }

    fn run_query(&self, structured_query: serde_json::Value) -> StoreResult<Vec<Document>> {
        let body = json!({ "structuredQuery": structured_query });
        let text = self.post("runQuery", &body)?;
        decode_run_query(&text)
    }
}

impl Collection for FirestoreCollection {
    fn name(&self) -> &str {
        &self.settings.collection
    }

    fn insert(&self, fields: &Fields) -> StoreResult<String> {
        let id = generate_document_id();
        let body = commit_body(&self.settings.document_name(&id), fields);
        match self.post("commit", &body) {
            Ok(_) => Ok(id),
            Err(StoreError::Status { status: 409, .. }) => Err(StoreError::AlreadyExists { id }),
            Err(err) => Err(err),
        }
    }

    fn query_eq(&self, field: &str, value: &Value) -> StoreResult<Vec<Document>> {
        let filter = json!({
            "fieldFilter": {
                "field": { "fieldPath": field },
                "op": "EQUAL",
                "value": encode_value(value),
            }
        });
        self.run_query(json!({
            "from": [{ "collectionId": self.settings.collection }],
            "where": filter,
        }))
    }

    fn query_all(&self, order_by: &str) -> StoreResult<Vec<Document>> {
        self.run_query(json!({
            "from": [{ "collectionId": self.settings.collection }],
            "orderBy": [{ "field": { "fieldPath": order_by }, "direction": "ASCENDING" }],
        }))
    }
}

pub(crate) fn body_error(operation: &'static str, err: ureq::Error) -> StoreError {
    let message = match err {
        ureq::Error::BodyExceedsLimit(limit) => {
            format!("response body exceeds the {limit} byte limit")
        }
        other => other.to_string(),
    };
    StoreError::Transport { operation, message }
}

/// Build the commit request for a single create-only write.
pub(crate) fn commit_body(document_name: &str, fields: &Fields) -> serde_json::Value {
    let mut encoded = Map::new();
    let mut transforms = Vec::new();
    for (key, value) in fields {
        match value {
            Value::ServerTimestamp => transforms.push(json!({
                "fieldPath": key,
                "setToServerValue": "REQUEST_TIME",
            })),
            other => {
                encoded.insert(key.clone(), encode_value(other));
            }
        }
    }

    let mut write = Map::new();
    write.insert(
        "update".to_string(),
        json!({ "name": document_name, "fields": encoded }),
    );
    if !transforms.is_empty() {
        write.insert("updateTransforms".to_string(), json!(transforms));
    }
    write.insert("currentDocument".to_string(), json!({ "exists": false }));
    json!({ "writes": [write] })
}

pub(crate) fn encode_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Null | Value::ServerTimestamp => json!({ "nullValue": null }),
        Value::Bool(flag) => json!({ "booleanValue": flag }),
        // Firestore carries int64 as a decimal string.
        Value::Integer(number) => json!({ "integerValue": number.to_string() }),
        Value::Double(number) => json!({ "doubleValue": number }),
        Value::String(text) => json!({ "stringValue": text }),
        Value::Timestamp(text) => json!({ "timestampValue": text }),
    }
}

/// Decode one typed Firestore value. Unsupported kinds (maps, arrays,
/// references, geo points) yield `None`.
pub(crate) fn decode_value(raw: &serde_json::Value) -> Option<Value> {
    let object = raw.as_object()?;
    let (kind, inner) = object.iter().next()?;
    match kind.as_str() {
        "nullValue" => Some(Value::Null),
        "booleanValue" => inner.as_bool().map(Value::Bool),
        "integerValue" => match inner {
            serde_json::Value::String(text) => text.parse().ok().map(Value::Integer),
            other => other.as_i64().map(Value::Integer),
        },
        "doubleValue" => match inner {
            serde_json::Value::String(text) => text.parse().ok().map(Value::Double),
            other => other.as_f64().map(Value::Double),
        },
        "stringValue" => inner.as_str().map(|text| Value::String(text.to_string())),
        "timestampValue" => inner.as_str().map(|text| Value::Timestamp(text.to_string())),
        _ => None,
    }
}

fn decode_document(raw: &serde_json::Value) -> StoreResult<Document> {
    let malformed = |message: &str| StoreError::Malformed {
        operation: "runQuery",
        message: message.to_string(),
    };
    let name = raw
        .get("name")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| malformed("document missing name"))?;
    let id = name
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| malformed("document name has no id segment"))?;

    let mut fields = Fields::new();
    if let Some(raw_fields) = raw.get("fields").and_then(serde_json::Value::as_object) {
        for (key, raw_value) in raw_fields {
            match decode_value(raw_value) {
                Some(value) => {
                    fields.insert(key.clone(), value);
                }
                None => tracing::debug!(field = %key, "skipping unsupported firestore value"),
            }
        }
    }
    Ok(Document {
        id: id.to_string(),
        fields,
    })
}

/// Decode a `runQuery` response: a JSON array of result entries, where
/// entries without a `document` carry only read metadata.
pub(crate) fn decode_run_query(text: &str) -> StoreResult<Vec<Document>> {
    let parsed: serde_json::Value =
        serde_json::from_str(text).map_err(|err| StoreError::Malformed {
            operation: "runQuery",
            message: err.to_string(),
        })?;
    let entries = parsed.as_array().ok_or_else(|| StoreError::Malformed {
        operation: "runQuery",
        message: "expected a JSON array".to_string(),
    })?;
    entries
        .iter()
        .filter_map(|entry| entry.get("document"))
        .map(decode_document)
        .collect()
}

fn truncate_string(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut truncated = String::new();
    for ch in text.chars() {
        if truncated.len() + ch.len_utf8() > max_bytes {
            break;
        }
        truncated.push(ch);
    }
    truncated
}

#[cfg(test)]
#[path = "firestore_tests.rs"]
mod tests;
