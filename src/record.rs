//! Employee record shapes: the candidate built at the prompt and the
//! read-back view used by listings.
use crate::store::{Document, Fields, Value};
use serde::Serialize;

pub const DEPARTMENTS: [&str; 8] = [
    "Human Resources",
    "Finance",
    "IT",
    "Operations",
    "Marketing",
    "Sales",
    "Administration",
    "Other",
];

pub const ROLES: [&str; 4] = ["Employee", "Supervisor", "Manager", "Admin"];

/// Store field names.
pub mod field {
    pub const NAME: &str = "name";
    pub const PF_NUMBER: &str = "pfNumber";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const DEPARTMENT: &str = "department";
    pub const ROLE: &str = "role";
    pub const SALARY: &str = "salary";
    pub const IS_ACTIVE: &str = "isActive";
    pub const HAS_PASSWORD: &str = "hasPassword";
    pub const CREATED_AT: &str = "createdAt";
    pub const REGISTERED_AT: &str = "registeredAt";
}

/// A fully validated employee that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRecord {
    pub name: String,
    pub pf_number: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub role: String,
    pub salary: Option<f64>,
    pub is_active: bool,
    pub has_password: bool,
}

impl EmployeeRecord {
    /// Document fields for insertion. `createdAt` is left for the store to
    /// resolve and `registeredAt` starts out null.
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        let mut put = |key: &str, value: Value| {
            fields.insert(key.to_string(), value);
        };
        put(field::NAME, Value::String(self.name.clone()));
        put(field::PF_NUMBER, Value::String(self.pf_number.clone()));
        put(field::EMAIL, Value::String(self.email.clone()));
        put(field::PHONE, Value::String(self.phone.clone()));
        put(field::DEPARTMENT, Value::String(self.department.clone()));
        put(field::ROLE, Value::String(self.role.clone()));
        if let Some(salary) = self.salary {
            put(field::SALARY, Value::Double(salary));
        }
        put(field::IS_ACTIVE, Value::Bool(self.is_active));
        put(field::HAS_PASSWORD, Value::Bool(self.has_password));
        put(field::CREATED_AT, Value::ServerTimestamp);
        put(field::REGISTERED_AT, Value::Null);
        fields
    }
}

/// A persisted employee as read back from the store. Every field is
/// optional since other writers share the collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedEmployee {
    pub id: String,
    pub name: Option<String>,
    pub pf_number: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    pub is_active: bool,
    pub has_password: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<String>,
}

impl From<&Document> for ListedEmployee {
    fn from(doc: &Document) -> Self {
        let text = |name: &str| doc.str_field(name).map(str::to_string);
        let timestamp = |name: &str| {
            doc.fields
                .get(name)
                .and_then(Value::as_timestamp)
                .map(str::to_string)
        };
        Self {
            id: doc.id.clone(),
            name: text(field::NAME),
            pf_number: text(field::PF_NUMBER),
            email: text(field::EMAIL),
            phone: text(field::PHONE),
            department: text(field::DEPARTMENT),
            role: text(field::ROLE),
            salary: doc.fields.get(field::SALARY).and_then(Value::as_f64),
            // Missing flags read as the creation defaults.
            is_active: doc.bool_field(field::IS_ACTIVE).unwrap_or(true),
            has_password: doc.bool_field(field::HAS_PASSWORD).unwrap_or(false),
            created_at: timestamp(field::CREATED_AT),
            registered_at: timestamp(field::REGISTERED_AT),
        }
    }
}
