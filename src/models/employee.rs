use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::store::{Document, Patch};

use super::{optional_string, required_string};

/// A persisted employee. `department` references a department by name; no
/// referential integrity is enforced, deleting a department leaves its
/// employees untouched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
}

impl Employee {
    pub const COLLECTION: &'static str = "employees";

    pub fn from_document(doc: Document) -> Result<Self, serde_json::Error> {
        let mut body = doc.body;
        body.insert("id".into(), serde_json::to_value(doc.id)?);
        serde_json::from_value(Value::Object(body))
    }
}

/// Validated candidate for a new employee. All three fields must be present,
/// strings, and non-empty; every offending field is reported, keyed by its
/// wire name.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDraft {
    pub first_name: String,
    pub last_name: String,
    pub department: String,
}

impl EmployeeDraft {
    pub fn from_value(candidate: &Value) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let first_name = required_string(candidate, "firstName", &mut errors);
        let last_name = required_string(candidate, "lastName", &mut errors);
        let department = required_string(candidate, "department", &mut errors);

        match (first_name, last_name, department) {
            (Some(first_name), Some(last_name), Some(department)) => Ok(Self {
                first_name,
                last_name,
                department,
            }),
            _ => Err(errors),
        }
    }

    pub fn into_body(self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("firstName".into(), Value::String(self.first_name));
        body.insert("lastName".into(), Value::String(self.last_name));
        body.insert("department".into(), Value::String(self.department));
        body
    }
}

/// Field-set patch for an employee; only the fields present in the request
/// are touched, unknown fields are ignored.
#[derive(Debug, Clone, Default)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
}

impl EmployeePatch {
    pub fn from_value(candidate: &Value) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let patch = Self {
            first_name: optional_string(candidate, "firstName", &mut errors),
            last_name: optional_string(candidate, "lastName", &mut errors),
            department: optional_string(candidate, "department", &mut errors),
        };
        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(errors)
        }
    }

    pub fn into_patch(self) -> Patch {
        let mut patch = Patch::new();
        if let Some(first_name) = self.first_name {
            patch = patch.set("firstName", first_name);
        }
        if let Some(last_name) = self.last_name {
            patch = patch.set("lastName", last_name);
        }
        if let Some(department) = self.department {
            patch = patch.set("department", department);
        }
        patch
    }
}
