use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::store::{Document, Patch};

use super::{optional_string, required_string};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: Uuid,
    pub name: String,
}

impl Department {
    pub const COLLECTION: &'static str = "departments";

    pub fn from_document(doc: Document) -> Result<Self, serde_json::Error> {
        let mut body = doc.body;
        body.insert("id".into(), serde_json::to_value(doc.id)?);
        serde_json::from_value(Value::Object(body))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentDraft {
    pub name: String,
}

impl DepartmentDraft {
    pub fn from_value(candidate: &Value) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match required_string(candidate, "name", &mut errors) {
            Some(name) => Ok(Self { name }),
            None => Err(errors),
        }
    }

    pub fn into_body(self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("name".into(), Value::String(self.name));
        body
    }
}

#[derive(Debug, Clone, Default)]
pub struct DepartmentPatch {
    pub name: Option<String>,
}

impl DepartmentPatch {
    pub fn from_value(candidate: &Value) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let patch = Self {
            name: optional_string(candidate, "name", &mut errors),
        };
        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(errors)
        }
    }

    pub fn into_patch(self) -> Patch {
        match self.name {
            Some(name) => Patch::new().set("name", name),
            None => Patch::new(),
        }
    }
}
