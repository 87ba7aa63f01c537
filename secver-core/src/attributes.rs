//! Strongly-typed boundary between a resolved secret version and a
//! declarative engine's per-resource attribute slots.

use std::collections::{BTreeMap, BTreeSet};

use secrecy::ExposeSecret;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::AssignmentError;
use crate::query::{SecretVersionQuery, SecretVersionResult, CURRENT_STAGE};

pub const ARN: &str = "arn";
pub const SECRET_ID: &str = "secret_id";
pub const SECRET_STRING: &str = "secret_string";
pub const SECRET_BINARY: &str = "secret_binary";
pub const VERSION_ID: &str = "version_id";
pub const VERSION_STAGE: &str = "version_stage";
pub const VERSION_STAGES: &str = "version_stages";

const SENSITIVE_PLACEHOLDER: &str = "(sensitive value)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    String,
    StringSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSchema {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

impl AttributeSchema {
    const fn computed(name: &'static str, kind: AttributeKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            optional: false,
            computed: true,
            sensitive: false,
            default: None,
        }
    }
}

/// Attributes of the secret version data source, in declaration order.
pub fn secret_version_schema() -> Vec<AttributeSchema> {
    vec![
        AttributeSchema::computed(ARN, AttributeKind::String),
        AttributeSchema {
            required: true,
            computed: false,
            ..AttributeSchema::computed(SECRET_ID, AttributeKind::String)
        },
        AttributeSchema {
            sensitive: true,
            ..AttributeSchema::computed(SECRET_STRING, AttributeKind::String)
        },
        AttributeSchema {
            sensitive: true,
            ..AttributeSchema::computed(SECRET_BINARY, AttributeKind::String)
        },
        AttributeSchema {
            optional: true,
            ..AttributeSchema::computed(VERSION_ID, AttributeKind::String)
        },
        AttributeSchema {
            optional: true,
            computed: false,
            default: Some(CURRENT_STAGE),
            ..AttributeSchema::computed(VERSION_STAGE, AttributeKind::String)
        },
        AttributeSchema::computed(VERSION_STAGES, AttributeKind::StringSet),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    StringSet(BTreeSet<String>),
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::String(_) => AttributeKind::String,
            AttributeValue::StringSet(_) => AttributeKind::StringSet,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::StringSet(_) => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<BTreeSet<String>> for AttributeValue {
    fn from(set: BTreeSet<String>) -> Self {
        AttributeValue::StringSet(set)
    }
}

/// Per-resource attribute slots owned by the declarative engine.
pub trait AttributeStore {
    fn get(&self, name: &str) -> Option<&AttributeValue>;
    fn set(&mut self, name: &str, value: AttributeValue) -> Result<(), AssignmentError>;
    fn set_id(&mut self, id: String);
    fn id(&self) -> Option<&str>;
}

/// Schema-checked attribute store.
#[derive(Clone)]
pub struct ResourceData {
    schema: Vec<AttributeSchema>,
    id: Option<String>,
    /// Inputs supplied by configuration; never overwritten by a read.
    config: BTreeMap<String, AttributeValue>,
    /// State: configured inputs plus computed outputs.
    values: BTreeMap<String, AttributeValue>,
    reveal_sensitive: bool,
}

impl ResourceData {
    pub fn new(schema: Vec<AttributeSchema>) -> Self {
        Self {
            schema,
            id: None,
            config: BTreeMap::new(),
            values: BTreeMap::new(),
            reveal_sensitive: false,
        }
    }

    /// Empty resource data for the secret version data source.
    pub fn secret_version() -> Self {
        Self::new(secret_version_schema())
    }

    /// Whether serialization prints sensitive values instead of a placeholder.
    pub fn reveal_sensitive(mut self, reveal: bool) -> Self {
        self.reveal_sensitive = reveal;
        self
    }

    pub fn schema(&self) -> &[AttributeSchema] {
        &self.schema
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.schema.iter().find(|a| a.name == name)
    }

    /// Set a configuration input. Only required or optional attributes
    /// accept configuration.
    pub fn set_config(&mut self, name: &str, value: AttributeValue) -> Result<(), AssignmentError> {
        let attr = self.checked(name, &value)?;
        if !attr.required && !attr.optional {
            return Err(AssignmentError::new(name, "attribute is computed"));
        }
        self.config.insert(name.to_string(), value.clone());
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get_config(&self, name: &str) -> Option<&AttributeValue> {
        self.config.get(name)
    }

    /// Configured string value, or the schema default when unconfigured.
    /// Computed outputs of an earlier read are ignored.
    pub fn config_string(&self, name: &str) -> Option<&str> {
        match self.config.get(name) {
            Some(v) => v.as_str(),
            None => self.attribute(name).and_then(|a| a.default),
        }
    }

    fn checked(&self, name: &str, value: &AttributeValue) -> Result<&AttributeSchema, AssignmentError> {
        let attr = self
            .attribute(name)
            .ok_or_else(|| AssignmentError::new(name, "attribute is not in the schema"))?;
        if attr.kind != value.kind() {
            return Err(AssignmentError::new(
                name,
                format!("expected {:?}, got {:?}", attr.kind, value.kind()),
            ));
        }
        Ok(attr)
    }
}

impl AttributeStore for ResourceData {
    fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    fn set(&mut self, name: &str, value: AttributeValue) -> Result<(), AssignmentError> {
        self.checked(name, &value)?;
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl std::fmt::Debug for ResourceData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceData")
            .field("id", &self.id)
            .field("attributes", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Serialize for ResourceData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("id", &self.id)?;
        for attr in &self.schema {
            let Some(value) = self.values.get(attr.name) else {
                continue;
            };
            if attr.sensitive && !self.reveal_sensitive {
                map.serialize_entry(attr.name, SENSITIVE_PLACEHOLDER)?;
            } else {
                map.serialize_entry(attr.name, value)?;
            }
        }
        map.end()
    }
}

/// Persist a resolved version into `store` under the composite id
/// `{secret_id}|{version}`.
pub fn apply_result<S>(
    store: &mut S,
    query: &SecretVersionQuery,
    result: &SecretVersionResult,
) -> Result<(), AssignmentError>
where
    S: AttributeStore + ?Sized,
{
    store.set_id(query.composite_id());
    store.set(SECRET_ID, result.secret_id.as_str().into())?;
    let string_value = result
        .string_value
        .as_ref()
        .map(|s| s.expose_secret().to_string())
        .unwrap_or_default();
    store.set(SECRET_STRING, string_value.into())?;
    store.set(VERSION_ID, result.version_id.as_str().into())?;
    let binary_value = result
        .binary_value
        .as_ref()
        .map(|b| String::from_utf8_lossy(b.expose_bytes()).into_owned())
        .unwrap_or_default();
    store.set(SECRET_BINARY, binary_value.into())?;
    store.set(ARN, result.arn.as_str().into())?;
    store.set(VERSION_STAGES, result.version_stages.clone().into())?;
    Ok(())
}
