//! Records returned by the directory.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Remote identifier, kept in the JSON form the server used.
///
/// The API returns numeric ids, but nothing downstream relies on that: the
/// value is echoed back in payloads and printed into result files as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Value);

impl EntityId {
    /// Wrap a JSON id. `null` is not an id.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            other => Some(Self(other.clone())),
        }
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(Value::from(id))
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(Value::from(id))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// A single row from a collection. Read-only once fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteEntity {
    fields: Map<String, Value>,
}

impl RemoteEntity {
    /// Build from a JSON value; only objects are entities.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// The record's `id`, if it carries one.
    #[must_use]
    pub fn id(&self) -> Option<EntityId> {
        self.fields.get("id").and_then(EntityId::from_value)
    }

    /// A string field, or `""` when absent or not a string.
    #[must_use]
    pub fn str_field(&self, key: &str) -> &str {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}
