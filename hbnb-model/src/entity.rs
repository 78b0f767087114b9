use crate::{ModelError, ModelResult};
use hbnb_types::{EntityId, Timestamp};
use serde_json::{Map, Value};
use std::fmt;

/// Open attribute bag: attribute name to JSON value, kept in key order.
pub type Attributes = Map<String, Value>;

/// Dictionary key holding the entity id.
pub const ID_KEY: &str = "id";
/// Dictionary key holding the creation timestamp.
pub const CREATED_AT_KEY: &str = "created_at";
/// Dictionary key holding the last-save timestamp.
pub const UPDATED_AT_KEY: &str = "updated_at";
/// Dictionary key holding the kind discriminator.
pub const KIND_KEY: &str = "__class__";

/// Keys owned by the entity itself; never stored in the attribute bag.
pub const RESERVED_KEYS: [&str; 4] = [ID_KEY, CREATED_AT_KEY, UPDATED_AT_KEY, KIND_KEY];

/// Builds the registry key `<kind>.<id>`.
pub fn composite_key(kind: &str, id: &str) -> String {
    format!("{kind}.{id}")
}

/// Splits a registry key at its first `.` into `(kind, id)`.
///
/// Returns `None` unless both halves are non-empty.
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    let (kind, id) = key.split_once('.')?;
    if kind.is_empty() || id.is_empty() {
        return None;
    }
    Some((kind, id))
}

/// A persisted domain object with identity and timestamps.
///
/// The id and `created_at` never change after construction. `updated_at`
/// only moves forward, via [`Entity::touch`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    kind: String,
    created_at: Timestamp,
    updated_at: Timestamp,
    attributes: Attributes,
}

impl Entity {
    /// Creates a fresh entity with a new id and both timestamps set to now.
    ///
    /// The entity is not registered anywhere; callers hand it to the
    /// storage engine.
    pub fn new(kind: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            id: EntityId::new(),
            kind: kind.into(),
            created_at: now,
            updated_at: now,
            attributes: Attributes::new(),
        }
    }

    /// Rebuilds an entity from a mapping produced by [`Entity::to_dict`].
    ///
    /// An empty mapping yields a fresh entity, like [`Entity::new`].
    pub fn from_dict(kind: impl Into<String>, mut dict: Attributes) -> ModelResult<Self> {
        let kind = kind.into();
        if dict.is_empty() {
            return Ok(Self::new(kind));
        }

        if let Some(found) = dict.remove(KIND_KEY) {
            if found.as_str() != Some(kind.as_str()) {
                let found = match found {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                return Err(ModelError::KindMismatch {
                    expected: kind,
                    found,
                });
            }
        }

        let id = match dict.remove(ID_KEY) {
            None => EntityId::new(),
            Some(Value::String(s)) => EntityId::parse(&s).map_err(|e| ModelError::InvalidField {
                field: ID_KEY.into(),
                reason: e.to_string(),
            })?,
            Some(other) => {
                return Err(ModelError::InvalidField {
                    field: ID_KEY.into(),
                    reason: format!("expected a string, found {other}"),
                });
            }
        };

        let created_at = take_timestamp(&mut dict, CREATED_AT_KEY)?;
        let updated_at = take_timestamp(&mut dict, UPDATED_AT_KEY)?;
        let (created_at, updated_at) = match (created_at, updated_at) {
            (Some(c), Some(u)) => (c, u),
            (Some(c), None) => (c, c),
            (None, Some(u)) => (u, u),
            (None, None) => {
                let now = Timestamp::now();
                (now, now)
            }
        };
        if created_at > updated_at {
            return Err(ModelError::TimestampOrder {
                created_at: created_at.to_string(),
                updated_at: updated_at.to_string(),
            });
        }

        Ok(Self {
            id,
            kind,
            created_at,
            updated_at,
            attributes: dict,
        })
    }

    /// Serializes the entity: its attributes, id, canonical timestamps and
    /// the kind discriminator.
    pub fn to_dict(&self) -> Attributes {
        let mut dict = self.own_fields();
        dict.insert(KIND_KEY.into(), Value::String(self.kind.clone()));
        dict
    }

    /// Human-readable `[<kind>] (<id>) <fields>` rendering, for diagnostics.
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Refreshes `updated_at`. Never moves it backwards.
    pub fn touch(&mut self) {
        self.updated_at = self.updated_at.max_with_now();
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// The registry key `<kind>.<id>`.
    pub fn key(&self) -> String {
        composite_key(&self.kind, self.id.as_str())
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Looks up a top-level attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Looks up a value using a JSON pointer into the attribute bag
    /// (e.g., "/name" or "/address/city").
    pub fn get(&self, pointer: &str) -> Option<&Value> {
        let rest = pointer.strip_prefix('/')?;
        let (head, tail) = match rest.find('/') {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };
        let head = head.replace("~1", "/").replace("~0", "~");
        let value = self.attributes.get(&head)?;
        if tail.is_empty() {
            Some(value)
        } else {
            value.pointer(tail)
        }
    }

    /// Extract a string value using a JSON pointer.
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.get(pointer).and_then(|v| v.as_str())
    }

    /// Extract a boolean value using a JSON pointer.
    pub fn get_bool(&self, pointer: &str) -> Option<bool> {
        self.get(pointer).and_then(|v| v.as_bool())
    }

    /// Extract a numeric value using a JSON pointer.
    pub fn get_number(&self, pointer: &str) -> Option<f64> {
        self.get(pointer).and_then(|v| v.as_f64())
    }

    /// Sets an attribute, returning the previous value.
    ///
    /// Reserved keys (`id`, timestamps, discriminator) are rejected.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> ModelResult<Option<Value>> {
        let name = name.into();
        if RESERVED_KEYS.contains(&name.as_str()) {
            return Err(ModelError::ReservedAttribute(name));
        }
        if name.is_empty() {
            return Err(ModelError::InvalidField {
                field: name,
                reason: "attribute name must not be empty".into(),
            });
        }
        Ok(self.attributes.insert(name, value.into()))
    }

    /// Removes an attribute, returning its value if it was set.
    pub fn remove_attribute(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    fn own_fields(&self) -> Attributes {
        let mut fields = self.attributes.clone();
        fields.insert(ID_KEY.into(), Value::String(self.id.to_string()));
        fields.insert(
            CREATED_AT_KEY.into(),
            Value::String(self.created_at.to_string()),
        );
        fields.insert(
            UPDATED_AT_KEY.into(),
            Value::String(self.updated_at.to_string()),
        );
        fields
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] ({}) {}",
            self.kind,
            self.id,
            Value::Object(self.own_fields())
        )
    }
}

fn take_timestamp(dict: &mut Attributes, field: &str) -> ModelResult<Option<Timestamp>> {
    let Some(value) = dict.remove(field) else {
        return Ok(None);
    };
    let malformed = |value: String| ModelError::MalformedTimestamp {
        field: field.into(),
        value,
    };
    match value {
        Value::String(s) => Timestamp::parse(&s).map(Some).map_err(|_| malformed(s)),
        other => Err(malformed(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_key_at_first_dot() {
        assert_eq!(split_key("User.abc"), Some(("User", "abc")));
        assert_eq!(split_key("User.a.b"), Some(("User", "a.b")));
    }

    #[test]
    fn split_key_rejects_missing_halves() {
        assert_eq!(split_key("User"), None);
        assert_eq!(split_key(".abc"), None);
        assert_eq!(split_key("User."), None);
        assert_eq!(split_key(""), None);
    }

    #[test]
    fn take_timestamp_absent_is_none() {
        let mut dict = Attributes::new();
        assert_eq!(take_timestamp(&mut dict, CREATED_AT_KEY), Ok(None));
    }

    #[test]
    fn take_timestamp_non_string_is_malformed() {
        let mut dict = Attributes::new();
        dict.insert(CREATED_AT_KEY.into(), Value::from(17));
        assert_eq!(
            take_timestamp(&mut dict, CREATED_AT_KEY),
            Err(ModelError::MalformedTimestamp {
                field: CREATED_AT_KEY.into(),
                value: "17".into(),
            })
        );
        assert!(dict.is_empty());
    }
}
