//! Player references.
//!
//! A [`PlayerReference`] names a player by identifier, by display name, or
//! both. Identity is the identifier alone: two references with the same id
//! are equal regardless of how their name is obtained.
//!
//! # Record form
//!
//! ```json
//! { "uuid": "0f8fad5b-d9cb-469f-a165-70867728950e", "username": "Alice" }
//! ```
//!
//! Both fields are optional. Absent fields are omitted, never written as `null`.

use std::hash::{Hash, Hasher};

use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{PlayerId, PlayerName};

/// How a reference obtains its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameRule {
    /// A name fixed when the reference was built.
    Fixed(PlayerName),
    /// Look the name up from the identifier when it is read.
    ResolveFromId,
}

/// A transient handle on a player.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "PlayerReferenceRecord", into = "PlayerReferenceRecord")]
pub struct PlayerReference {
    pub id: Option<PlayerId>,
    pub name: NameRule,
}

impl PlayerReference {
    /// A reference whose name is resolved from `id` at read time.
    pub fn from_id(id: PlayerId) -> Self {
        Self {
            id: Some(id),
            name: NameRule::ResolveFromId,
        }
    }

    pub fn with_name(id: PlayerId, name: impl Into<PlayerName>) -> Self {
        Self {
            id: Some(id),
            name: NameRule::Fixed(name.into()),
        }
    }

    /// A reference known only by name.
    pub fn name_only(name: impl Into<PlayerName>) -> Self {
        Self {
            id: None,
            name: NameRule::Fixed(name.into()),
        }
    }

    /// The fixed name, if this reference carries one.
    pub fn fixed_name(&self) -> Option<&PlayerName> {
        match &self.name {
            NameRule::Fixed(name) => Some(name),
            NameRule::ResolveFromId => None,
        }
    }

    /// Encode to the record form. Yields an empty object if encoding fails.
    pub fn to_json(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Decode from the record form. Only JSON objects are records.
    pub fn from_json(value: &Value) -> Result<Self, serde_json::Error> {
        let unexpected = match value {
            Value::Object(_) => return Self::deserialize(value),
            Value::Array(_) => Unexpected::Seq,
            Value::String(s) => Unexpected::Str(s),
            Value::Bool(b) => Unexpected::Bool(*b),
            Value::Number(_) => Unexpected::Other("number"),
            Value::Null => Unexpected::Unit,
        };
        Err(serde_json::Error::invalid_type(
            unexpected,
            &"a player reference object",
        ))
    }
}

impl PartialEq for PlayerReference {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PlayerReference {}

impl Hash for PlayerReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Serialized shape of a [`PlayerReference`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PlayerReferenceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uuid: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<PlayerName>,
}

impl From<PlayerReferenceRecord> for PlayerReference {
    fn from(record: PlayerReferenceRecord) -> Self {
        let name = match record.username {
            Some(name) => NameRule::Fixed(name),
            None => NameRule::ResolveFromId,
        };
        Self {
            id: record.uuid,
            name,
        }
    }
}

impl From<PlayerReference> for PlayerReferenceRecord {
    fn from(reference: PlayerReference) -> Self {
        let username = match reference.name {
            NameRule::Fixed(name) => Some(name),
            NameRule::ResolveFromId => None,
        };
        Self {
            uuid: reference.id,
            username,
        }
    }
}
