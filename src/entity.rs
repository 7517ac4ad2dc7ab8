//! Entity references.
//!
//! The engine never owns entities; it only needs an identity to stamp on
//! events and a kind to resolve capabilities against.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque identity of the entity that owns a status collection.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of an entity, e.g. `"Player"` or `"Golem"`.
///
/// Capability declarations are made per kind.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct EntityKind(Arc<str>);

impl EntityKind {
    /// Create a new `EntityKind` from a string slice.
    pub fn from_str(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the string representation of this kind.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityKind {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EntityKind {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<EntityKind> for String {
    fn from(kind: EntityKind) -> Self {
        kind.0.as_ref().to_owned()
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An entity's identity together with its kind.
///
/// # Examples
///
/// ```rust
/// use zzstatus::{EntityId, EntityRef};
///
/// let hero = EntityRef::new(7, "Player");
/// assert_eq!(hero.id, EntityId(7));
/// assert_eq!(hero.kind.as_str(), "Player");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: EntityId,
    pub kind: EntityKind,
}

impl EntityRef {
    pub fn new(id: u64, kind: impl Into<EntityKind>) -> Self {
        Self {
            id: EntityId(id),
            kind: kind.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.id)
    }
}
