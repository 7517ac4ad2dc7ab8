//! Status identifiers.
//!
//! A `StatusId` names a status definition. Collections, registries and
//! capability declarations are all keyed by it, and every event carries
//! one, so it is shared rather than copied.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Shared name of a status definition.
///
/// Serialises as a plain JSON string.
///
/// # Examples
///
/// ```rust
/// use zzstatus::StatusId;
///
/// let poison = StatusId::from_str("Poison");
/// let from_owned: StatusId = String::from("Poison").into();
///
/// assert_eq!(poison, from_owned);
/// assert_eq!(poison.as_str(), "Poison");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct StatusId(Arc<str>);

impl StatusId {
    pub fn from_str(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StatusId {
    fn from(name: &str) -> Self {
        Self::from_str(name)
    }
}

impl From<String> for StatusId {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<StatusId> for String {
    fn from(id: StatusId) -> Self {
        id.0.as_ref().to_owned()
    }
}

impl Borrow<str> for StatusId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StatusId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
