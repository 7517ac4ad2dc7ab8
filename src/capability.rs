//! Capability resolution.
//!
//! Entity kinds declare which statuses they support and which they ban.
//! Bans always win over support. Kinds that declare nothing accept every
//! status; kinds declared *restricted* accept only what they explicitly
//! support.

use crate::entity::EntityKind;
use crate::error::StatusError;
use crate::status_id::StatusId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Static declarations for one entity kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KindCapabilities {
    #[serde(default)]
    pub supported: BTreeSet<StatusId>,
    #[serde(default)]
    pub banned: BTreeSet<StatusId>,
    /// Only explicitly supported statuses pass.
    #[serde(default)]
    pub restricted: bool,
}

/// Resolves whether a status may live on an entity kind.
///
/// # Examples
///
/// ```rust
/// use zzstatus::{CapabilityResolver, EntityKind, StatusId};
///
/// let golem = EntityKind::from_str("Golem");
/// let poison = StatusId::from_str("Poison");
///
/// let mut resolver = CapabilityResolver::new();
/// resolver.support(golem.clone(), poison.clone());
/// resolver.ban(golem.clone(), poison.clone());
///
/// // Ban wins.
/// assert!(!resolver.is_supported(&golem, &poison));
/// assert!(!resolver.is_explicitly_supported(&golem, &poison));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityResolver {
    kinds: HashMap<EntityKind, KindCapabilities>,
}

impl CapabilityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load declarations from a JSON object keyed by entity kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zzstatus::{CapabilityResolver, EntityKind, StatusId};
    ///
    /// let resolver = CapabilityResolver::from_json(r#"{
    ///     "Golem": { "banned": ["Poison", "Bleed"] },
    ///     "Totem": { "supported": ["Ward"], "restricted": true }
    /// }"#).unwrap();
    ///
    /// let totem = EntityKind::from_str("Totem");
    /// assert!(resolver.is_supported(&totem, &StatusId::from_str("Ward")));
    /// assert!(!resolver.is_supported(&totem, &StatusId::from_str("Haste")));
    /// ```
    pub fn from_json(json: &str) -> Result<Self, StatusError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replace the declarations for a kind.
    pub fn declare(&mut self, kind: EntityKind, capabilities: KindCapabilities) -> &mut Self {
        self.kinds.insert(kind, capabilities);
        self
    }

    pub fn support(&mut self, kind: EntityKind, status: StatusId) -> &mut Self {
        self.kinds.entry(kind).or_default().supported.insert(status);
        self
    }

    pub fn ban(&mut self, kind: EntityKind, status: StatusId) -> &mut Self {
        self.kinds.entry(kind).or_default().banned.insert(status);
        self
    }

    /// Only explicitly supported statuses pass for this kind.
    pub fn restrict(&mut self, kind: EntityKind) -> &mut Self {
        self.kinds.entry(kind).or_default().restricted = true;
        self
    }

    pub fn is_banned(&self, kind: &EntityKind, status: &StatusId) -> bool {
        self.kinds
            .get(kind)
            .is_some_and(|caps| caps.banned.contains(status))
    }

    /// Declared supported and not banned.
    pub fn is_explicitly_supported(&self, kind: &EntityKind, status: &StatusId) -> bool {
        self.kinds
            .get(kind)
            .is_some_and(|caps| caps.supported.contains(status) && !caps.banned.contains(status))
    }

    /// Not banned, and either declared supported or the kind is open-world.
    pub fn is_supported(&self, kind: &EntityKind, status: &StatusId) -> bool {
        match self.kinds.get(kind) {
            None => true,
            Some(caps) if caps.banned.contains(status) => false,
            Some(caps) => !caps.restricted || caps.supported.contains(status),
        }
    }
}
