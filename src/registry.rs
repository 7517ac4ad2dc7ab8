//! Definition registry.
//!
//! The registry is the engine's only view of status definitions. It is
//! constructed explicitly and passed by reference into every mutating call;
//! collections look definitions up fresh on each call, so a registry can be
//! repopulated between calls.

use crate::behavior::StatusBehavior;
use crate::definition::StatusDefinition;
use crate::error::StatusError;
use crate::status_id::StatusId;
use std::collections::HashMap;
use tracing::debug;

/// Lookup capability consumed by status collections.
pub trait DefinitionLookup {
    /// The definition registered for `id`.
    fn definition(&self, id: &StatusId) -> Option<&StatusDefinition>;

    /// The behaviour registered for `id`, if any.
    fn behavior(&self, _id: &StatusId) -> Option<&dyn StatusBehavior> {
        None
    }
}

/// In-memory registry of definitions and behaviours.
///
/// # Examples
///
/// ```rust
/// use zzstatus::{DefinitionLookup, DefinitionRegistry, StatusId};
/// use zzstatus::definition::StatusDefinition;
///
/// let mut registry = DefinitionRegistry::new();
/// registry.register(StatusDefinition::new("Stunned")).unwrap();
///
/// assert!(registry.definition(&StatusId::from_str("Stunned")).is_some());
/// assert!(registry.definition(&StatusId::from_str("Frozen")).is_none());
/// ```
#[derive(Default)]
pub struct DefinitionRegistry {
    definitions: HashMap<StatusId, StatusDefinition>,
    behaviors: HashMap<StatusId, Box<dyn StatusBehavior>>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load definitions from a JSON array.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zzstatus::{DefinitionLookup, DefinitionRegistry, StatusId};
    /// use zzstatus::level::FacetLayout;
    ///
    /// let registry = DefinitionRegistry::from_json(r#"[
    ///     { "id": "Poison", "stackable": true, "max_stack": 10 },
    ///     { "id": "Focus", "has_percentage": true }
    /// ]"#).unwrap();
    ///
    /// let focus = registry.definition(&StatusId::from_str("Focus")).unwrap();
    /// assert_eq!(focus.layout(), FacetLayout::Percentage);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, StatusError> {
        let mut registry = Self::new();
        registry.load_json(json)?;
        Ok(registry)
    }

    /// Register every definition in a JSON array, replacing existing ones
    /// with the same id.
    ///
    /// Either all definitions are registered or none are.
    pub fn load_json(&mut self, json: &str) -> Result<usize, StatusError> {
        let mut definitions: Vec<StatusDefinition> = serde_json::from_str(json)?;
        for definition in &mut definitions {
            definition.validate()?;
        }
        let count = definitions.len();
        for definition in definitions {
            self.insert(definition);
        }
        Ok(count)
    }

    /// Register a definition, replacing any existing one with the same id.
    pub fn register(&mut self, mut definition: StatusDefinition) -> Result<(), StatusError> {
        definition.validate()?;
        self.insert(definition);
        Ok(())
    }

    fn insert(&mut self, definition: StatusDefinition) {
        debug!(status = %definition.id(), layout = ?definition.layout(), "registered status definition");
        self.definitions.insert(definition.id().clone(), definition);
    }

    /// Attach a behaviour to a status id.
    pub fn register_behavior(&mut self, id: impl Into<StatusId>, behavior: Box<dyn StatusBehavior>) {
        self.behaviors.insert(id.into(), behavior);
    }

    /// Remove a definition and its behaviour.
    pub fn unregister(&mut self, id: &StatusId) -> Option<StatusDefinition> {
        self.behaviors.remove(id);
        self.definitions.remove(id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<StatusId> {
        let mut ids: Vec<StatusId> = self.definitions.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl DefinitionLookup for DefinitionRegistry {
    fn definition(&self, id: &StatusId) -> Option<&StatusDefinition> {
        self.definitions.get(id)
    }

    fn behavior(&self, id: &StatusId) -> Option<&dyn StatusBehavior> {
        self.behaviors.get(id).map(|behavior| &**behavior)
    }
}

impl std::fmt::Debug for DefinitionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefinitionRegistry")
            .field("definitions", &self.ids())
            .field("behaviors", &self.behaviors.len())
            .finish()
    }
}
