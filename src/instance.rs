//! Status instances and their lifecycle.
//!
//! A `StatusInstance` is the live state of one status on one entity. Its
//! raw level is the only state that matters; the stack count and
//! percentage are derived from it through the instance's facet layout.

use crate::entity::EntityId;
use crate::level::{self, FacetLayout};
use crate::status_id::StatusId;
use serde::{Deserialize, Serialize};

/// Live state of one status on one entity.
///
/// # Examples
///
/// ```rust
/// use zzstatus::{EntityId, StatusInstance};
/// use zzstatus::level::{FacetLayout, SCALE};
///
/// let charge = StatusInstance::new("Charge".into(), EntityId(1), FacetLayout::Combined, 2 * SCALE + SCALE / 4);
/// assert_eq!(charge.stack_count(), 2);
/// assert_eq!(charge.percentage(), 0.25);
/// assert_eq!(charge.level(), 2.25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInstance {
    status: StatusId,
    raw_level: i64,
    owner: EntityId,
    layout: FacetLayout,
    /// Sweeps since the status was created or last increased.
    age: u64,
}

impl StatusInstance {
    pub fn new(status: StatusId, owner: EntityId, layout: FacetLayout, raw_level: i64) -> Self {
        Self {
            status,
            raw_level,
            owner,
            layout,
            age: 0,
        }
    }

    pub fn status(&self) -> &StatusId {
        &self.status
    }

    pub fn raw_level(&self) -> i64 {
        self.raw_level
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn layout(&self) -> FacetLayout {
        self.layout
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn stack_count(&self) -> i64 {
        self.layout.stack_count(self.raw_level)
    }

    pub fn percentage(&self) -> f64 {
        self.layout.percentage(self.raw_level)
    }

    /// Raw level as a scalar.
    pub fn level(&self) -> f64 {
        level::from_fixed(self.raw_level)
    }

    pub(crate) fn set_level(&mut self, raw_level: i64, layout: FacetLayout) {
        if raw_level > self.raw_level {
            self.age = 0;
        }
        self.raw_level = raw_level;
        self.layout = layout;
    }

    pub(crate) fn advance_age(&mut self) {
        self.age = self.age.saturating_add(1);
    }
}

/// Lifecycle state of a status type within one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Absent,
    Active,
    /// Level reached zero; the instance is dropped once its removal has
    /// been dispatched.
    PendingRemoval,
}

/// What a mutation does to an instance's existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Absent before and after; nothing to dispatch.
    None,
    /// Absent → Active.
    Created,
    /// Active → Active.
    Updated,
    /// Active → PendingRemoval → Absent.
    Destroyed,
}

impl Transition {
    /// Classify a mutation by whether the instance existed and the level it
    /// ends at.
    pub fn classify(existed: bool, new_level: i64) -> Self {
        match (existed, new_level != 0) {
            (false, false) => Transition::None,
            (false, true) => Transition::Created,
            (true, true) => Transition::Updated,
            (true, false) => Transition::Destroyed,
        }
    }

    /// State the instance is in while this call's events are dispatched.
    pub fn dispatch_state(self) -> LifecycleState {
        match self {
            Transition::None => LifecycleState::Absent,
            Transition::Created | Transition::Updated => LifecycleState::Active,
            Transition::Destroyed => LifecycleState::PendingRemoval,
        }
    }
}
