//! Status notifications.
//!
//! Every mutating call produces an ordered list of events: the level
//! change first, then threshold events, then the lifecycle event. Events
//! are delivered synchronously to a caller-supplied [`StatusEventSink`].

use crate::entity::EntityRef;
use crate::instance::StatusInstance;
use crate::status_id::StatusId;
use serde::{Deserialize, Serialize};

/// What happened to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusEventKind {
    Added,
    Removed,
    /// The raw level moved by `delta` raw units.
    LevelChanged { delta: i64 },
    MaxStackReached,
    MinStackReached,
    MaxPercentageReached,
    MinPercentageReached,
}

/// A notification together with the owning entity and a snapshot of the
/// instance it concerns.
///
/// For `Removed` the snapshot is taken at level zero, just before the
/// instance is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub kind: StatusEventKind,
    pub owner: EntityRef,
    pub instance: StatusInstance,
}

impl StatusEvent {
    pub fn owner(&self) -> &EntityRef {
        &self.owner
    }

    pub fn status(&self) -> &StatusId {
        self.instance.status()
    }
}

/// Receiver of status events.
///
/// # Examples
///
/// ```rust
/// use zzstatus::event::{StatusEvent, StatusEventKind, StatusEventSink};
///
/// #[derive(Default)]
/// struct RemovalCounter(usize);
///
/// impl StatusEventSink for RemovalCounter {
///     fn notify(&mut self, event: StatusEvent) {
///         if event.kind == StatusEventKind::Removed {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait StatusEventSink {
    fn notify(&mut self, event: StatusEvent);
}

impl StatusEventSink for Vec<StatusEvent> {
    fn notify(&mut self, event: StatusEvent) {
        self.push(event);
    }
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl StatusEventSink for NullSink {
    fn notify(&mut self, _event: StatusEvent) {}
}

/// Count the events of one kind.
pub fn count_kind(events: &[StatusEvent], kind: StatusEventKind) -> usize {
    events.iter().filter(|event| event.kind == kind).count()
}
