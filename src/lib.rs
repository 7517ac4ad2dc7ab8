//! # zzstatus - Deterministic Status Effect Accounting
//!
//! A status effect engine for games that provides:
//! - **Deterministic** level arithmetic (fixed-point, no float drift)
//! - **Hardcode-free** design (no built-in status names like "Poison" or "Stun")
//! - **Capability-gated** mutations per entity kind
//! - **Event-driven** threshold and lifecycle notifications
//!
//! ## Core Concepts
//!
//! ### Status Pipeline
//!
//! Every mutation flows through the same pipeline:
//!
//! ```text
//! [CapabilityResolver] → [StatusDefinition] → [LevelDelta] → [ThresholdNotifier] → [StatusEvent]
//! ```
//!
//! 1. **Capabilities** decide whether the owner's kind may carry the status
//! 2. **Definitions** give the facets, limits and notification mode
//! 3. **Level deltas** are converted to fixed-point and clamped
//! 4. **Thresholds** are judged on the unclamped trajectory
//! 5. **Events** are dispatched synchronously to the caller's sink
//!
//! A status level is a single fixed-point integer: the integer part is the
//! stack count and the remainder is the percentage facet, so percentages
//! roll over into stacks naturally.
//!
//! ## Example
//!
//! ```rust
//! use zzstatus::*;
//! use zzstatus::definition::{NotificationMode, StatusDefinition};
//!
//! let mut registry = DefinitionRegistry::new();
//! registry.register(
//!     StatusDefinition::new("Bleed")
//!         .stackable()
//!         .with_max_stack(3)
//!         .with_notification(NotificationMode::PerUnit),
//! )?;
//!
//! let mut capabilities = CapabilityResolver::new();
//! capabilities.ban(EntityKind::from_str("Golem"), StatusId::from_str("Bleed"));
//!
//! let bleed = StatusId::from_str("Bleed");
//! let mut player = StatusCollection::new(EntityRef::new(1, "Player"));
//! let mut golem = StatusCollection::new(EntityRef::new(2, "Golem"));
//! let mut events: Vec<StatusEvent> = Vec::new();
//!
//! let mut env = StatusEnv::new(&registry, &capabilities, &mut events);
//! player.increase_stack(&mut env, &bleed, 5)?;
//! assert!(!golem.increase_stack(&mut env, &bleed, 5)?);
//!
//! assert_eq!(player.stack_count_of(&bleed), 3);
//! assert!(!golem.has(&bleed));
//! assert_eq!(event::count_kind(&events, StatusEventKind::MaxStackReached), 3);
//! # Ok::<(), StatusError>(())
//! ```
//!
//! ## Modules
//!
//! - [`status_id`] - Status identifier type
//! - [`entity`] - Entity identity and kinds
//! - [`level`] - Fixed-point level arithmetic
//! - [`definition`] - Status definitions
//! - [`registry`] - Definition and behaviour registry
//! - [`capability`] - Per-kind status capabilities
//! - [`threshold`] - Min/max threshold notifications
//! - [`instance`] - Status instances and lifecycle
//! - [`event`] - Status events and sinks
//! - [`collection`] - Per-entity status collections and sweeps
//! - [`behavior`] - Expiry and tick hooks
//! - [`context`] - Context for sweeps
//! - [`error`] - Error types

pub mod behavior;
pub mod capability;
pub mod collection;
pub mod context;
pub mod definition;
pub mod entity;
pub mod error;
pub mod event;
pub mod instance;
pub mod level;
pub mod registry;
pub mod status_id;
pub mod threshold;

// Re-export main types for convenience
pub use capability::{CapabilityResolver, KindCapabilities};
pub use collection::{StatusCollection, StatusEnv, SweepReport};
pub use context::TickContext;
pub use entity::{EntityId, EntityKind, EntityRef};
pub use error::StatusError;
pub use event::{NullSink, StatusEvent, StatusEventKind, StatusEventSink};
pub use instance::StatusInstance;
pub use registry::{DefinitionLookup, DefinitionRegistry};
pub use status_id::StatusId;

// Re-export definition and level types
pub use definition::{Capabilities, NotificationMode, StatusDefinition};
pub use level::{FacetLayout, LevelDelta, SCALE};

// Re-export built-in behaviours
pub use behavior::{Decay, ExpireWhen, FlagExpiry, StatusBehavior};
