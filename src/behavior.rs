//! Status behaviours.
//!
//! Behaviours are the per-status hooks a sweep runs: the expiry decision
//! for time-limited statuses and the per-tick update. They are registered
//! next to definitions in the [`DefinitionRegistry`](crate::DefinitionRegistry).
//! Statuses without a behaviour use the default policy, which expires a
//! status once its age reaches the definition's `duration`.

use crate::context::TickContext;
use crate::definition::StatusDefinition;
use crate::error::StatusError;
use crate::instance::StatusInstance;
use crate::level::LevelDelta;

/// Whether an instance has outlived its definition's duration.
///
/// Statuses without a duration never expire by age.
pub fn expired_by_duration(instance: &StatusInstance, definition: &StatusDefinition) -> bool {
    definition
        .duration()
        .is_some_and(|duration| instance.age() >= duration)
}

/// Hooks a sweep runs for one status type.
///
/// Hooks run synchronously; each completes before the sweep moves on to
/// the next instance. A hook never mutates the collection directly: the
/// delta it returns is applied through the ordinary mutation path, so it
/// gets the same clamping and events as any other call.
///
/// # Examples
///
/// ```rust
/// use zzstatus::behavior::StatusBehavior;
/// use zzstatus::level::LevelDelta;
/// use zzstatus::{StatusError, StatusInstance, TickContext};
///
/// struct Regrowth;
///
/// impl StatusBehavior for Regrowth {
///     fn on_tick(
///         &self,
///         _instance: &StatusInstance,
///         tick: &TickContext,
///     ) -> Result<Option<LevelDelta>, StatusError> {
///         // Grow a stack every other tick.
///         Ok((tick.tick() % 2 == 0).then_some(LevelDelta::Stacks(1)))
///     }
/// }
/// ```
pub trait StatusBehavior: Send + Sync {
    /// Decide whether the instance expires this sweep.
    ///
    /// The instance's age has already been advanced for this sweep.
    fn is_expired(
        &self,
        instance: &StatusInstance,
        definition: &StatusDefinition,
        _tick: &TickContext,
    ) -> Result<bool, StatusError> {
        Ok(expired_by_duration(instance, definition))
    }

    /// Per-tick update. The returned delta, if any, is applied to the
    /// instance before the sweep advances.
    fn on_tick(
        &self,
        _instance: &StatusInstance,
        _tick: &TickContext,
    ) -> Result<Option<LevelDelta>, StatusError> {
        Ok(None)
    }
}

/// Loses a fixed amount every tick.
///
/// # Examples
///
/// ```rust
/// use zzstatus::behavior::Decay;
/// use zzstatus::level::LevelDelta;
///
/// let poison = Decay::stacks(1);
/// assert_eq!(poison.delta(), LevelDelta::Stacks(-1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decay {
    delta: LevelDelta,
}

impl Decay {
    /// Lose `stacks` whole stacks per tick.
    pub fn stacks(stacks: i64) -> Self {
        Self {
            delta: LevelDelta::Stacks(stacks).reversed(),
        }
    }

    /// Lose `fraction` of a unit per tick.
    pub fn percentage(fraction: f64) -> Self {
        Self {
            delta: LevelDelta::Percentage(-fraction),
        }
    }

    pub fn delta(&self) -> LevelDelta {
        self.delta
    }
}

impl StatusBehavior for Decay {
    fn on_tick(
        &self,
        _instance: &StatusInstance,
        _tick: &TickContext,
    ) -> Result<Option<LevelDelta>, StatusError> {
        Ok(Some(self.delta))
    }
}

/// Expires when a predicate over the instance and tick holds, or when the
/// definition's duration runs out.
///
/// # Examples
///
/// ```rust
/// use zzstatus::behavior::ExpireWhen;
///
/// let dawn = ExpireWhen::new(|_instance, tick| tick.tick() >= 100, "expires at dawn");
/// assert_eq!(dawn.description(), "expires at dawn");
/// ```
pub struct ExpireWhen {
    predicate: Box<dyn Fn(&StatusInstance, &TickContext) -> bool + Send + Sync>,
    description: String,
}

impl ExpireWhen {
    pub fn new<F>(predicate: F, description: impl Into<String>) -> Self
    where
        F: Fn(&StatusInstance, &TickContext) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            description: description.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl std::fmt::Debug for ExpireWhen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpireWhen")
            .field("description", &self.description)
            .finish()
    }
}

impl StatusBehavior for ExpireWhen {
    fn is_expired(
        &self,
        instance: &StatusInstance,
        definition: &StatusDefinition,
        tick: &TickContext,
    ) -> Result<bool, StatusError> {
        Ok((self.predicate)(instance, tick) || expired_by_duration(instance, definition))
    }
}

/// Expires when a boolean tick context flag is set, e.g. `"combat_over"`.
///
/// A flag holding a non-boolean value is a `TypeMismatch`.
#[derive(Debug, Clone)]
pub struct FlagExpiry {
    key: String,
}

impl FlagExpiry {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl StatusBehavior for FlagExpiry {
    fn is_expired(
        &self,
        instance: &StatusInstance,
        definition: &StatusDefinition,
        tick: &TickContext,
    ) -> Result<bool, StatusError> {
        let flagged = tick.require::<bool>(&self.key)?.unwrap_or(false);
        Ok(flagged || expired_by_duration(instance, definition))
    }
}
