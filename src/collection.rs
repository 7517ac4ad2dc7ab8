//! Per-entity status collections.
//!
//! The `StatusCollection` is the main entry point of the engine. Every
//! mutating call runs the same pipeline:
//! 1. Gate the status against the owner's capabilities
//! 2. Look the definition up fresh in the registry
//! 3. Convert and clamp the level change
//! 4. Evaluate threshold events on the unclamped trajectory
//! 5. Create, update or destroy the instance and dispatch events

use crate::capability::CapabilityResolver;
use crate::context::TickContext;
use crate::definition::StatusDefinition;
use crate::entity::EntityRef;
use crate::error::StatusError;
use crate::event::{StatusEvent, StatusEventKind, StatusEventSink};
use crate::instance::{LifecycleState, StatusInstance, Transition};
use crate::level::{self, LevelDelta, LevelStep};
use crate::registry::DefinitionLookup;
use crate::status_id::StatusId;
use crate::threshold::{Notification, ThresholdNotifier};
use tracing::{debug, trace, warn};

/// Collaborators a mutating call needs.
///
/// Built by the caller for each batch of calls; the collection keeps no
/// reference to the registry between calls.
pub struct StatusEnv<'a> {
    pub registry: &'a dyn DefinitionLookup,
    pub capabilities: &'a CapabilityResolver,
    pub sink: &'a mut dyn StatusEventSink,
}

impl<'a> StatusEnv<'a> {
    pub fn new(
        registry: &'a dyn DefinitionLookup,
        capabilities: &'a CapabilityResolver,
        sink: &'a mut dyn StatusEventSink,
    ) -> Self {
        Self {
            registry,
            capabilities,
            sink,
        }
    }
}

/// Summary of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Statuses removed by the expiry pass, in visit order.
    pub expired: Vec<StatusId>,
    /// Statuses whose tick hook returned a delta, in visit order.
    pub updated: Vec<StatusId>,
}

enum Change {
    Delta(LevelDelta),
    /// Move straight to a raw level in one step, ignoring limits.
    Set(i64),
}

/// The statuses currently active on one entity.
///
/// # Examples
///
/// ```rust
/// use zzstatus::*;
/// use zzstatus::definition::StatusDefinition;
///
/// let mut registry = DefinitionRegistry::new();
/// registry.register(StatusDefinition::new("Charge").stackable().with_percentage())?;
/// let capabilities = CapabilityResolver::new();
///
/// let charge = StatusId::from_str("Charge");
/// let mut statuses = StatusCollection::new(EntityRef::new(1, "Player"));
/// let mut events: Vec<StatusEvent> = Vec::new();
///
/// let mut env = StatusEnv::new(&registry, &capabilities, &mut events);
/// statuses.increase_percentage(&mut env, &charge, 2.5)?;
///
/// assert_eq!(statuses.stack_count_of(&charge), 2);
/// assert_eq!(statuses.percentage_of(&charge), 0.5);
/// assert_eq!(events.last().map(|e| e.kind), Some(StatusEventKind::Added));
/// # Ok::<(), StatusError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StatusCollection {
    owner: EntityRef,
    instances: Vec<StatusInstance>,
}

impl StatusCollection {
    pub fn new(owner: EntityRef) -> Self {
        Self {
            owner,
            instances: Vec::new(),
        }
    }

    pub fn owner(&self) -> &EntityRef {
        &self.owner
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Active instances in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &StatusInstance> {
        self.instances.iter()
    }

    pub fn has(&self, status: &StatusId) -> bool {
        self.position(status).is_some()
    }

    pub fn get(&self, status: &StatusId) -> Option<&StatusInstance> {
        self.instances.iter().find(|instance| instance.status() == status)
    }

    /// Stack count, or 0 when the status is absent.
    pub fn stack_count_of(&self, status: &StatusId) -> i64 {
        self.get(status).map_or(0, StatusInstance::stack_count)
    }

    /// Percentage facet, or 0.0 when the status is absent.
    pub fn percentage_of(&self, status: &StatusId) -> f64 {
        self.get(status).map_or(0.0, StatusInstance::percentage)
    }

    /// Add `amount` of intensity.
    ///
    /// Re-adding an active status merges into the existing instance.
    /// Returns `Ok(false)` when the status is unknown or not supported by
    /// the owner; nothing changes and no event fires.
    pub fn add(&mut self, env: &mut StatusEnv<'_>, status: &StatusId, amount: f64) -> Result<bool, StatusError> {
        self.apply(env, status, LevelDelta::Intensity(amount))
    }

    /// Remove `amount` of intensity.
    pub fn remove(&mut self, env: &mut StatusEnv<'_>, status: &StatusId, amount: f64) -> Result<bool, StatusError> {
        self.apply(env, status, LevelDelta::Intensity(-amount))
    }

    pub fn increase_stack(&mut self, env: &mut StatusEnv<'_>, status: &StatusId, stacks: i64) -> Result<bool, StatusError> {
        self.apply(env, status, LevelDelta::Stacks(stacks))
    }

    pub fn decrease_stack(&mut self, env: &mut StatusEnv<'_>, status: &StatusId, stacks: i64) -> Result<bool, StatusError> {
        self.apply(env, status, LevelDelta::Stacks(stacks).reversed())
    }

    pub fn increase_percentage(&mut self, env: &mut StatusEnv<'_>, status: &StatusId, fraction: f64) -> Result<bool, StatusError> {
        self.apply(env, status, LevelDelta::Percentage(fraction))
    }

    pub fn decrease_percentage(&mut self, env: &mut StatusEnv<'_>, status: &StatusId, fraction: f64) -> Result<bool, StatusError> {
        self.apply(env, status, LevelDelta::Percentage(-fraction))
    }

    /// Apply a typed level delta.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The call was accepted (even if clamping left the level unchanged)
    /// * `Ok(false)` - The status is unknown or not supported by the owner
    /// * `Err(StatusError)` - The delta does not fit the status, or is not finite
    pub fn apply(&mut self, env: &mut StatusEnv<'_>, status: &StatusId, delta: LevelDelta) -> Result<bool, StatusError> {
        self.gated(env, status, Change::Delta(delta))
    }

    /// Drive a status to zero in one step, ignoring its minimum.
    ///
    /// Fires a single `Removed` however large the level was.
    pub fn clear(&mut self, env: &mut StatusEnv<'_>, status: &StatusId) -> Result<bool, StatusError> {
        self.gated(env, status, Change::Set(0))
    }

    /// Clear every active status. Returns how many were removed.
    pub fn clear_all(&mut self, env: &mut StatusEnv<'_>) -> Result<usize, StatusError> {
        let mut removed = 0;
        for index in (0..self.instances.len()).rev() {
            let status = self.instances[index].status().clone();
            if self.clear(env, &status)? && !self.has(&status) {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Move a status to its definition's default stack in one step.
    ///
    /// Without a default the status is cleared.
    pub fn reset(&mut self, env: &mut StatusEnv<'_>, status: &StatusId) -> Result<bool, StatusError> {
        let Some(definition) = self.gate(env, status)? else {
            return Ok(false);
        };
        self.change(env, status, definition, Change::Set(definition.default_level()))?;
        Ok(true)
    }

    /// Reset every active status.
    pub fn reset_all(&mut self, env: &mut StatusEnv<'_>) -> Result<(), StatusError> {
        for index in (0..self.instances.len()).rev() {
            let status = self.instances[index].status().clone();
            self.reset(env, &status)?;
        }
        Ok(())
    }

    /// Run one tick.
    ///
    /// Both passes walk the collection in reverse index order so removals
    /// never disturb the indices still to be visited.
    /// 1. Advance every instance's age and remove the ones that expire
    /// 2. Run each remaining instance's tick hook and apply its delta
    ///
    /// Each hook completes before the next instance is visited. A failing
    /// hook stops the sweep; mutations already applied are kept.
    pub fn sweep(&mut self, env: &mut StatusEnv<'_>, tick: &TickContext) -> Result<SweepReport, StatusError> {
        let registry = env.registry;
        let mut report = SweepReport::default();

        for index in (0..self.instances.len()).rev() {
            self.instances[index].advance_age();
            let status = self.instances[index].status().clone();
            let Some(definition) = registry.definition(&status) else {
                warn!(owner = %self.owner.id, %status, tick = tick.tick(), "sweep skipped status without definition");
                continue;
            };
            let instance = &self.instances[index];
            let expired = match registry.behavior(&status) {
                Some(behavior) => behavior.is_expired(instance, definition, tick)?,
                None => crate::behavior::expired_by_duration(instance, definition),
            };
            if expired {
                debug!(owner = %self.owner.id, %status, age = instance.age(), "status expired");
                self.change(env, &status, definition, Change::Set(0))?;
                report.expired.push(status);
            }
        }

        for index in (0..self.instances.len()).rev() {
            let status = self.instances[index].status().clone();
            let Some(behavior) = registry.behavior(&status) else {
                continue;
            };
            if let Some(delta) = behavior.on_tick(&self.instances[index], tick)? {
                if self.apply(env, &status, delta)? {
                    report.updated.push(status);
                }
            }
        }

        trace!(owner = %self.owner.id, tick = tick.tick(), ?report, "sweep finished");
        Ok(report)
    }

    fn position(&self, status: &StatusId) -> Option<usize> {
        self.instances.iter().position(|instance| instance.status() == status)
    }

    /// Capability gate. `Ok(None)` is a logged rejection.
    fn gate<'r>(&self, env: &StatusEnv<'r>, status: &StatusId) -> Result<Option<&'r StatusDefinition>, StatusError> {
        let registry: &'r dyn DefinitionLookup = env.registry;
        let checked = if env.capabilities.is_supported(&self.owner.kind, status) {
            registry
                .definition(status)
                .ok_or_else(|| StatusError::DefinitionNotFound(status.clone()))
        } else {
            Err(StatusError::Unsupported {
                status: status.clone(),
                kind: self.owner.kind.clone(),
            })
        };

        match checked {
            Ok(definition) => Ok(Some(definition)),
            Err(err) if err.is_rejection() => {
                warn!(owner = %self.owner.id, %status, "status mutation rejected: {err}");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn gated(&mut self, env: &mut StatusEnv<'_>, status: &StatusId, change: Change) -> Result<bool, StatusError> {
        let Some(definition) = self.gate(env, status)? else {
            return Ok(false);
        };
        self.change(env, status, definition, change)?;
        Ok(true)
    }

    /// Apply a change to a status whose definition has already been
    /// resolved, and dispatch its events.
    fn change(
        &mut self,
        env: &mut StatusEnv<'_>,
        status: &StatusId,
        definition: &StatusDefinition,
        change: Change,
    ) -> Result<(), StatusError> {
        let layout = definition.layout();
        let index = self.position(status);
        let old = index.map_or(0, |i| self.instances[i].raw_level());

        let step = match change {
            Change::Delta(delta) => {
                let raw = delta.to_fixed(status, layout)?;
                level::apply(old, raw, &definition.limits())
            }
            Change::Set(target) => LevelStep::to(target),
        };
        trace!(owner = %self.owner.id, %status, old, new = step.level, unclamped = step.unclamped, "level step");

        let transition = Transition::classify(index.is_some(), step.level);
        let state = transition.dispatch_state();
        let index = match (state, index) {
            (LifecycleState::Absent, _) => return Ok(()),
            (_, Some(i)) => {
                self.instances[i].set_level(step.level, layout);
                i
            }
            (_, None) => {
                self.instances.push(StatusInstance::new(
                    status.clone(),
                    self.owner.id,
                    layout,
                    step.level,
                ));
                self.instances.len() - 1
            }
        };

        let mut notifications = ThresholdNotifier::for_definition(definition).evaluate(old, &step);
        match transition {
            Transition::Created => notifications.push(Notification::single(StatusEventKind::Added)),
            Transition::Destroyed => notifications.push(Notification::single(StatusEventKind::Removed)),
            _ => {}
        }
        for notification in &notifications {
            if notification.is_capped() {
                debug!(
                    owner = %self.owner.id,
                    %status,
                    kind = ?notification.kind,
                    hits = notification.hits,
                    dispatched = notification.count,
                    "per-unit notifications capped"
                );
            }
            for _ in 0..notification.count {
                env.sink.notify(StatusEvent {
                    kind: notification.kind,
                    owner: self.owner.clone(),
                    instance: self.instances[index].clone(),
                });
            }
        }

        if state == LifecycleState::PendingRemoval {
            self.instances.remove(index);
            debug!(owner = %self.owner.id, %status, "status removed");
        } else if transition == Transition::Created {
            debug!(owner = %self.owner.id, %status, level = step.level, "status added");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::NotificationMode;
    use crate::event::count_kind;
    use crate::level::SCALE;
    use crate::registry::DefinitionRegistry;
    use crate::threshold::PER_UNIT_EVENT_CAP;

    fn registry() -> DefinitionRegistry {
        let mut registry = DefinitionRegistry::new();
        registry
            .register(StatusDefinition::new("Charge").stackable().with_percentage())
            .unwrap();
        registry
            .register(StatusDefinition::new("Rage").stackable().with_max_stack(3))
            .unwrap();
        registry
            .register(
                StatusDefinition::new("Bleed")
                    .stackable()
                    .with_min_stack(0)
                    .with_max_stack(3)
                    .with_notification(NotificationMode::PerUnit),
            )
            .unwrap();
        registry.register(StatusDefinition::new("Stunned")).unwrap();
        registry
            .register(StatusDefinition::new("Focus").with_percentage())
            .unwrap();
        registry
    }

    fn id(name: &str) -> StatusId {
        StatusId::from_str(name)
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        let registry = registry();
        let caps = CapabilityResolver::new();
        let mut events = Vec::new();
        let mut statuses = StatusCollection::new(EntityRef::new(1, "Player"));
        let charge = id("Charge");

        let mut env = StatusEnv::new(&registry, &caps, &mut events);
        assert!(statuses.add(&mut env, &charge, 4.5).unwrap());
        assert!(statuses.remove(&mut env, &charge, 4.5).unwrap());

        assert!(!statuses.has(&charge));
        assert_eq!(count_kind(&events, StatusEventKind::Added), 1);
        assert_eq!(count_kind(&events, StatusEventKind::Removed), 1);
    }

    #[test]
    fn test_event_order_on_creation_and_removal() {
        let registry = registry();
        let caps = CapabilityResolver::new();
        let mut events = Vec::new();
        let mut statuses = StatusCollection::new(EntityRef::new(1, "Player"));
        let bleed = id("Bleed");

        let mut env = StatusEnv::new(&registry, &caps, &mut events);
        statuses.increase_stack(&mut env, &bleed, 3).unwrap();
        statuses.decrease_stack(&mut env, &bleed, 3).unwrap();

        let kinds: Vec<StatusEventKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StatusEventKind::LevelChanged { delta: 3 * SCALE },
                StatusEventKind::MaxStackReached,
                StatusEventKind::Added,
                StatusEventKind::LevelChanged { delta: -3 * SCALE },
                StatusEventKind::MinStackReached,
                StatusEventKind::Removed,
            ]
        );
        assert_eq!(events[5].instance.raw_level(), 0);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let registry = registry();
        let caps = CapabilityResolver::new();
        let mut events = Vec::new();
        let mut statuses = StatusCollection::new(EntityRef::new(1, "Player"));

        let mut env = StatusEnv::new(&registry, &caps, &mut events);
        let accepted = statuses.add(&mut env, &id("Frozen"), 1.0).unwrap();

        assert!(!accepted);
        assert!(statuses.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_type_mismatch_is_surfaced() {
        let registry = registry();
        let caps = CapabilityResolver::new();
        let mut events = Vec::new();
        let mut statuses = StatusCollection::new(EntityRef::new(1, "Player"));

        let mut env = StatusEnv::new(&registry, &caps, &mut events);
        let result = statuses.increase_percentage(&mut env, &id("Rage"), 0.5);

        assert!(matches!(result, Err(StatusError::TypeMismatch { .. })));
        assert!(statuses.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_decrease_on_absent_status_at_floor_is_silent() {
        let registry = registry();
        let caps = CapabilityResolver::new();
        let mut events = Vec::new();
        let mut statuses = StatusCollection::new(EntityRef::new(1, "Player"));

        let mut env = StatusEnv::new(&registry, &caps, &mut events);
        assert!(statuses.decrease_stack(&mut env, &id("Bleed"), 2).unwrap());

        assert!(statuses.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_combined_underflow_borrows_a_stack() {
        let registry = registry();
        let caps = CapabilityResolver::new();
        let mut events = Vec::new();
        let mut statuses = StatusCollection::new(EntityRef::new(1, "Player"));
        let charge = id("Charge");

        let mut env = StatusEnv::new(&registry, &caps, &mut events);
        statuses.increase_percentage(&mut env, &charge, 1.25).unwrap();
        statuses.decrease_percentage(&mut env, &charge, 0.5).unwrap();

        assert_eq!(statuses.stack_count_of(&charge), 0);
        assert_eq!(statuses.percentage_of(&charge), 0.75);
    }

    #[test]
    fn test_combined_underflow_without_stacks_removes() {
        let registry = registry();
        let caps = CapabilityResolver::new();
        let mut events = Vec::new();
        let mut statuses = StatusCollection::new(EntityRef::new(1, "Player"));
        let charge = id("Charge");

        let mut env = StatusEnv::new(&registry, &caps, &mut events);
        statuses.increase_percentage(&mut env, &charge, 0.25).unwrap();
        statuses.decrease_percentage(&mut env, &charge, 0.5).unwrap();

        assert!(!statuses.has(&charge));
        assert_eq!(statuses.stack_count_of(&charge), 0);
        assert_eq!(count_kind(&events, StatusEventKind::Removed), 1);
        assert_eq!(
            events.last().map(|e| e.instance.raw_level()),
            Some(0)
        );
    }

    #[test]
    fn test_combined_absent_decrease_is_silent() {
        let registry = registry();
        let caps = CapabilityResolver::new();
        let mut events = Vec::new();
        let mut statuses = StatusCollection::new(EntityRef::new(1, "Player"));

        let mut env = StatusEnv::new(&registry, &caps, &mut events);
        statuses.decrease_percentage(&mut env, &id("Charge"), 0.25).unwrap();

        assert!(statuses.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_per_unit_huge_delta_is_capped() {
        let registry = registry();
        let caps = CapabilityResolver::new();
        let mut events = Vec::new();
        let mut statuses = StatusCollection::new(EntityRef::new(1, "Player"));
        let bleed = id("Bleed");

        let mut env = StatusEnv::new(&registry, &caps, &mut events);
        assert!(statuses.increase_stack(&mut env, &bleed, i64::MAX).unwrap());

        assert_eq!(statuses.stack_count_of(&bleed), 3);
        assert_eq!(
            count_kind(&events, StatusEventKind::MaxStackReached) as u64,
            PER_UNIT_EVENT_CAP
        );
        assert_eq!(count_kind(&events, StatusEventKind::Added), 1);
        assert_eq!(events.last().map(|e| e.kind), Some(StatusEventKind::Added));
    }

    #[test]
    fn test_events_carry_owner_reference() {
        let registry = registry();
        let caps = CapabilityResolver::new();
        let mut events = Vec::new();
        let mut statuses = StatusCollection::new(EntityRef::new(4, "Golem"));

        let mut env = StatusEnv::new(&registry, &caps, &mut events);
        statuses.add(&mut env, &id("Stunned"), 1.0).unwrap();

        assert!(!events.is_empty());
        assert!(events.iter().all(|e| e.owner() == &EntityRef::new(4, "Golem")));
    }

    #[test]
    fn test_clear_ignores_min_and_fires_once() {
        let mut registry = registry();
        registry
            .register(StatusDefinition::new("Ward").stackable().with_min_stack(2))
            .unwrap();
        let caps = CapabilityResolver::new();
        let mut events = Vec::new();
        let mut statuses = StatusCollection::new(EntityRef::new(1, "Player"));
        let ward = id("Ward");

        let mut env = StatusEnv::new(&registry, &caps, &mut events);
        statuses.increase_stack(&mut env, &ward, 50).unwrap();
        statuses.decrease_stack(&mut env, &ward, 100).unwrap();
        assert_eq!(statuses.stack_count_of(&ward), 2);

        assert!(statuses.clear(&mut env, &ward).unwrap());
        assert!(!statuses.has(&ward));
        assert_eq!(count_kind(&events, StatusEventKind::Removed), 1);
    }

    #[test]
    fn test_queries_on_absent_status() {
        let statuses = StatusCollection::new(EntityRef::new(1, "Player"));
        let charge = id("Charge");
        assert!(!statuses.has(&charge));
        assert!(statuses.get(&charge).is_none());
        assert_eq!(statuses.stack_count_of(&charge), 0);
        assert_eq!(statuses.percentage_of(&charge), 0.0);
    }

    #[test]
    fn test_flag_status_is_idempotent() {
        let registry = registry();
        let caps = CapabilityResolver::new();
        let mut events = Vec::new();
        let mut statuses = StatusCollection::new(EntityRef::new(1, "Player"));
        let stunned = id("Stunned");

        let mut env = StatusEnv::new(&registry, &caps, &mut events);
        statuses.add(&mut env, &stunned, 1.0).unwrap();
        statuses.add(&mut env, &stunned, 1.0).unwrap();

        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses.stack_count_of(&stunned), 1);
        assert_eq!(count_kind(&events, StatusEventKind::Added), 1);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_percentage_only_status_caps_at_full() {
        let registry = registry();
        let caps = CapabilityResolver::new();
        let mut events = Vec::new();
        let mut statuses = StatusCollection::new(EntityRef::new(1, "Player"));
        let focus = id("Focus");

        let mut env = StatusEnv::new(&registry, &caps, &mut events);
        statuses.increase_percentage(&mut env, &focus, 0.75).unwrap();
        statuses.increase_percentage(&mut env, &focus, 0.5).unwrap();
        statuses.increase_percentage(&mut env, &focus, 0.5).unwrap();

        assert_eq!(statuses.percentage_of(&focus), 1.0);
        assert_eq!(statuses.stack_count_of(&focus), 0);
        assert_eq!(count_kind(&events, StatusEventKind::MaxPercentageReached), 1);
    }
}
