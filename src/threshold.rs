//! Threshold notifications.
//!
//! Compares the level before and after a mutation and decides which
//! events fire. Stack boundaries are judged on the *unclamped* trajectory,
//! so a mutation that is clamped at the ceiling still reports how many
//! units it pushed against it.

use crate::definition::{NotificationMode, StatusDefinition};
use crate::event::StatusEventKind;
use crate::level::{stack_count, FacetLayout, LevelStep, SCALE};

/// Most events of one kind a `PerUnit` status fires in a single call.
///
/// A delta that crosses more units than this still reports the full count
/// in [`Notification::hits`].
pub const PER_UNIT_EVENT_CAP: u64 = 1_000;

/// One kind of event and how many times to dispatch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub kind: StatusEventKind,
    /// Events to dispatch.
    pub count: u64,
    /// Units that crossed the boundary, before the notification mode and
    /// cap were applied.
    pub hits: u64,
}

impl Notification {
    pub fn single(kind: StatusEventKind) -> Self {
        Self {
            kind,
            count: 1,
            hits: 1,
        }
    }

    pub fn is_capped(&self) -> bool {
        self.hits > self.count
    }
}

/// Total events of one kind across a list of notifications.
pub fn total(notifications: &[Notification], kind: StatusEventKind) -> u64 {
    notifications
        .iter()
        .filter(|n| n.kind == kind)
        .map(|n| n.count)
        .sum()
}

/// Threshold configuration of one status definition.
///
/// # Examples
///
/// ```rust
/// use zzstatus::definition::{NotificationMode, StatusDefinition};
/// use zzstatus::event::StatusEventKind;
/// use zzstatus::level::{apply_stack_delta, SCALE};
/// use zzstatus::threshold::{total, ThresholdNotifier};
///
/// let definition = StatusDefinition::new("Rage")
///     .stackable()
///     .with_max_stack(3)
///     .with_notification(NotificationMode::PerUnit);
/// let notifier = ThresholdNotifier::for_definition(&definition);
///
/// let step = apply_stack_delta(0, 5, &definition.limits());
/// let notifications = notifier.evaluate(0, &step);
///
/// assert_eq!(notifications[0].kind, StatusEventKind::LevelChanged { delta: 3 * SCALE });
/// assert_eq!(total(&notifications, StatusEventKind::MaxStackReached), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdNotifier {
    layout: FacetLayout,
    min_stack: Option<i64>,
    max_stack: Option<i64>,
    mode: NotificationMode,
}

impl ThresholdNotifier {
    pub fn new(
        layout: FacetLayout,
        min_stack: Option<i64>,
        max_stack: Option<i64>,
        mode: NotificationMode,
    ) -> Self {
        Self {
            layout,
            min_stack,
            max_stack,
            mode,
        }
    }

    pub fn for_definition(definition: &StatusDefinition) -> Self {
        Self::new(
            definition.layout(),
            definition.min_stack(),
            definition.max_stack(),
            definition.notification(),
        )
    }

    /// Notifications for a move from `old` along `step`, in dispatch order.
    ///
    /// `LevelChanged` comes first, then threshold events. Lifecycle events
    /// are appended by the collection.
    pub fn evaluate(&self, old: i64, step: &LevelStep) -> Vec<Notification> {
        let mut notifications = Vec::new();
        if step.level != old {
            notifications.push(Notification::single(StatusEventKind::LevelChanged {
                delta: step.level.saturating_sub(old),
            }));
        }

        match self.layout {
            FacetLayout::Stack | FacetLayout::Combined => {
                let from = stack_count(old);
                let to = stack_count(step.unclamped);
                let max_hits = self.max_stack.map_or(0, |max| units_at_or_above(from, to, max));
                let min_hits = self.min_stack.map_or(0, |min| units_at_or_below(from, to, min));
                self.push_hits(&mut notifications, StatusEventKind::MaxStackReached, max_hits);
                self.push_hits(&mut notifications, StatusEventKind::MinStackReached, min_hits);
            }
            FacetLayout::Percentage => {
                if old < SCALE && step.unclamped >= SCALE {
                    notifications.push(Notification::single(StatusEventKind::MaxPercentageReached));
                }
                if old > 0 && step.unclamped <= 0 {
                    notifications.push(Notification::single(StatusEventKind::MinPercentageReached));
                }
            }
            FacetLayout::Flag => {}
        }

        notifications
    }

    fn push_hits(&self, notifications: &mut Vec<Notification>, kind: StatusEventKind, hits: u64) {
        if hits == 0 {
            return;
        }
        let count = match self.mode {
            NotificationMode::Once => 1,
            NotificationMode::PerUnit => hits.min(PER_UNIT_EVENT_CAP),
        };
        notifications.push(Notification { kind, count, hits });
    }
}

/// Whole stack values visited going up from `from` (exclusive) to `to`
/// (inclusive) that lie at or above `max`.
fn units_at_or_above(from: i64, to: i64, max: i64) -> u64 {
    if to <= from || to < max {
        return 0;
    }
    let first = max.max(from.saturating_add(1));
    (i128::from(to) - i128::from(first) + 1) as u64
}

/// Whole stack values visited going down from `from` (exclusive) to `to`
/// (inclusive) that lie at or below `min`.
fn units_at_or_below(from: i64, to: i64, min: i64) -> u64 {
    if to >= from || to > min {
        return 0;
    }
    let first = min.min(from.saturating_sub(1));
    (i128::from(first) - i128::from(to) + 1) as u64
}
