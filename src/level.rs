//! Fixed-point level arithmetic.
//!
//! A status level is a single `i64` holding both facets:
//! `raw = stack_count * SCALE + percentage_numerator`, with the numerator
//! always in `[0, SCALE)`. Float inputs are converted once at the call
//! boundary so repeated mutations never accumulate rounding drift.

use crate::error::StatusError;
use crate::status_id::StatusId;
use serde::{Deserialize, Serialize};

/// Number of raw units in one whole stack (or one full percentage).
pub const SCALE: i64 = 1_000_000;

/// Convert a scalar to fixed-point, rounding toward zero.
///
/// Returns `None` for NaN and infinities. Values outside the `i64` range
/// saturate.
///
/// # Examples
///
/// ```rust
/// use zzstatus::level::{to_fixed, SCALE};
///
/// assert_eq!(to_fixed(1.5), Some(SCALE + SCALE / 2));
/// assert_eq!(to_fixed(-0.25), Some(-SCALE / 4));
/// assert_eq!(to_fixed(f64::NAN), None);
/// ```
pub fn to_fixed(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    Some((value * SCALE as f64).trunc() as i64)
}

/// Convert a raw level back to a scalar.
pub fn from_fixed(raw: i64) -> f64 {
    raw as f64 / SCALE as f64
}

/// Whole stacks in a raw level, using floor division.
///
/// # Examples
///
/// ```rust
/// use zzstatus::level::{stack_count, SCALE};
///
/// assert_eq!(stack_count(3 * SCALE + 7), 3);
/// assert_eq!(stack_count(-1), -1);
/// ```
pub fn stack_count(raw: i64) -> i64 {
    raw.div_euclid(SCALE)
}

/// Non-negative remainder of a raw level below one whole stack.
pub fn percentage_numerator(raw: i64) -> i64 {
    raw.rem_euclid(SCALE)
}

/// How a status lays its facets out in the raw level.
///
/// Resolved once from the definition's capability bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacetLayout {
    /// Neither stackable nor percentage: present or absent, level in `[0, SCALE]`.
    Flag,
    /// Whole stacks only.
    Stack,
    /// Percentage only, level in `[0, SCALE]`.
    Percentage,
    /// Stacks with a fractional remainder that rolls over into stacks.
    Combined,
}

impl FacetLayout {
    pub fn has_stacks(self) -> bool {
        matches!(self, FacetLayout::Stack | FacetLayout::Combined)
    }

    pub fn has_percentage(self) -> bool {
        matches!(self, FacetLayout::Percentage | FacetLayout::Combined)
    }

    /// Stack count as seen through this layout.
    pub fn stack_count(self, raw: i64) -> i64 {
        match self {
            FacetLayout::Percentage => 0,
            _ => stack_count(raw),
        }
    }

    /// Percentage facet as seen through this layout.
    ///
    /// A percentage-only status reports its whole level, so a full status
    /// reads `1.0` instead of wrapping to `0.0`.
    pub fn percentage(self, raw: i64) -> f64 {
        match self {
            FacetLayout::Percentage => from_fixed(raw),
            FacetLayout::Combined => from_fixed(percentage_numerator(raw)),
            FacetLayout::Flag | FacetLayout::Stack => 0.0,
        }
    }
}

/// A requested level change, typed by the facet it addresses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LevelDelta {
    /// Whole stacks. Rejected by percentage-only statuses.
    Stacks(i64),
    /// Fraction of a full unit, `1.0` being one stack. Rejected by
    /// statuses without a percentage facet.
    Percentage(f64),
    /// Generic intensity, interpreted through the status layout. Statuses
    /// without a percentage facet drop the fractional part.
    Intensity(f64),
}

impl LevelDelta {
    fn kind_name(&self) -> &'static str {
        match self {
            LevelDelta::Stacks(_) => "stack delta",
            LevelDelta::Percentage(_) => "percentage delta",
            LevelDelta::Intensity(_) => "intensity delta",
        }
    }

    /// Negate the delta.
    pub fn reversed(self) -> Self {
        match self {
            LevelDelta::Stacks(n) => LevelDelta::Stacks(n.saturating_neg()),
            LevelDelta::Percentage(x) => LevelDelta::Percentage(-x),
            LevelDelta::Intensity(x) => LevelDelta::Intensity(-x),
        }
    }

    /// Convert to a raw delta for a status with the given layout.
    pub fn to_fixed(&self, status: &StatusId, layout: FacetLayout) -> Result<i64, StatusError> {
        let mismatch = |expected: &'static str| StatusError::TypeMismatch {
            subject: format!("status {status}"),
            expected,
            found: self.kind_name(),
        };
        let convert = |value: f64| {
            to_fixed(value)
                .ok_or_else(|| StatusError::InvalidDelta(status.clone(), format!("{value} is not finite")))
        };

        match (*self, layout) {
            (LevelDelta::Stacks(_), FacetLayout::Percentage) => Err(mismatch("percentage delta")),
            (LevelDelta::Stacks(n), _) => Ok(n.saturating_mul(SCALE)),
            (LevelDelta::Percentage(_), FacetLayout::Flag | FacetLayout::Stack) => {
                Err(mismatch("stack delta"))
            }
            (LevelDelta::Percentage(x), _) => convert(x),
            (LevelDelta::Intensity(x), FacetLayout::Percentage | FacetLayout::Combined) => convert(x),
            (LevelDelta::Intensity(x), FacetLayout::Flag | FacetLayout::Stack) => convert(x.trunc()),
        }
    }
}

/// Raw-level bounds. `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelLimits {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl LevelLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Limits expressed in whole stacks.
    pub fn stacks(min: Option<i64>, max: Option<i64>) -> Self {
        Self {
            min: min.map(|m| m.saturating_mul(SCALE)),
            max: max.map(|m| m.saturating_mul(SCALE)),
        }
    }

    /// Clamp a move from `current` toward `target`.
    ///
    /// The result never moves against the direction of travel, so a level
    /// already outside the bounds is left where it is rather than snapped.
    pub fn clamp(&self, current: i64, target: i64) -> i64 {
        if target > current {
            match self.max {
                Some(max) => target.min(max.max(current)),
                None => target,
            }
        } else if target < current {
            match self.min {
                Some(min) => target.max(min.min(current)),
                None => target,
            }
        } else {
            target
        }
    }
}

/// Outcome of one level mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStep {
    /// Level after clamping.
    pub level: i64,
    /// Level the delta would have produced without limits.
    pub unclamped: i64,
    pub clamped: bool,
}

impl LevelStep {
    /// A step that lands exactly on `target`, ignoring limits.
    pub fn to(target: i64) -> Self {
        Self {
            level: target,
            unclamped: target,
            clamped: false,
        }
    }
}

/// Apply a raw delta to a level and clamp against the limits.
///
/// # Examples
///
/// ```rust
/// use zzstatus::level::{apply, LevelLimits, SCALE};
///
/// let limits = LevelLimits::stacks(None, Some(3));
/// let step = apply(SCALE, 5 * SCALE, &limits);
/// assert_eq!(step.level, 3 * SCALE);
/// assert_eq!(step.unclamped, 6 * SCALE);
/// assert!(step.clamped);
/// ```
pub fn apply(current: i64, delta: i64, limits: &LevelLimits) -> LevelStep {
    let unclamped = current.saturating_add(delta);
    let level = limits.clamp(current, unclamped);
    LevelStep {
        level,
        unclamped,
        clamped: level != unclamped,
    }
}

/// Apply a whole-stack delta.
pub fn apply_stack_delta(current: i64, stacks: i64, limits: &LevelLimits) -> LevelStep {
    apply(current, stacks.saturating_mul(SCALE), limits)
}

/// Apply a fractional delta. Returns `None` when the delta is not finite.
pub fn apply_percentage_delta(current: i64, fraction: f64, limits: &LevelLimits) -> Option<LevelStep> {
    to_fixed(fraction).map(|delta| apply(current, delta, limits))
}
