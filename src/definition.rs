//! Status definitions.
//!
//! A `StatusDefinition` is static data describing one status type: which
//! facets it has, its stack limits and how loudly it reports reaching them.
//! Definitions are plain serde data so they can be loaded from JSON; the
//! capability bitset is resolved from the flags once, when the definition is
//! built or registered, and mutation logic only ever looks at the resolved
//! [`FacetLayout`].

use crate::error::StatusError;
use crate::level::{FacetLayout, LevelLimits, SCALE};
use crate::status_id::StatusId;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Facets a status carries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// The status has an integer stack count.
        const STACKABLE = 1 << 0;
        /// The status has a fractional percentage facet.
        const HAS_PERCENTAGE = 1 << 1;
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::empty()
    }
}

impl Capabilities {
    /// Resolve the level layout for this capability set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zzstatus::definition::Capabilities;
    /// use zzstatus::level::FacetLayout;
    ///
    /// let caps = Capabilities::STACKABLE | Capabilities::HAS_PERCENTAGE;
    /// assert_eq!(caps.layout(), FacetLayout::Combined);
    /// assert_eq!(Capabilities::empty().layout(), FacetLayout::Flag);
    /// ```
    pub fn layout(self) -> FacetLayout {
        match (
            self.contains(Capabilities::STACKABLE),
            self.contains(Capabilities::HAS_PERCENTAGE),
        ) {
            (false, false) => FacetLayout::Flag,
            (true, false) => FacetLayout::Stack,
            (false, true) => FacetLayout::Percentage,
            (true, true) => FacetLayout::Combined,
        }
    }
}

/// How many threshold events a single large mutation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NotificationMode {
    /// At most one min/max event per call.
    #[default]
    Once,
    /// One min/max event per whole stack visited at or beyond the boundary.
    PerUnit,
}

/// Static description of a status type.
///
/// # Examples
///
/// ```rust
/// use zzstatus::definition::{NotificationMode, StatusDefinition};
/// use zzstatus::level::FacetLayout;
///
/// let bleed = StatusDefinition::new("Bleed")
///     .stackable()
///     .with_max_stack(5)
///     .with_notification(NotificationMode::PerUnit);
///
/// assert_eq!(bleed.layout(), FacetLayout::Stack);
/// assert_eq!(bleed.max_stack(), Some(5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusDefinition {
    id: StatusId,
    #[serde(default)]
    stackable: bool,
    #[serde(default)]
    has_percentage: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_stack: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_stack: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_stack: Option<i64>,
    #[serde(default)]
    notification: NotificationMode,
    /// Lifetime in sweeps for time-limited statuses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<u64>,
    #[serde(skip)]
    capabilities: Capabilities,
}

impl StatusDefinition {
    /// A flag status: no stacks, no percentage.
    pub fn new(id: impl Into<StatusId>) -> Self {
        Self {
            id: id.into(),
            stackable: false,
            has_percentage: false,
            min_stack: None,
            max_stack: None,
            default_stack: None,
            notification: NotificationMode::Once,
            duration: None,
            capabilities: Capabilities::empty(),
        }
    }

    pub fn stackable(mut self) -> Self {
        self.stackable = true;
        self.resolve_capabilities();
        self
    }

    pub fn with_percentage(mut self) -> Self {
        self.has_percentage = true;
        self.resolve_capabilities();
        self
    }

    pub fn with_min_stack(mut self, min: i64) -> Self {
        self.min_stack = Some(min);
        self
    }

    pub fn with_max_stack(mut self, max: i64) -> Self {
        self.max_stack = Some(max);
        self
    }

    pub fn with_default_stack(mut self, stacks: i64) -> Self {
        self.default_stack = Some(stacks);
        self
    }

    pub fn with_notification(mut self, mode: NotificationMode) -> Self {
        self.notification = mode;
        self
    }

    /// Make the status time-limited: it expires after `ticks` sweeps.
    pub fn with_duration(mut self, ticks: u64) -> Self {
        self.duration = Some(ticks);
        self
    }

    pub fn id(&self) -> &StatusId {
        &self.id
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn layout(&self) -> FacetLayout {
        self.capabilities.layout()
    }

    pub fn min_stack(&self) -> Option<i64> {
        self.min_stack
    }

    pub fn max_stack(&self) -> Option<i64> {
        self.max_stack
    }

    pub fn default_stack(&self) -> Option<i64> {
        self.default_stack
    }

    pub fn notification(&self) -> NotificationMode {
        self.notification
    }

    pub fn duration(&self) -> Option<u64> {
        self.duration
    }

    /// Raw-level bounds for this definition.
    ///
    /// Flag and percentage-only statuses live in `[0, SCALE]`. Stackable
    /// statuses use their declared stack limits; a combined status without
    /// a declared minimum cannot borrow below zero, so a percentage
    /// underflow only converts into `-1` stack while stacks remain.
    pub fn limits(&self) -> LevelLimits {
        match self.layout() {
            FacetLayout::Flag | FacetLayout::Percentage => LevelLimits {
                min: Some(0),
                max: Some(SCALE),
            },
            FacetLayout::Stack => LevelLimits::stacks(self.min_stack, self.max_stack),
            FacetLayout::Combined => {
                LevelLimits::stacks(Some(self.min_stack.unwrap_or(0)), self.max_stack)
            }
        }
    }

    /// Raw level a reset moves the status to.
    pub fn default_level(&self) -> i64 {
        self.default_stack
            .map(|stacks| stacks.saturating_mul(SCALE))
            .unwrap_or(0)
    }

    fn resolve_capabilities(&mut self) {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::STACKABLE, self.stackable);
        caps.set(Capabilities::HAS_PERCENTAGE, self.has_percentage);
        self.capabilities = caps;
    }

    /// Resolve the capability bitset and check the limits are coherent.
    ///
    /// Called by the registry on every registration, so definitions that
    /// were deserialised rather than built are resolved too.
    pub fn validate(&mut self) -> Result<(), StatusError> {
        self.resolve_capabilities();
        let invalid = |reason: &str| Err(StatusError::InvalidDefinition(self.id.clone(), reason.into()));

        let layout = self.layout();
        if !layout.has_stacks() && (self.min_stack.is_some() || self.max_stack.is_some()) {
            return invalid("stack limits require a stackable status");
        }
        if let (Some(min), Some(max)) = (self.min_stack, self.max_stack) {
            if min > max {
                return invalid("min_stack is greater than max_stack");
            }
        }
        if layout == FacetLayout::Combined
            && self.min_stack.is_none()
            && self.max_stack.is_some_and(|max| max < 0)
        {
            return invalid("max_stack is below the implicit floor of zero");
        }
        if let Some(default) = self.default_stack {
            match layout {
                FacetLayout::Percentage => return invalid("default_stack requires a stack facet"),
                FacetLayout::Flag if !(0..=1).contains(&default) => {
                    return invalid("default_stack of a flag status must be 0 or 1")
                }
                _ => {}
            }
            if self.min_stack.is_some_and(|min| default < min)
                || self.max_stack.is_some_and(|max| default > max)
            {
                return invalid("default_stack is outside the stack limits");
            }
        }
        Ok(())
    }
}
