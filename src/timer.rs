//! Cancellable deferred actions.
//!
//! The controller owns two independent timers, one per [`TimerKind`], and
//! each holds at most one pending action. Every scheduled action is tagged
//! with a fresh [`TimerToken`]; a fire is honoured only while its token is
//! still the pending one. Cancelling therefore only prevents future firing
//! and never rolls back a transition that already happened.

#[cfg(test)]
#[path = "timer_test.rs"]
mod timer_test;

use std::fmt;
use std::time::Duration;

/// Which deferred action a timer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Promotes an arming press to an active drag.
    Arm,
    /// Opens the hovered navigation target.
    Hover,
}

/// Identifies one scheduled action. Never reused within a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// The clock and timer capability the controller is driven by.
pub trait Scheduler {
    /// Milliseconds elapsed on this scheduler's clock.
    fn now_ms(&self) -> u64;

    /// Schedule `token` to fire after `delay`, replacing anything pending for `kind`.
    fn schedule(&mut self, kind: TimerKind, token: TimerToken, delay: Duration);

    /// Drop the pending action for `kind` if it is `token`.
    fn cancel(&mut self, kind: TimerKind, token: TimerToken);
}

/// A single in-flight slot holding one pending action and its token.
#[derive(Debug)]
pub struct TimerSlot<T> {
    pending: Option<(TimerToken, T)>,
}

impl<T> Default for TimerSlot<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> TimerSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a pending action, returning the token it displaced, if any.
    pub fn set(&mut self, token: TimerToken, value: T) -> Option<TimerToken> {
        self.pending.replace((token, value)).map(|(old, _)| old)
    }

    /// Clear the slot if it holds `token`. Returns whether anything was removed.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        if self.token() == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Token of the pending action.
    #[must_use]
    pub fn token(&self) -> Option<TimerToken> {
        self.pending.as_ref().map(|(token, _)| *token)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.pending.as_ref().map(|(_, value)| value)
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.pending.as_mut().map(|(_, value)| value)
    }

    /// Remove and return the pending action.
    pub fn take(&mut self) -> Option<(TimerToken, T)> {
        self.pending.take()
    }
}

/// Convert a delay to whole milliseconds, saturating.
#[must_use]
pub fn duration_ms(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

/// Deterministic scheduler on a manually advanced clock.
///
/// Used by tests and by hosts that pump their own frame loop: the host calls
/// [`crate::controller::GestureController::advance`] with elapsed time and
/// due timers fire in deadline order.
#[derive(Debug, Default)]
pub struct VirtualTimers {
    now_ms: u64,
    arm: TimerSlot<u64>,
    hover: TimerSlot<u64>,
}

impl VirtualTimers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deadline of the pending action for `kind`, in clock milliseconds.
    #[must_use]
    pub fn deadline(&self, kind: TimerKind) -> Option<u64> {
        self.slot(kind).get().copied()
    }

    #[must_use]
    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.slot(kind).is_pending()
    }

    /// Pop the earliest action due at or before `until`, moving the clock to
    /// its deadline. Ties go to the arm timer.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerKind, TimerToken)> {
        let arm = self.arm.get().copied().filter(|d| *d <= until);
        let hover = self.hover.get().copied().filter(|d| *d <= until);
        let kind = match (arm, hover) {
            (Some(a), Some(h)) if h < a => TimerKind::Hover,
            (Some(_), _) => TimerKind::Arm,
            (None, Some(_)) => TimerKind::Hover,
            (None, None) => return None,
        };
        let (token, deadline) = self.slot_mut(kind).take()?;
        self.now_ms = self.now_ms.max(deadline);
        Some((kind, token))
    }

    /// Move the clock forward without firing anything.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    fn slot(&self, kind: TimerKind) -> &TimerSlot<u64> {
        match kind {
            TimerKind::Arm => &self.arm,
            TimerKind::Hover => &self.hover,
        }
    }

    fn slot_mut(&mut self, kind: TimerKind) -> &mut TimerSlot<u64> {
        match kind {
            TimerKind::Arm => &mut self.arm,
            TimerKind::Hover => &mut self.hover,
        }
    }
}

impl Scheduler for VirtualTimers {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn schedule(&mut self, kind: TimerKind, token: TimerToken, delay: Duration) {
        let deadline = self.now_ms.saturating_add(duration_ms(delay));
        self.slot_mut(kind).set(token, deadline);
    }

    fn cancel(&mut self, kind: TimerKind, token: TimerToken) {
        self.slot_mut(kind).cancel(token);
    }
}
