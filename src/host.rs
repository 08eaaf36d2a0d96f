//! Capabilities the controller borrows from its host: selection suppression
//! and navigation.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Identifies a view that can be opened by hovering over it while dragging.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub String);

impl TargetId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Turns text selection off while a drag is active.
///
/// The controller calls `suppress` exactly once when a gesture activates and
/// `restore` exactly once when it leaves the active state.
pub trait SelectionGuard {
    fn suppress(&mut self);
    fn restore(&mut self);
}

/// Switches the active view.
pub trait Navigator {
    fn navigate_to(&mut self, target: &TargetId);
}

impl<F> Navigator for F
where
    F: FnMut(&TargetId),
{
    fn navigate_to(&mut self, target: &TargetId) {
        self(target);
    }
}

/// Process-wide selection suppression flag.
///
/// The controller is the only writer; clones handed to renderers only read.
#[derive(Debug, Clone, Default)]
pub struct SelectionFlag {
    suppressed: Arc<AtomicBool>,
}

impl SelectionFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.suppressed.load(Ordering::Acquire)
    }
}

impl SelectionGuard for SelectionFlag {
    fn suppress(&mut self) {
        self.suppressed.store(true, Ordering::Release);
    }

    fn restore(&mut self) {
        self.suppressed.store(false, Ordering::Release);
    }
}
