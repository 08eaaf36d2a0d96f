//! Error types for the host-facing edges of the crate.
//!
//! Gesture operations themselves never fail: calls that are invalid in the
//! current state are ignored. Only configuration loading and talking to a
//! runtime task that has already stopped can produce an error.

/// Failure to build a [`crate::config::GestureConfig`] from the environment.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    #[error("config parse failed: {var}={value:?}")]
    Parse { var: String, value: String },

    /// A value parsed but is outside the accepted range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure to reach the gesture runtime task.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GestureError {
    /// The runtime task has exited; the handle can no longer deliver events.
    #[error("gesture runtime has shut down")]
    RuntimeClosed,
}
