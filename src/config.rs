//! Gesture timing configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::consts::{ARM_DELAY_MS, HOVER_DELAY_MS};
use crate::error::ConfigError;

pub const ARM_DELAY_VAR: &str = "DND_ARM_DELAY_MS";
pub const HOVER_DELAY_VAR: &str = "DND_HOVER_DELAY_MS";
pub const ARM_CANCEL_VAR: &str = "DND_ARM_CANCEL_PX";

/// Timing knobs for the gesture controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Minimum hold before a press becomes an active drag.
    pub arm_delay: Duration,
    /// Minimum continuous hover before a navigation target opens.
    pub hover_delay: Duration,
    /// If set, a pointer that strays further than this many pixels from the
    /// press origin while arming cancels the pending gesture.
    pub arm_cancel_distance: Option<f64>,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            arm_delay: Duration::from_millis(ARM_DELAY_MS),
            hover_delay: Duration::from_millis(HOVER_DELAY_MS),
            arm_cancel_distance: None,
        }
    }
}

impl GestureConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `DND_ARM_DELAY_MS`: default 1000
    /// - `DND_HOVER_DELAY_MS`: default 500
    /// - `DND_ARM_CANCEL_PX`: unset disables the stray check
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent) => None,
            // Surface the lossy form so the parse error names the bad value.
            Err(std::env::VarError::NotUnicode(raw)) => Some(raw.to_string_lossy().into_owned()),
        })
    }

    /// Build config from an arbitrary key lookup. `from_env` delegates here.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let arm_ms = parse_var::<u64>(&lookup, ARM_DELAY_VAR)?.unwrap_or(ARM_DELAY_MS);
        let hover_ms = parse_var::<u64>(&lookup, HOVER_DELAY_VAR)?.unwrap_or(HOVER_DELAY_MS);
        let arm_cancel_distance = parse_var::<f64>(&lookup, ARM_CANCEL_VAR)?;

        if hover_ms == 0 {
            return Err(ConfigError::Invalid(format!("{HOVER_DELAY_VAR} must be greater than zero")));
        }
        if let Some(px) = arm_cancel_distance {
            if !px.is_finite() || px <= 0.0 {
                return Err(ConfigError::Invalid(format!("{ARM_CANCEL_VAR} must be a positive distance, got {px}")));
            }
        }

        Ok(Self {
            arm_delay: Duration::from_millis(arm_ms),
            hover_delay: Duration::from_millis(hover_ms),
            arm_cancel_distance,
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::Parse { var: var.to_string(), value: raw.clone() })
}
