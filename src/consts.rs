//! Shared timing and layout constants for the gesture controller.

// ── Timing ──────────────────────────────────────────────────────

/// How long a press must be held before it is promoted to an active drag.
pub const ARM_DELAY_MS: u64 = 1000;

/// How long the pointer must rest over a navigation target before it opens.
pub const HOVER_DELAY_MS: u64 = 500;

// ── Preview ─────────────────────────────────────────────────────

/// Horizontal offset of the floating preview from the pointer, in CSS pixels.
pub const PREVIEW_OFFSET_X: f64 = 10.0;

/// Vertical offset of the floating preview from the pointer, in CSS pixels.
pub const PREVIEW_OFFSET_Y: f64 = -20.0;
