//! Floating drag preview: what the renderer draws next to the pointer.
//!
//! The renderer is a pure reader of [`DragView`]; this module turns the
//! projection into a display model (anchor, badge, icon) so every host draws
//! the same indicator.

#[cfg(test)]
#[path = "preview_test.rs"]
mod preview_test;

use serde::Serialize;

use crate::consts::{PREVIEW_OFFSET_X, PREVIEW_OFFSET_Y};
use crate::controller::DragView;
use crate::input::Point;
use crate::payload::PayloadKind;

/// Icon shown in the preview badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreviewIcon {
    Wrench,
    User,
    FileText,
}

/// Badge color family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Blue,
    Green,
    Orange,
}

impl BadgeTone {
    /// Utility class for the badge background.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Blue => "bg-blue-500",
            Self::Green => "bg-green-500",
            Self::Orange => "bg-orange-500",
        }
    }
}

/// Everything needed to draw the preview for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewModel {
    /// Bottom-center anchor of the preview card, in viewport pixels.
    pub anchor: Point,
    pub badge: &'static str,
    pub tone: BadgeTone,
    pub icon: PreviewIcon,
    pub title: String,
}

impl PreviewModel {
    /// Build the preview for `view`, or `None` when nothing is being dragged.
    #[must_use]
    pub fn from_view(view: &DragView) -> Option<Self> {
        if !view.is_dragging {
            return None;
        }
        let payload = view.payload.as_ref()?;
        let (tone, icon) = match payload.kind {
            PayloadKind::Artisan => (BadgeTone::Blue, PreviewIcon::Wrench),
            PayloadKind::Client => (BadgeTone::Green, PreviewIcon::User),
            PayloadKind::Intervention => (BadgeTone::Orange, PreviewIcon::FileText),
        };
        Some(Self {
            anchor: Point::new(view.position.x + PREVIEW_OFFSET_X, view.position.y + PREVIEW_OFFSET_Y),
            badge: payload.kind.title(),
            tone,
            icon,
            title: payload.label.clone(),
        })
    }
}
