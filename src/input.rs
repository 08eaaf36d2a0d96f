//! Input model: points, raw device events, and the unified pointer session.
//!
//! Mouse and touch arrive as different raw event shapes but mean the same
//! thing to the gesture controller: press, move, release, or cancel. Each
//! device class gets one [`InputAdapter`] that translates its raw events into
//! [`SessionEvent`]s, and a [`PointerSession`] feeds those into any
//! [`GestureSink`], so arm/cancel logic exists exactly once.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use tracing::debug;

use crate::controller::GestureSink;
use crate::payload::DragPayload;

/// A point in viewport (CSS pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Why a gesture ended without a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// A second touch point appeared.
    MultiTouch,
    /// The platform took the pointer away (`touchcancel`, lost capture).
    PointerCaptureLost,
    /// The window lost focus.
    WindowBlur,
    /// The host view owning the controller went away.
    Unmount,
    /// The pointer moved too far from the press origin while arming.
    PointerStrayed,
}

/// Device-independent pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    Press(Point),
    Move(Point),
    Release,
    Cancel(CancelReason),
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Raw mouse event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseInput {
    Down { point: Point, button: MouseButton },
    Move { point: Point },
    Up { button: MouseButton },
}

/// Raw touch event as delivered by the host.
///
/// `touches` lists every point currently on the surface, as `TouchEvent.touches` does.
#[derive(Debug, Clone, PartialEq)]
pub enum TouchInput {
    Start { touches: Vec<Point> },
    Move { touches: Vec<Point> },
    End,
    Cancel,
}

/// Translates one device class's raw events into [`SessionEvent`]s.
pub trait InputAdapter {
    type Raw;

    fn translate(&mut self, raw: &Self::Raw) -> Option<SessionEvent>;

    /// Forget any in-progress tracking.
    fn reset(&mut self) {}
}

/// Mouse adapter. Only the primary button drags.
#[derive(Debug, Default, Clone, Copy)]
pub struct MouseAdapter;

impl InputAdapter for MouseAdapter {
    type Raw = MouseInput;

    fn translate(&mut self, raw: &MouseInput) -> Option<SessionEvent> {
        match *raw {
            MouseInput::Down { point, button: MouseButton::Primary } => Some(SessionEvent::Press(point)),
            MouseInput::Move { point } => Some(SessionEvent::Move(point)),
            MouseInput::Up { button: MouseButton::Primary } => Some(SessionEvent::Release),
            MouseInput::Down { .. } | MouseInput::Up { .. } => None,
        }
    }
}

/// Single-point touch adapter.
///
/// A press starts only from exactly one touch point. Once tracking, any
/// event carrying more than one point cancels the gesture.
#[derive(Debug, Default, Clone, Copy)]
pub struct TouchAdapter {
    tracking: bool,
}

impl TouchAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a single-point touch is currently being followed.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }
}

impl InputAdapter for TouchAdapter {
    type Raw = TouchInput;

    fn translate(&mut self, raw: &TouchInput) -> Option<SessionEvent> {
        match raw {
            TouchInput::Start { touches } | TouchInput::Move { touches } if self.tracking && touches.len() > 1 => {
                self.tracking = false;
                Some(SessionEvent::Cancel(CancelReason::MultiTouch))
            }
            TouchInput::Start { touches } => match touches.as_slice() {
                [only] if !self.tracking => {
                    self.tracking = true;
                    Some(SessionEvent::Press(*only))
                }
                _ => None,
            },
            TouchInput::Move { touches } => match touches.as_slice() {
                [only] if self.tracking => Some(SessionEvent::Move(*only)),
                _ => None,
            },
            TouchInput::End => {
                if std::mem::take(&mut self.tracking) { Some(SessionEvent::Release) } else { None }
            }
            TouchInput::Cancel => {
                if std::mem::take(&mut self.tracking) {
                    Some(SessionEvent::Cancel(CancelReason::PointerCaptureLost))
                } else {
                    None
                }
            }
        }
    }

    fn reset(&mut self) {
        self.tracking = false;
    }
}

/// One device class wired to a gesture sink.
///
/// A session only forwards moves and releases for a gesture it started
/// itself, so a second device on the same host cannot end someone else's
/// drag.
#[derive(Debug, Default)]
pub struct PointerSession<A> {
    adapter: A,
    engaged: bool,
}

impl<A: InputAdapter> PointerSession<A> {
    #[must_use]
    pub fn new(adapter: A) -> Self {
        Self { adapter, engaged: false }
    }

    #[must_use]
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Whether the last press from this device started a gesture that has
    /// not been released or cancelled yet.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Translate `raw` and forward it to `sink`.
    ///
    /// `source` is the payload of the element under the press; presses
    /// without one (document-level listeners) start nothing. Returns the
    /// translated event, whether or not it was forwarded.
    pub fn feed<K>(&mut self, sink: &mut K, raw: &A::Raw, source: Option<&DragPayload>) -> Option<SessionEvent>
    where
        K: GestureSink + ?Sized,
    {
        let event = self.adapter.translate(raw)?;
        match event {
            SessionEvent::Press(origin) => {
                self.engaged = match source {
                    Some(payload) => sink.begin_gesture(payload.clone(), origin),
                    None => {
                        debug!("press outside any draggable source; ignored");
                        false
                    }
                };
                if !self.engaged {
                    self.adapter.reset();
                }
            }
            _ if !self.engaged => debug!(?event, "no gesture started from this device; ignored"),
            SessionEvent::Move(point) => sink.update_position(point),
            SessionEvent::Release => {
                self.engaged = false;
                sink.end_gesture();
            }
            SessionEvent::Cancel(reason) => {
                self.engaged = false;
                sink.cancel(reason);
            }
        }
        Some(event)
    }

    /// Forward a window blur, which cancels regardless of device.
    pub fn blur<K>(&mut self, sink: &mut K)
    where
        K: GestureSink + ?Sized,
    {
        self.adapter.reset();
        self.engaged = false;
        sink.cancel(CancelReason::WindowBlur);
    }
}
