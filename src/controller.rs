//! Gesture controller: the owned, injectable drag-and-drop engine.
//!
//! DESIGN
//! ======
//! The controller wraps a [`Machine`] and executes the effects it returns
//! against three injected capabilities: a [`Scheduler`] for the arm and
//! hover timers, a [`SelectionGuard`] for text-selection suppression, and a
//! [`Navigator`] for hover-to-navigate. It also owns the single drop
//! callback slot. There is no global state; every consumer is handed the
//! controller (or a runtime handle to it).
//!
//! ERROR HANDLING
//! ==============
//! No operation fails. Calls that make no sense in the current state are
//! ignored and logged at `debug`.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::time::Duration;

use serde::Serialize;
use tracing::{Span, debug, debug_span, info};

use crate::config::GestureConfig;
use crate::host::{Navigator, SelectionGuard, TargetId};
use crate::input::{CancelReason, Point};
use crate::machine::{Effect, GestureEvent, GestureId, GestureState, Machine, Phase};
use crate::payload::DragPayload;
use crate::timer::{Scheduler, TimerKind, TimerToken, VirtualTimers, duration_ms};

/// Receives a dropped payload. At most one is registered at a time.
pub type DropCallback = Box<dyn FnMut(DragPayload) + Send>;

/// Read-only projection for preview renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DragView {
    pub is_dragging: bool,
    pub payload: Option<DragPayload>,
    pub position: Point,
}

impl DragView {
    /// Project a machine state. Arming gestures are not yet visible.
    #[must_use]
    pub fn from_state(state: &GestureState) -> Self {
        match state {
            GestureState::Active { payload, position, .. } => {
                Self { is_dragging: true, payload: Some(payload.clone()), position: *position }
            }
            GestureState::Idle | GestureState::Arming { .. } => Self::default(),
        }
    }
}

/// Anything that accepts the pointer half of a gesture.
///
/// Implemented by [`GestureController`] and by the async runtime handle so
/// input adapters can drive either.
pub trait GestureSink {
    /// Start a gesture. Returns `false` when the press was refused, for
    /// example because another gesture is already in progress.
    fn begin_gesture(&mut self, payload: DragPayload, origin: Point) -> bool;
    fn update_position(&mut self, point: Point);
    fn end_gesture(&mut self);
    fn cancel(&mut self, reason: CancelReason);
}

/// Drag-and-drop gesture controller.
pub struct GestureController<S: Scheduler, G: SelectionGuard, N: Navigator> {
    machine: Machine,
    drop_slot: Option<DropCallback>,
    scheduler: S,
    selection: G,
    navigator: N,
}

impl<S: Scheduler, G: SelectionGuard, N: Navigator> GestureController<S, G, N> {
    #[must_use]
    pub fn new(config: GestureConfig, scheduler: S, selection: G, navigator: N) -> Self {
        Self { machine: Machine::new(config), drop_slot: None, scheduler, selection, navigator }
    }

    // --- Pointer ---

    /// Start arming a gesture for `payload`. Ignored unless idle.
    pub fn begin_gesture(&mut self, payload: DragPayload, origin: Point) {
        self.dispatch(GestureEvent::Press { gesture: GestureId::new(), payload, origin });
    }

    /// Follow the pointer. Broadcast only while dragging.
    pub fn update_position(&mut self, point: Point) {
        self.dispatch(GestureEvent::Move(point));
    }

    /// Release: drop if dragging, otherwise abandon the pending press.
    pub fn end_gesture(&mut self) {
        self.dispatch(GestureEvent::Release);
    }

    /// Abort without dropping.
    pub fn cancel(&mut self, reason: CancelReason) {
        if self.machine.state().phase() != Phase::Idle {
            info!(?reason, "gesture cancelled");
        }
        self.dispatch(GestureEvent::Cancel(reason));
    }

    /// The host view is going away.
    pub fn unmount(&mut self) {
        self.cancel(CancelReason::Unmount);
    }

    // --- Drop target ---

    /// Register the drop callback, replacing any previous one.
    pub fn register_drop_target<F>(&mut self, callback: F)
    where
        F: FnMut(DragPayload) + Send + 'static,
    {
        if self.drop_slot.replace(Box::new(callback)).is_some() {
            debug!("drop target replaced");
        }
    }

    pub fn clear_drop_target(&mut self) {
        self.drop_slot = None;
    }

    #[must_use]
    pub fn has_drop_target(&self) -> bool {
        self.drop_slot.is_some()
    }

    // --- Hover-to-navigate ---

    pub fn on_hover_enter(&mut self, target: TargetId) {
        self.dispatch(GestureEvent::HoverEnter(target));
    }

    pub fn on_hover_leave(&mut self, target: TargetId) {
        self.dispatch(GestureEvent::HoverLeave(target));
    }

    // --- Timers ---

    /// Deliver a timer fire from the scheduler. Stale tokens are ignored.
    pub fn fire_timer(&mut self, kind: TimerKind, token: TimerToken) {
        self.dispatch(GestureEvent::TimerFired { kind, token });
    }

    // --- Queries ---

    #[must_use]
    pub fn view(&self) -> DragView {
        DragView::from_state(self.machine.state())
    }

    #[must_use]
    pub fn state(&self) -> &GestureState {
        self.machine.state()
    }

    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        self.machine.config()
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    #[must_use]
    pub fn selection(&self) -> &G {
        &self.selection
    }

    #[must_use]
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    // --- Internals ---

    fn dispatch(&mut self, event: GestureEvent) {
        let before = self.machine.state().gesture_id();
        let now = self.scheduler.now_ms();
        let step = self.machine.step(event, now);

        let span = match self.machine.state().gesture_id().or(before) {
            Some(id) => debug_span!("gesture", %id),
            None => Span::none(),
        };
        let _entered = span.enter();

        if let Some(why) = step.ignored {
            debug!(?why, "gesture event ignored");
            return;
        }
        if before.is_none() {
            if let GestureState::Arming { payload, origin, .. } = self.machine.state() {
                debug!(kind = %payload.kind, id = %payload.id, x = origin.x, y = origin.y, "gesture arming");
            }
        }
        for effect in step.effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Schedule { kind, token, delay } => {
                debug!(?kind, %token, delay_ms = duration_ms(delay), "timer scheduled");
                self.scheduler.schedule(kind, token, delay);
            }
            Effect::CancelTimer { kind, token } => {
                debug!(?kind, %token, "timer cancelled");
                self.scheduler.cancel(kind, token);
            }
            Effect::SuppressSelection => {
                if let Some(payload) = self.machine.state().active_payload() {
                    info!(kind = %payload.kind, id = %payload.id, "drag activated");
                }
                self.selection.suppress();
            }
            Effect::RestoreSelection => {
                self.selection.restore();
            }
            Effect::Drop(payload) => match self.drop_slot.as_mut() {
                Some(callback) => {
                    info!(kind = %payload.kind, id = %payload.id, "payload dropped");
                    callback(payload);
                }
                None => debug!(kind = %payload.kind, id = %payload.id, "released with no drop target"),
            },
            Effect::Navigate(target) => {
                info!(%target, "hover navigation");
                self.navigator.navigate_to(&target);
            }
        }
    }
}

impl<G: SelectionGuard, N: Navigator> GestureController<VirtualTimers, G, N> {
    /// Move the virtual clock forward by `by`, firing due timers in order.
    pub fn advance(&mut self, by: Duration) {
        let until = self.scheduler.now_ms().saturating_add(duration_ms(by));
        while let Some((kind, token)) = self.scheduler.pop_due(until) {
            self.fire_timer(kind, token);
        }
        self.scheduler.set_now(until);
    }
}

impl<S: Scheduler, G: SelectionGuard, N: Navigator> GestureSink for GestureController<S, G, N> {
    fn begin_gesture(&mut self, payload: DragPayload, origin: Point) -> bool {
        if self.machine.state().phase() != Phase::Idle {
            debug!("press refused; a gesture is already in progress");
            return false;
        }
        GestureController::begin_gesture(self, payload, origin);
        true
    }

    fn update_position(&mut self, point: Point) {
        GestureController::update_position(self, point);
    }

    fn end_gesture(&mut self) {
        GestureController::end_gesture(self);
    }

    fn cancel(&mut self, reason: CancelReason) {
        GestureController::cancel(self, reason);
    }
}

impl<S: Scheduler, G: SelectionGuard, N: Navigator> Drop for GestureController<S, G, N> {
    fn drop(&mut self) {
        if self.machine.state().phase() != Phase::Idle {
            self.unmount();
        }
    }
}
