//! The gesture state machine.
//!
//! DESIGN
//! ======
//! [`transition`] is a pure function from `(state, event)` to
//! `(state, effects)`. It never touches timers, the selection flag, the drop
//! slot, or navigation directly; it returns [`Effect`]s that the controller
//! executes in order. Every event that is not valid in the current state
//! leaves the state unchanged, produces no effects, and reports why through
//! [`Ignored`].
//!
//! ```text
//! Idle   --press--> Arming --[arm delay elapsed, still pressed]--> Active
//! Arming --release/cancel--> Idle
//! Active --release--> Idle   (Drop effect first)
//! Active --cancel-->  Idle   (no Drop)
//! ```

#[cfg(test)]
#[path = "machine_test.rs"]
mod machine_test;

use std::fmt;
use std::time::Duration;

use uuid::Uuid;

use crate::config::GestureConfig;
use crate::host::TargetId;
use crate::input::{CancelReason, Point};
use crate::payload::DragPayload;
use crate::timer::{TimerKind, TimerToken, duration_ms};

/// Correlates every log line of one gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GestureId(pub Uuid);

impl GestureId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GestureId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GestureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Pending hover-to-navigate action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverWatch {
    pub target: TargetId,
    pub token: TimerToken,
}

/// The single gesture a controller tracks.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    /// Nothing pressed.
    #[default]
    Idle,
    /// Pressed on a source; waiting for the arm delay.
    Arming {
        gesture: GestureId,
        /// Where the press landed. Becomes the first broadcast position on
        /// activation; moves while arming only feed the stray check.
        origin: Point,
        payload: DragPayload,
        /// Clock milliseconds at press time.
        started_at: u64,
        arm: TimerToken,
    },
    /// Dragging.
    Active {
        gesture: GestureId,
        payload: DragPayload,
        position: Point,
        hover: Option<HoverWatch>,
    },
}

/// Coarse phase of a [`GestureState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Arming,
    Active,
}

impl GestureState {
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Arming { .. } => Phase::Arming,
            Self::Active { .. } => Phase::Active,
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    #[must_use]
    pub fn gesture_id(&self) -> Option<GestureId> {
        match self {
            Self::Idle => None,
            Self::Arming { gesture, .. } | Self::Active { gesture, .. } => Some(*gesture),
        }
    }

    /// Payload of an active drag. Arming payloads are not yet visible.
    #[must_use]
    pub fn active_payload(&self) -> Option<&DragPayload> {
        match self {
            Self::Active { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Broadcast position of an active drag.
    #[must_use]
    pub fn active_position(&self) -> Option<Point> {
        match self {
            Self::Active { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Target currently being watched for hover navigation.
    #[must_use]
    pub fn hover_target(&self) -> Option<&TargetId> {
        match self {
            Self::Active { hover: Some(watch), .. } => Some(&watch.target),
            _ => None,
        }
    }
}

/// Input to the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    Press { gesture: GestureId, payload: DragPayload, origin: Point },
    Move(Point),
    Release,
    Cancel(CancelReason),
    HoverEnter(TargetId),
    HoverLeave(TargetId),
    TimerFired { kind: TimerKind, token: TimerToken },
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Schedule { kind: TimerKind, token: TimerToken, delay: Duration },
    CancelTimer { kind: TimerKind, token: TimerToken },
    SuppressSelection,
    RestoreSelection,
    Drop(DragPayload),
    Navigate(TargetId),
}

/// Why an event left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    /// Press while a gesture is already arming or active.
    ReentrantBegin,
    /// Move, hover, release, or cancel with nothing pressed.
    NotPressed,
    /// Move or hover event while not dragging.
    NotActive,
    /// Hover enter on the target already being watched.
    AlreadyWatching,
    /// Hover leave for a target that is not being watched.
    NotWatching,
    /// Timer fire whose token is no longer pending.
    StaleTimer,
}

/// Inputs a transition needs besides state and event.
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    pub config: GestureConfig,
    pub now_ms: u64,
    /// Token to use if this step schedules anything.
    pub fresh: TimerToken,
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: GestureState,
    pub effects: Vec<Effect>,
    pub ignored: Option<Ignored>,
}

impl Transition {
    fn to(state: GestureState, effects: Vec<Effect>) -> Self {
        Self { state, effects, ignored: None }
    }

    fn ignore(state: GestureState, why: Ignored) -> Self {
        Self { state, effects: Vec::new(), ignored: Some(why) }
    }
}

/// Compute the next state and the effects to run.
#[must_use]
pub fn transition(state: GestureState, event: GestureEvent, ctx: &StepContext) -> Transition {
    match event {
        GestureEvent::Press { gesture, payload, origin } => press(state, gesture, payload, origin, ctx),
        GestureEvent::Move(point) => pointer_moved(state, point, ctx),
        GestureEvent::Release => released(state),
        GestureEvent::Cancel(_) => cancelled(state),
        GestureEvent::HoverEnter(target) => hover_entered(state, target, ctx),
        GestureEvent::HoverLeave(target) => hover_left(state, &target),
        GestureEvent::TimerFired { kind: TimerKind::Arm, token } => arm_fired(state, token, ctx),
        GestureEvent::TimerFired { kind: TimerKind::Hover, token } => hover_fired(state, token),
    }
}

fn press(state: GestureState, gesture: GestureId, payload: DragPayload, origin: Point, ctx: &StepContext) -> Transition {
    if !matches!(state, GestureState::Idle) {
        return Transition::ignore(state, Ignored::ReentrantBegin);
    }
    let arm = ctx.fresh;
    Transition::to(
        GestureState::Arming { gesture, origin, payload, started_at: ctx.now_ms, arm },
        vec![Effect::Schedule { kind: TimerKind::Arm, token: arm, delay: ctx.config.arm_delay }],
    )
}

fn pointer_moved(state: GestureState, point: Point, ctx: &StepContext) -> Transition {
    match state {
        GestureState::Arming { origin, arm, .. } => {
            let strayed = ctx.config.arm_cancel_distance.is_some_and(|limit| origin.distance_to(point) > limit);
            if strayed {
                return Transition::to(
                    GestureState::Idle,
                    vec![Effect::CancelTimer { kind: TimerKind::Arm, token: arm }],
                );
            }
            Transition::ignore(state, Ignored::NotActive)
        }
        GestureState::Active { gesture, payload, hover, .. } => {
            Transition::to(GestureState::Active { gesture, payload, position: point, hover }, Vec::new())
        }
        GestureState::Idle => Transition::ignore(state, Ignored::NotPressed),
    }
}

fn released(state: GestureState) -> Transition {
    match state {
        GestureState::Arming { arm, .. } => {
            Transition::to(GestureState::Idle, vec![Effect::CancelTimer { kind: TimerKind::Arm, token: arm }])
        }
        GestureState::Active { payload, hover, .. } => {
            let mut effects = cancel_hover(hover);
            effects.push(Effect::Drop(payload));
            effects.push(Effect::RestoreSelection);
            Transition::to(GestureState::Idle, effects)
        }
        GestureState::Idle => Transition::ignore(state, Ignored::NotPressed),
    }
}

fn cancelled(state: GestureState) -> Transition {
    match state {
        GestureState::Arming { arm, .. } => {
            Transition::to(GestureState::Idle, vec![Effect::CancelTimer { kind: TimerKind::Arm, token: arm }])
        }
        GestureState::Active { hover, .. } => {
            let mut effects = cancel_hover(hover);
            effects.push(Effect::RestoreSelection);
            Transition::to(GestureState::Idle, effects)
        }
        GestureState::Idle => Transition::ignore(state, Ignored::NotPressed),
    }
}

fn hover_entered(state: GestureState, target: TargetId, ctx: &StepContext) -> Transition {
    match state {
        GestureState::Active { gesture, payload, position, hover } => {
            if hover.as_ref().is_some_and(|watch| watch.target == target) {
                return Transition::ignore(
                    GestureState::Active { gesture, payload, position, hover },
                    Ignored::AlreadyWatching,
                );
            }
            let mut effects = cancel_hover(hover);
            effects.push(Effect::Schedule { kind: TimerKind::Hover, token: ctx.fresh, delay: ctx.config.hover_delay });
            let watch = HoverWatch { target, token: ctx.fresh };
            Transition::to(GestureState::Active { gesture, payload, position, hover: Some(watch) }, effects)
        }
        other => Transition::ignore(other, Ignored::NotActive),
    }
}

fn hover_left(state: GestureState, target: &TargetId) -> Transition {
    match state {
        GestureState::Active { gesture, payload, position, hover } => match hover {
            Some(watch) if watch.target == *target => Transition::to(
                GestureState::Active { gesture, payload, position, hover: None },
                vec![Effect::CancelTimer { kind: TimerKind::Hover, token: watch.token }],
            ),
            hover => Transition::ignore(GestureState::Active { gesture, payload, position, hover }, Ignored::NotWatching),
        },
        other => Transition::ignore(other, Ignored::NotActive),
    }
}

fn arm_fired(state: GestureState, token: TimerToken, ctx: &StepContext) -> Transition {
    match state {
        GestureState::Arming { gesture, origin, payload, started_at, arm } if arm == token => {
            let held = ctx.now_ms.saturating_sub(started_at);
            let needed = duration_ms(ctx.config.arm_delay);
            if held < needed {
                // Early fire: wait out the remainder under the same token.
                let remaining = Duration::from_millis(needed - held);
                return Transition::to(
                    GestureState::Arming { gesture, origin, payload, started_at, arm },
                    vec![Effect::Schedule { kind: TimerKind::Arm, token: arm, delay: remaining }],
                );
            }
            Transition::to(
                GestureState::Active { gesture, payload, position: origin, hover: None },
                vec![Effect::SuppressSelection],
            )
        }
        other => Transition::ignore(other, Ignored::StaleTimer),
    }
}

fn hover_fired(state: GestureState, token: TimerToken) -> Transition {
    match state {
        GestureState::Active { gesture, payload, position, hover: Some(watch) } if watch.token == token => {
            Transition::to(
                GestureState::Active { gesture, payload, position, hover: None },
                vec![Effect::Navigate(watch.target)],
            )
        }
        other => Transition::ignore(other, Ignored::StaleTimer),
    }
}

fn cancel_hover(hover: Option<HoverWatch>) -> Vec<Effect> {
    hover
        .map(|watch| Effect::CancelTimer { kind: TimerKind::Hover, token: watch.token })
        .into_iter()
        .collect()
}

/// Effects of a [`Machine::step`]; the new state stays inside the machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub effects: Vec<Effect>,
    pub ignored: Option<Ignored>,
}

/// Owns the current state and mints timer tokens.
#[derive(Debug)]
pub struct Machine {
    state: GestureState,
    config: GestureConfig,
    next_token: u64,
}

impl Machine {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self { state: GestureState::Idle, config, next_token: 1 }
    }

    #[must_use]
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Apply `event` at clock time `now_ms`, keeping the new state and
    /// returning what the host must do.
    pub fn step(&mut self, event: GestureEvent, now_ms: u64) -> Step {
        let fresh = TimerToken(self.next_token);
        self.next_token += 1;
        let ctx = StepContext { config: self.config, now_ms, fresh };
        let current = std::mem::take(&mut self.state);
        let Transition { state, effects, ignored } = transition(current, event, &ctx);
        self.state = state;
        Step { effects, ignored }
    }
}
