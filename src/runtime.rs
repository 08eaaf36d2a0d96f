//! Async runtime: a tokio task that owns one gesture controller.
//!
//! DESIGN
//! ======
//! UI callbacks must never block, so every operation is a message on an
//! unbounded channel, applied in arrival order by a single task. The arm
//! and hover timers are `tokio::time::Sleep` futures held in their slots and
//! raced against the command queue with `select!`. Expired timers are
//! handled before the next command so a fire that is already due is never
//! overtaken by a later event. After every command or fire the projection
//! is published on a watch channel for preview renderers.
//!
//! LIFECYCLE
//! =========
//! The task stops when every [`GestureHandle`] is dropped. On the way out
//! it cancels any gesture in flight, which restores text selection.

#[cfg(test)]
#[path = "runtime_test.rs"]
mod runtime_test;

use std::pin::Pin;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Sleep};
use tracing::{debug, info, trace, warn};

use crate::config::GestureConfig;
use crate::controller::{DragView, DropCallback, GestureController, GestureSink};
use crate::error::GestureError;
use crate::host::{Navigator, SelectionGuard, TargetId};
use crate::input::{CancelReason, Point};
use crate::payload::DragPayload;
use crate::timer::{Scheduler, TimerKind, TimerSlot, TimerToken, duration_ms};

/// Timers backed by the tokio clock.
pub struct TokioTimers {
    epoch: Instant,
    arm: TimerSlot<Pin<Box<Sleep>>>,
    hover: TimerSlot<Pin<Box<Sleep>>>,
}

impl Default for TokioTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl TokioTimers {
    #[must_use]
    pub fn new() -> Self {
        Self { epoch: Instant::now(), arm: TimerSlot::new(), hover: TimerSlot::new() }
    }

    #[must_use]
    pub fn is_pending(&self, kind: TimerKind) -> bool {
        match kind {
            TimerKind::Arm => self.arm.is_pending(),
            TimerKind::Hover => self.hover.is_pending(),
        }
    }

    /// Resolve when the earliest pending timer expires, clearing its slot.
    ///
    /// Cancel-safe: dropping the future before it resolves leaves both slots
    /// untouched. Never resolves while nothing is pending.
    pub async fn expired(&mut self) -> (TimerKind, TimerToken) {
        let Self { arm, hover, .. } = self;
        tokio::select! {
            biased;
            token = wait_slot(arm) => (TimerKind::Arm, token),
            token = wait_slot(hover) => (TimerKind::Hover, token),
        }
    }

    fn slot_mut(&mut self, kind: TimerKind) -> &mut TimerSlot<Pin<Box<Sleep>>> {
        match kind {
            TimerKind::Arm => &mut self.arm,
            TimerKind::Hover => &mut self.hover,
        }
    }
}

async fn wait_slot(slot: &mut TimerSlot<Pin<Box<Sleep>>>) -> TimerToken {
    if let Some(sleep) = slot.get_mut() {
        sleep.as_mut().await;
    }
    match slot.take() {
        Some((token, _)) => token,
        None => std::future::pending().await,
    }
}

impl Scheduler for TokioTimers {
    fn now_ms(&self) -> u64 {
        duration_ms(self.epoch.elapsed())
    }

    fn schedule(&mut self, kind: TimerKind, token: TimerToken, delay: Duration) {
        self.slot_mut(kind).set(token, Box::pin(tokio::time::sleep(delay)));
    }

    fn cancel(&mut self, kind: TimerKind, token: TimerToken) {
        self.slot_mut(kind).cancel(token);
    }
}

enum Command {
    Begin { payload: DragPayload, origin: Point },
    Move(Point),
    End,
    Cancel(CancelReason),
    RegisterDrop(DropCallback),
    ClearDrop,
    HoverEnter(TargetId),
    HoverLeave(TargetId),
    Snapshot(oneshot::Sender<DragView>),
}

/// Cloneable handle to a running gesture task.
#[derive(Clone)]
pub struct GestureHandle {
    tx: mpsc::UnboundedSender<Command>,
    view_rx: watch::Receiver<DragView>,
}

impl GestureHandle {
    pub fn begin_gesture(&self, payload: DragPayload, origin: Point) -> Result<(), GestureError> {
        self.send(Command::Begin { payload, origin })
    }

    pub fn update_position(&self, point: Point) -> Result<(), GestureError> {
        self.send(Command::Move(point))
    }

    pub fn end_gesture(&self) -> Result<(), GestureError> {
        self.send(Command::End)
    }

    pub fn cancel(&self, reason: CancelReason) -> Result<(), GestureError> {
        self.send(Command::Cancel(reason))
    }

    /// Cancel any gesture because the host view is going away.
    pub fn unmount(&self) -> Result<(), GestureError> {
        self.cancel(CancelReason::Unmount)
    }

    pub fn register_drop_target<F>(&self, callback: F) -> Result<(), GestureError>
    where
        F: FnMut(DragPayload) + Send + 'static,
    {
        self.send(Command::RegisterDrop(Box::new(callback)))
    }

    pub fn clear_drop_target(&self) -> Result<(), GestureError> {
        self.send(Command::ClearDrop)
    }

    pub fn hover_enter(&self, target: TargetId) -> Result<(), GestureError> {
        self.send(Command::HoverEnter(target))
    }

    pub fn hover_leave(&self, target: TargetId) -> Result<(), GestureError> {
        self.send(Command::HoverLeave(target))
    }

    /// Latest published projection.
    #[must_use]
    pub fn view(&self) -> DragView {
        self.view_rx.borrow().clone()
    }

    /// Watch the projection. For preview renderers.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DragView> {
        self.view_rx.clone()
    }

    /// Projection after every previously sent command has been applied.
    pub async fn snapshot(&self) -> Result<DragView, GestureError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Snapshot(reply_tx))?;
        reply_rx.await.map_err(|_| GestureError::RuntimeClosed)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, command: Command) -> Result<(), GestureError> {
        self.tx.send(command).map_err(|_| GestureError::RuntimeClosed)
    }
}

impl GestureSink for GestureHandle {
    /// Reports delivery only; whether the task accepts the press is not
    /// known until it has been applied.
    fn begin_gesture(&mut self, payload: DragPayload, origin: Point) -> bool {
        let sent = GestureHandle::begin_gesture(self, payload, origin);
        let delivered = sent.is_ok();
        report(sent);
        delivered
    }

    fn update_position(&mut self, point: Point) {
        report(GestureHandle::update_position(self, point));
    }

    fn end_gesture(&mut self) {
        report(GestureHandle::end_gesture(self));
    }

    fn cancel(&mut self, reason: CancelReason) {
        report(GestureHandle::cancel(self, reason));
    }
}

fn report(result: Result<(), GestureError>) {
    if let Err(e) = result {
        warn!(error = %e, "pointer event lost");
    }
}

/// Spawn a gesture task on the current tokio runtime.
pub fn spawn<G, N>(config: GestureConfig, selection: G, navigator: N) -> (GestureHandle, JoinHandle<()>)
where
    G: SelectionGuard + Send + 'static,
    N: Navigator + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let (view_tx, view_rx) = watch::channel(DragView::default());
    let controller = GestureController::new(config, TokioTimers::new(), selection, navigator);

    info!(
        arm_delay_ms = duration_ms(config.arm_delay),
        hover_delay_ms = duration_ms(config.hover_delay),
        "gesture runtime started"
    );
    let join = tokio::spawn(run(controller, rx, view_tx));
    (GestureHandle { tx, view_rx }, join)
}

async fn run<G, N>(
    mut controller: GestureController<TokioTimers, G, N>,
    mut rx: mpsc::UnboundedReceiver<Command>,
    view_tx: watch::Sender<DragView>,
) where
    G: SelectionGuard,
    N: Navigator,
{
    loop {
        tokio::select! {
            biased;
            (kind, token) = controller.scheduler_mut().expired() => {
                controller.fire_timer(kind, token);
            }
            maybe_command = rx.recv() => {
                let Some(command) = maybe_command else {
                    break;
                };
                apply(&mut controller, command);
            }
        }
        publish(&view_tx, controller.view());
    }

    controller.unmount();
    publish(&view_tx, controller.view());
    info!("gesture runtime stopped");
}

fn apply<G, N>(controller: &mut GestureController<TokioTimers, G, N>, command: Command)
where
    G: SelectionGuard,
    N: Navigator,
{
    match command {
        Command::Begin { payload, origin } => controller.begin_gesture(payload, origin),
        Command::Move(point) => controller.update_position(point),
        Command::End => controller.end_gesture(),
        Command::Cancel(reason) => controller.cancel(reason),
        Command::RegisterDrop(callback) => controller.register_drop_target(callback),
        Command::ClearDrop => controller.clear_drop_target(),
        Command::HoverEnter(target) => controller.on_hover_enter(target),
        Command::HoverLeave(target) => controller.on_hover_leave(target),
        Command::Snapshot(reply) => {
            if reply.send(controller.view()).is_err() {
                debug!("snapshot requester went away");
            }
        }
    }
}

fn publish(view_tx: &watch::Sender<DragView>, view: DragView) {
    let changed = view_tx.send_if_modified(|current| {
        if *current == view {
            false
        } else {
            *current = view;
            true
        }
    });
    if changed {
        trace!("drag view published");
    }
}
