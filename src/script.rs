//! Replay scripts: a JSON description of one pointer session, driven through
//! the gesture runtime with real timers.
//!
//! ```json
//! {
//!   "payload": { "kind": "artisan", "id": "A1", "label": "Jean Dupont" },
//!   "message": "Pour le chantier de lundi",
//!   "steps": [
//!     { "op": "press", "x": 10, "y": 10 },
//!     { "op": "wait", "ms": 1100 },
//!     { "op": "move", "x": 200, "y": 300 },
//!     { "op": "release" }
//!   ]
//! }
//! ```

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

use artisan_dnd::config::GestureConfig;
use artisan_dnd::controller::DragView;
use artisan_dnd::error::GestureError;
use artisan_dnd::host::{SelectionFlag, TargetId};
use artisan_dnd::input::{CancelReason, Point};
use artisan_dnd::payload::DragPayload;
use artisan_dnd::runtime::{self, GestureHandle};
use artisan_dnd::tray::SharedTray;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("invalid script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Gesture(#[from] GestureError),

    #[error("gesture task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Payload attached to presses that do not name their own.
    pub payload: DragPayload,
    /// Text typed into the conversation before sending.
    #[serde(default)]
    pub message: String,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Press {
        x: f64,
        y: f64,
        #[serde(default)]
        payload: Option<DragPayload>,
    },
    Move {
        x: f64,
        y: f64,
    },
    Release,
    Cancel {
        #[serde(default = "default_cancel_reason")]
        reason: CancelReason,
    },
    HoverEnter {
        target: TargetId,
    },
    HoverLeave {
        target: TargetId,
    },
    Unmount,
    Wait {
        ms: u64,
    },
}

fn default_cancel_reason() -> CancelReason {
    CancelReason::PointerCaptureLost
}

/// What a replay produced.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    /// Projection after the last step.
    pub final_view: DragView,
    /// Views switched to by hover navigation, in order.
    pub navigations: Vec<TargetId>,
    /// Composed conversation message, if anything was dropped or typed.
    pub message: Option<String>,
    pub selection_suppressed: bool,
}

pub fn parse(source: &str) -> Result<Script, ScriptError> {
    Ok(serde_json::from_str(source)?)
}

pub async fn load(path: &Path) -> Result<Script, ScriptError> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ScriptError::Read { path: path.to_path_buf(), source })?;
    parse(&source)
}

/// Run `script` against a fresh gesture runtime and collect the outcome.
///
/// Drops are staged in a tray whose contents are composed with
/// `script.message` once the runtime has shut down.
pub async fn replay(script: &Script, config: GestureConfig) -> Result<Outcome, ScriptError> {
    let selection = SelectionFlag::new();
    let (nav_tx, mut nav_rx) = mpsc::unbounded_channel();
    let navigator = move |target: &TargetId| {
        info!(%target, "navigate");
        if nav_tx.send(target.clone()).is_err() {
            debug!(%target, "navigation log closed");
        }
    };

    let (handle, join) = runtime::spawn(config, selection.clone(), navigator);
    let tray = SharedTray::new();
    handle.register_drop_target(tray.drop_callback())?;

    for (index, step) in script.steps.iter().enumerate() {
        debug!(index, ?step, "replay step");
        run_step(&handle, &script.payload, step).await?;
    }

    let final_view = handle.snapshot().await?;
    drop(handle);
    join.await?;

    let mut navigations = Vec::new();
    while let Ok(target) = nav_rx.try_recv() {
        navigations.push(target);
    }
    let message = tray.lock().take_message(&script.message);

    Ok(Outcome { final_view, navigations, message, selection_suppressed: selection.is_suppressed() })
}

async fn run_step(handle: &GestureHandle, default_payload: &DragPayload, step: &Step) -> Result<(), GestureError> {
    match step {
        Step::Press { x, y, payload } => {
            let payload = payload.clone().unwrap_or_else(|| default_payload.clone());
            handle.begin_gesture(payload, Point::new(*x, *y))
        }
        Step::Move { x, y } => handle.update_position(Point::new(*x, *y)),
        Step::Release => handle.end_gesture(),
        Step::Cancel { reason } => handle.cancel(*reason),
        Step::HoverEnter { target } => handle.hover_enter(target.clone()),
        Step::HoverLeave { target } => handle.hover_leave(target.clone()),
        Step::Unmount => handle.unmount(),
        Step::Wait { ms } => {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
            Ok(())
        }
    }
}
