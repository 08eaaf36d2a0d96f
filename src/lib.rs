//! Press-and-hold drag-and-drop gesture controller for the artisan directory.
//!
//! A gesture starts when the pointer goes down on a draggable record (an
//! artisan, a client, or an intervention). Holding still for the arm delay
//! turns the press into an active drag; releasing early is an ordinary click.
//! While dragging, resting over a navigation target for the hover delay
//! switches to that view, and releasing hands the payload to whichever drop
//! target is registered.
//!
//! The decision logic is a pure transition function; the controller executes
//! the resulting effects against injected capabilities (timers, text
//! selection, navigation), so the same core runs in tests on a virtual clock,
//! in a tokio task, and in the browser.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`machine`] | Gesture states, events, effects and the transition function |
//! | [`controller`] | Effect execution, drop-target registration, read projection |
//! | [`runtime`] | tokio task owning a controller, with a cloneable handle |
//! | [`timer`] | Timer tokens, the [`timer::Scheduler`] seam, a virtual clock |
//! | [`input`] | Mouse and touch adapters feeding the controller |
//! | [`host`] | Selection-suppression and navigation capabilities |
//! | [`payload`] | The record being dragged |
//! | [`preview`] | Display model for the floating preview |
//! | [`tray`] | Drop zone staging and message composition |
//! | [`config`] | Delays and thresholds, with environment overrides |
//! | [`error`] | Error types |
//! | [`consts`] | Default delays and preview offsets |
//! | `web` | DOM-backed capabilities (feature `web`) |

pub mod config;
pub mod consts;
pub mod controller;
pub mod error;
pub mod host;
pub mod input;
pub mod machine;
pub mod payload;
pub mod preview;
pub mod runtime;
pub mod timer;
pub mod tray;
#[cfg(feature = "web")]
pub mod web;
