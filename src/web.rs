//! DOM-backed capabilities for running the controller in the browser.
//!
//! Both types look up `window.document` on every call instead of holding DOM
//! handles, so they stay `Send` and can be handed to [`crate::runtime::spawn`]
//! as well as to a controller driven directly from event listeners.

use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, window};

use crate::host::{Navigator, SelectionGuard, TargetId};

const USER_SELECT_PROPERTIES: [&str; 4] = ["user-select", "-webkit-user-select", "-moz-user-select", "-ms-user-select"];

/// Disables text selection on `document.body` while a drag is active.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodySelectionGuard;

impl BodySelectionGuard {
    fn set_user_select(value: &str) {
        let Some(body) = window().and_then(|w| w.document()).and_then(|d| d.body()) else {
            warn!("selection guard: no document body");
            return;
        };
        let style = body.style();
        for property in USER_SELECT_PROPERTIES {
            if let Err(e) = style.set_property(property, value) {
                warn!(property, error = ?e, "selection guard: set_property failed");
            }
        }
    }
}

impl SelectionGuard for BodySelectionGuard {
    fn suppress(&mut self) {
        Self::set_user_select("none");
    }

    fn restore(&mut self) {
        Self::set_user_select("");
    }
}

/// Navigates by clicking the sidebar link whose `href` is `/{target}`.
///
/// Going through the link keeps the host router in charge of the transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkNavigator;

impl Navigator for LinkNavigator {
    fn navigate_to(&mut self, target: &TargetId) {
        let Some(document) = window().and_then(|w| w.document()) else {
            warn!(%target, "navigation: no document");
            return;
        };
        let selector = format!("a[href=\"/{target}\"]");
        match document.query_selector(&selector) {
            Ok(Some(element)) => match element.dyn_into::<HtmlElement>() {
                Ok(link) => link.click(),
                Err(_) => warn!(%target, "navigation: target is not an html element"),
            },
            Ok(None) => warn!(%target, "navigation: no link for target"),
            Err(e) => warn!(%target, error = ?e, "navigation: query_selector failed"),
        }
    }
}
