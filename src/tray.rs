//! Drop tray, the staging area behind the conversation drop zone.
//!
//! Payloads dropped onto a conversation are staged here until the message
//! is sent, at which point they are rendered as reference lines appended to
//! the message body.

#[cfg(test)]
#[path = "tray_test.rs"]
mod tray_test;

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::debug;

use crate::payload::{DragPayload, PayloadKind};

/// A staged reference to a dropped record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrayItem {
    pub kind: PayloadKind,
    pub id: String,
    pub label: String,
}

impl From<&DragPayload> for TrayItem {
    fn from(payload: &DragPayload) -> Self {
        Self { kind: payload.kind, id: payload.id.clone(), label: payload.label.clone() }
    }
}

impl TrayItem {
    /// One reference line: `🔧 **Artisan**: Jean Dupont (ID: A1)`.
    #[must_use]
    pub fn reference_line(&self) -> String {
        let icon = match self.kind {
            PayloadKind::Artisan => "🔧",
            PayloadKind::Client => "👤",
            PayloadKind::Intervention => "📄",
        };
        format!("{icon} **{}**: {} (ID: {})", self.kind.title(), self.label, self.id)
    }
}

/// Ordered list of staged items. Duplicates are kept, as in the drop zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropTray {
    items: Vec<TrayItem>,
}

impl DropTray {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, payload: &DragPayload) {
        self.items.push(TrayItem::from(payload));
    }

    /// Remove the item at `index`; out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<TrayItem> {
        if index < self.items.len() { Some(self.items.remove(index)) } else { None }
    }

    #[must_use]
    pub fn items(&self) -> &[TrayItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Message body for `text` plus the staged references, or `None` when
    /// there is nothing to send.
    #[must_use]
    pub fn compose(&self, text: &str) -> Option<String> {
        let text = text.trim();
        if self.items.is_empty() {
            return if text.is_empty() { None } else { Some(text.to_string()) };
        }
        let references = self.items.iter().map(TrayItem::reference_line).collect::<Vec<_>>().join("\n");
        if text.is_empty() { Some(references) } else { Some(format!("{text}\n\n{references}")) }
    }

    /// Compose and, if there was something to send, empty the tray.
    pub fn take_message(&mut self, text: &str) -> Option<String> {
        let body = self.compose(text)?;
        self.items.clear();
        Some(body)
    }
}

/// A tray shared between the drop callback and the composing view.
#[derive(Debug, Clone, Default)]
pub struct SharedTray {
    inner: Arc<Mutex<DropTray>>,
}

impl SharedTray {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the tray. A poisoned lock is recovered; the tray holds no
    /// invariant a panic could break.
    pub fn lock(&self) -> MutexGuard<'_, DropTray> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Drop callback that stages every dropped payload.
    #[must_use]
    pub fn drop_callback(&self) -> impl FnMut(DragPayload) + Send + 'static {
        let tray = self.clone();
        move |payload: DragPayload| {
            let mut guard = tray.lock();
            guard.push(&payload);
            debug!(kind = %payload.kind, id = %payload.id, staged = guard.len(), "payload staged in tray");
        }
    }
}
