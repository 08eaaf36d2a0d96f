//! What is being dragged: a reference to an intervention, artisan, or client.

#[cfg(test)]
#[path = "payload_test.rs"]
mod payload_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which kind of CRM record a payload refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Intervention,
    Artisan,
    Client,
}

impl PayloadKind {
    /// Lowercase wire name (`"artisan"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intervention => "intervention",
            Self::Artisan => "artisan",
            Self::Client => "client",
        }
    }

    /// Capitalized display name (`"Artisan"`).
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Intervention => "Intervention",
            Self::Artisan => "Artisan",
            Self::Client => "Client",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record carried by a drag gesture.
///
/// Fixed at press time; the controller never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragPayload {
    pub kind: PayloadKind,
    pub id: String,
    pub label: String,
    /// Opaque source record, passed through to the drop target untouched.
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl DragPayload {
    #[must_use]
    pub fn new(kind: PayloadKind, id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { kind, id: id.into(), label: label.into(), raw: serde_json::Value::Null }
    }

    /// Attach the source record.
    #[must_use]
    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = raw;
        self
    }
}
