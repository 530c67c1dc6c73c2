//! Transient user-facing messages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Display time used when a notification does not specify one.
pub const DEFAULT_DELAY_MS: u64 = 2000;

/// Identity of a notification inside the queue.
///
/// Two notifications with identical text get distinct ids and are timed
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(Uuid);

impl NotificationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Preset families offered by the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationKind {
    pub fn default_header(&self) -> &'static str {
        match self {
            NotificationKind::Success => "Thành công",
            NotificationKind::Error => "Lỗi",
            NotificationKind::Info => "Thông báo",
            NotificationKind::Warning => "Cảnh báo",
        }
    }

    pub fn style_class(&self) -> &'static str {
        match self {
            NotificationKind::Success => "bg-success text-white",
            NotificationKind::Error => "bg-danger text-white",
            NotificationKind::Info => "bg-info text-white",
            NotificationKind::Warning => "bg-warning text-dark",
        }
    }
}

/// A message waiting to be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub header: Option<String>,
    pub body: String,
    pub style_class: Option<String>,
    /// Display time in milliseconds; `None` falls back to [`DEFAULT_DELAY_MS`].
    pub delay_ms: Option<u64>,
}

impl Notification {
    /// A bare notification with only a body.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            header: None,
            body: body.into(),
            style_class: None,
            delay_ms: None,
        }
    }

    /// A preset notification with the kind's header, style and fixed delay.
    pub fn preset(kind: NotificationKind, body: impl Into<String>) -> Self {
        Self {
            header: Some(kind.default_header().to_string()),
            body: body.into(),
            style_class: Some(kind.style_class().to_string()),
            delay_ms: Some(DEFAULT_DELAY_MS),
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = Some(delay.as_millis() as u64);
        self
    }

    /// Effective display time.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.unwrap_or(DEFAULT_DELAY_MS))
    }
}
