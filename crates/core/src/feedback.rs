//! User feedback: pending confirmations and a notification queue.
//!
//! Destructive actions are parked in a [`Confirmation`] until the user
//! confirms or dismisses them. Failures are pushed onto [`Notifications`],
//! which the presentation layer drains whenever it is ready; nothing here
//! blocks the code that reported the problem.

use std::collections::VecDeque;

use serde::Serialize;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

/// One message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.level.label(), self.message)
    }
}

/// FIFO queue of notifications awaiting display.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Queue a message.
    pub fn push(&mut self, level: Level, message: impl Into<String>) {
        self.queue.push_back(Notification {
            level,
            message: message.into(),
        });
    }

    /// Queue an informational message.
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Level::Info, message);
    }

    /// Queue a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Level::Warning, message);
    }

    /// Queue an error.
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Level::Error, message);
    }

    /// Take the oldest message.
    pub fn pop(&mut self) -> Option<Notification> {
        self.queue.pop_front()
    }

    /// Take every queued message, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }

    /// Look at queued messages without removing them.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }

    /// Number of queued messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// A destructive action waiting for the user's go-ahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation<A> {
    /// Question shown to the user.
    pub message: String,
    /// Action to run once confirmed.
    pub action: A,
}

impl<A> Confirmation<A> {
    /// Park `action` behind `message`.
    #[must_use]
    pub fn new(message: impl Into<String>, action: A) -> Self {
        Self {
            message: message.into(),
            action,
        }
    }
}
