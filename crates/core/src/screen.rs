//! Lifecycle of a list screen.
//!
//! ```text
//! Idle ──▶ Loading ──▶ Loaded ◀──▶ Submitting(op)
//!             │          ▲
//!             ▼          │ reload
//!          LoadError ────┘
//! ```
//!
//! There is no terminal state; every failure leaves the screen usable.

use serde::Serialize;

/// A remote operation started from a list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Load,
    RefreshStats,
    Create,
    Update,
    Delete,
    CreateCategory,
    DeleteCategory,
}

impl Operation {
    /// Verb used in user-facing messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Load => "Load",
            Self::RefreshStats => "Refresh stats for",
            Self::Create | Self::CreateCategory => "Create",
            Self::Update => "Update",
            Self::Delete | Self::DeleteCategory => "Delete",
        }
    }

    /// Returns `true` for operations that change remote data.
    #[must_use]
    pub const fn is_write(self) -> bool {
        !matches!(self, Self::Load | Self::RefreshStats)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Rejected state change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

/// Where a list screen is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum ScreenState {
    /// Created, nothing requested yet.
    #[default]
    Idle,
    /// Initial or repeated load in flight.
    Loading,
    /// Collection mirrors the last successful load plus later writes.
    Loaded,
    /// The last load failed; the collection is empty but the screen is usable.
    LoadError(String),
    /// At least one write is in flight; `op` is the most recent.
    Submitting(Operation),
}

impl ScreenState {
    /// Short name for logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::LoadError(_) => "showing a load error",
            Self::Submitting(_) => "submitting",
        }
    }

    /// Returns `true` once a load has finished, successfully or not.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Loaded | Self::LoadError(_) | Self::Submitting(_))
    }

    /// Move to `Loading`.
    ///
    /// # Errors
    ///
    /// Loads cannot start while another load or a write is in flight.
    pub fn begin_load(&mut self) -> Result<(), StateError> {
        match self {
            Self::Idle | Self::Loaded | Self::LoadError(_) => {
                *self = Self::Loading;
                Ok(())
            }
            Self::Loading | Self::Submitting(_) => Err(self.invalid("load")),
        }
    }

    /// Leave `Loading` with the outcome of the load.
    ///
    /// # Errors
    ///
    /// Fails unless a load is in flight.
    pub fn finish_load(&mut self, outcome: Result<(), String>) -> Result<(), StateError> {
        if *self != Self::Loading {
            return Err(self.invalid("finish loading"));
        }
        *self = match outcome {
            Ok(()) => Self::Loaded,
            Err(message) => Self::LoadError(message),
        };
        Ok(())
    }

    /// Move to `Submitting(op)`. Further writes may start while one is in flight.
    ///
    /// # Errors
    ///
    /// Writes need a finished load.
    pub fn begin_submit(&mut self, op: Operation) -> Result<(), StateError> {
        if self.is_ready() {
            *self = Self::Submitting(op);
            Ok(())
        } else {
            Err(self.invalid("submit"))
        }
    }

    /// Return to `Loaded` once no write is in flight.
    ///
    /// # Errors
    ///
    /// Fails unless a write is in flight.
    pub fn finish_submit(&mut self) -> Result<(), StateError> {
        if matches!(self, Self::Submitting(_)) {
            *self = Self::Loaded;
            Ok(())
        } else {
            Err(self.invalid("finish submitting"))
        }
    }

    const fn invalid(&self, action: &'static str) -> StateError {
        StateError::InvalidTransition {
            state: self.name(),
            action,
        }
    }
}
