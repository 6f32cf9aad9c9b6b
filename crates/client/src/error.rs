//! Error types for backend calls and manager actions.

use opsdesk_core::{DraftError, Operation, StateError, Ticket};
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unauthorized (missing or rejected token).
    #[error("Unauthorized: invalid API token")]
    Unauthorized,
}

/// Why a manager action did not take effect.
///
/// Every variant except [`ActionError::InvalidState`] and
/// [`ActionError::Stale`] is also queued as a user notification.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The backend call failed.
    #[error("{operation} {entity} failed: {message}")]
    RequestFailed {
        operation: Operation,
        entity: &'static str,
        message: String,
    },

    /// The form could not be converted into a payload.
    #[error(transparent)]
    ValidationFailed(#[from] DraftError),

    /// The screen cannot accept this action right now.
    #[error(transparent)]
    InvalidState(#[from] StateError),

    /// A newer request was applied first; this response was discarded.
    #[error("response {0} was superseded by a newer request")]
    Stale(Ticket),

    /// No form is open.
    #[error("no form is open")]
    NoOpenForm,

    /// No delete is waiting for confirmation.
    #[error("no delete is waiting for confirmation")]
    NothingToConfirm,

    /// The record is not in the local collection.
    #[error("{entity} {id} is not loaded")]
    UnknownRecord { entity: &'static str, id: String },
}

impl ActionError {
    /// Wrap a backend failure for `operation` on `entity`.
    #[must_use]
    pub fn request_failed(operation: Operation, entity: &'static str, err: &ServiceError) -> Self {
        Self::RequestFailed {
            operation,
            entity,
            message: err.to_string(),
        }
    }
}
