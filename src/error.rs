//! Error types shared across the engine.

use thiserror::Error;

/// A requested status change that is not reachable from the current value.
///
/// `from` is always the value the store held when the change was evaluated,
/// which may differ from what the caller believed it was.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {dimension} transition: {from} -> {to}")]
pub struct InvalidTransitionError {
    pub dimension: &'static str,
    pub from: String,
    pub to: String,
}

impl InvalidTransitionError {
    pub fn new(dimension: &'static str, from: impl ToString, to: impl ToString) -> Self {
        Self {
            dimension,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Errors from the catalog collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown product: {0}")]
    UnknownProduct(String),
}

/// Errors that can occur during repository operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransitionError),

    /// A delete or link would leave a dangling or doubled reference.
    #[error("Referential conflict: {0}")]
    ReferentialConflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input, rejected before anything is written.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Repository closed")]
    Closed,

    #[error("Repository dropped response channel")]
    Dropped,
}

impl RepositoryError {
    /// Only channel failures are worth retrying. Transition and referential
    /// errors mean the caller's view is stale and must be re-read instead.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RepositoryError::Closed | RepositoryError::Dropped)
    }

    /// Short notice suitable for a staff or kitchen screen.
    pub fn user_message(&self) -> &'static str {
        match self {
            RepositoryError::InvalidTransition(_) | RepositoryError::ReferentialConflict(_) => {
                "this order changed, please refresh"
            }
            RepositoryError::NotFound(_) => "this record no longer exists",
            RepositoryError::Validation(_) | RepositoryError::Catalog(_) => "please check the entered values",
            RepositoryError::PermissionDenied(_) => "you are not allowed to do this",
            RepositoryError::Closed | RepositoryError::Dropped => "could not update, please retry",
        }
    }
}

/// Notification transport failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Change feed disconnected")]
    Disconnected,

    #[error("Reconnect failed after {attempts} attempts")]
    ReconnectExhausted { attempts: u32 },

    #[error("Notification hub closed")]
    HubClosed,
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Failures while shutting the system down.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_converts_and_is_not_retryable() {
        let err: RepositoryError = InvalidTransitionError::new("kitchen_status", "not_sent", "ready").into();
        assert_eq!(err.to_string(), "invalid kitchen_status transition: not_sent -> ready");
        assert!(!err.is_retryable());
        assert_eq!(err.user_message(), "this order changed, please refresh");
        assert!(RepositoryError::Closed.is_retryable());
    }
}
