//! Error types for data source, storage and mail capabilities.

use std::path::PathBuf;

use roster_model::ModelError;
use thiserror::Error;

/// Local, pre-submission validation failure. Blocks the call entirely.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be at most {limit} bytes, got {size}")]
    FileTooLarge {
        field: &'static str,
        size: u64,
        limit: u64,
    },

    #[error("{field} does not accept {found}; allowed: {allowed}")]
    UnsupportedType {
        field: &'static str,
        found: String,
        allowed: String,
    },

    #[error("{0} is empty")]
    EmptyFile(String),

    #[error("email needs at least one recipient")]
    NoRecipients,

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors returned by the external collaborators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// The request never got a usable answer.
    #[error("network error: {0}")]
    Network(String),

    /// The session is missing or expired; the caller should send the user to login.
    #[error("authentication required: {0}")]
    Auth(String),

    #[error("{table} row {id} does not exist")]
    NotFound { table: String, id: String },

    #[error("{table} row {id} already exists")]
    Conflict { table: String, id: String },

    /// The backend refused the request after local validation passed.
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("could not decode {table} row")]
    Decode {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl SourceError {
    /// Message suitable for a transient notification.
    ///
    /// Mutation conflicts are deliberately not distinguished from other failures.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::Auth(_) => "Your session has expired. Please sign in again.".to_string(),
            Self::Validation(err) => err.to_string(),
            Self::NotFound { .. }
            | Self::Conflict { .. }
            | Self::Rejected(_)
            | Self::Decode { .. }
            | Self::Io { .. } => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// Whether a manual retry of the same action can succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Io { .. })
    }

    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    pub(crate) fn not_found(table: &str, id: impl ToString) -> Self {
        Self::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_surface_as_generic_failures() {
        let err = SourceError::not_found("employees", "emp-1");
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
        assert!(!err.is_retryable());
    }

    #[test]
    fn network_failures_are_retryable() {
        let err = SourceError::Network("connection reset".to_string());
        assert!(err.is_retryable());
        assert!(err.user_message().contains("connection"));
        assert!(!err.is_auth());
        assert!(SourceError::Auth("expired".to_string()).is_auth());
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = SourceError::from(ValidationError::NoRecipients);
        assert_eq!(err.user_message(), "email needs at least one recipient");
    }
}
