//! Error types for the bucket-probe library
//!
//! This module provides the error taxonomy shared by every storage operation,
//! built on `thiserror`. Backend failures are carried as [`BackendError`], a
//! backend-neutral value exposing the protocol status code, so that callers and
//! the existence probe can classify failures without knowing which SDK
//! produced them.

use std::fmt;
use thiserror::Error;

/// The main error type for the bucket-probe library
#[derive(Error, Debug)]
pub enum Error {
    /// Storage operation errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// What is wrong with the configuration
        message: String,
    },
}

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// A container identifier or object key failed validation.
    /// No backend call was issued.
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput {
        /// Name of the offending argument
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// The backend reported a failure
    #[error("{operation} failed for '{resource}': {source}")]
    Backend {
        /// Backend operation that failed
        operation: &'static str,
        /// `container` or `container/key` the operation addressed
        resource: String,
        /// Failure as reported by the backend
        #[source]
        source: BackendError,
    },

    /// The caller cancelled the operation before the backend answered
    #[error("{operation} cancelled for '{resource}'")]
    Cancelled {
        /// Backend operation that was abandoned
        operation: &'static str,
        /// `container` or `container/key` the operation addressed
        resource: String,
    },
}

impl StorageError {
    /// Whether this error comes from caller cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StorageError::Cancelled { .. })
    }

    /// Whether this error was raised by input validation
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, StorageError::InvalidInput { .. })
    }

    /// Status class of the underlying backend failure, if this is one
    pub fn status(&self) -> Option<StatusClass> {
        match self {
            StorageError::Backend { source, .. } => Some(source.status()),
            _ => None,
        }
    }

    /// The underlying backend failure, if this is one
    pub fn backend_error(&self) -> Option<&BackendError> {
        match self {
            StorageError::Backend { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Coarse classification of a backend status signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// The addressed resource does not exist (HTTP 404)
    NotFound,
    /// The caller may not access the resource (HTTP 403)
    Forbidden,
    /// Any other protocol status
    Other(u16),
    /// The failure carried no protocol status (transport error, timeout, ...)
    Unavailable,
}

impl StatusClass {
    /// Classify a raw HTTP status code
    pub fn from_code(code: u16) -> Self {
        match code {
            404 => StatusClass::NotFound,
            403 => StatusClass::Forbidden,
            other => StatusClass::Other(other),
        }
    }
}

/// A failure reported by an [`ObjectBackend`](crate::storage::ObjectBackend).
///
/// Backends populate the status code from the protocol response when one was
/// received; transport-level failures leave it empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    status: Option<u16>,
    message: String,
}

impl BackendError {
    /// Failure with a protocol status code
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Failure without any protocol response
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Shorthand for a 404 failure
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_status(404, message)
    }

    /// Shorthand for a 403 failure
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::with_status(403, message)
    }

    /// Raw protocol status code, if a response was received
    pub fn status_code(&self) -> Option<u16> {
        self.status
    }

    /// Classified status
    pub fn status(&self) -> StatusClass {
        self.status
            .map(StatusClass::from_code)
            .unwrap_or(StatusClass::Unavailable)
    }

    /// Backend-provided description
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "status {}: {}", status, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for BackendError {}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience type alias for Storage Results
pub type StorageResult<T> = std::result::Result<T, StorageError>;
