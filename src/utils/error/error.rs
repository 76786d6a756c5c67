//! Error handling for the OData client
//!
//! This module defines all error types used throughout the crate.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for the OData client
pub type Result<T> = std::result::Result<T, ODataError>;

/// Main error type for the OData client
#[derive(Error, Debug)]
pub enum ODataError {
    /// The priming token call was rejected, or its response lacked the
    /// expected `x-csrf-token` / `set-cookie` headers
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Network or HTTP status failure from the underlying call
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response body could not be parsed as JSON
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The async runtime backing a client could not be built
    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),

    /// A dispatched call was cancelled or panicked
    #[error("Task error: {0}")]
    Task(String),

    /// Waiting on a pending response exceeded the given bound
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// A failure observed through a shared deferred value
    #[error(transparent)]
    Shared(Arc<ODataError>),
}

impl ODataError {
    /// Whether the error came from the token handshake
    pub fn is_auth_error(&self) -> bool {
        match self {
            ODataError::Authentication(_) => true,
            ODataError::Shared(inner) => inner.is_auth_error(),
            _ => false,
        }
    }

    /// Whether the error came from the HTTP transport
    pub fn is_transport_error(&self) -> bool {
        match self {
            ODataError::Transport(_) => true,
            ODataError::Shared(inner) => inner.is_transport_error(),
            _ => false,
        }
    }

    /// Whether a body failed to decode as JSON
    pub fn is_decode_error(&self) -> bool {
        match self {
            ODataError::Decode(_) => true,
            ODataError::Shared(inner) => inner.is_decode_error(),
            _ => false,
        }
    }

    /// HTTP status of a transport failure, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ODataError::Transport(e) => e.status().map(|s| s.as_u16()),
            ODataError::Shared(inner) => inner.status(),
            _ => None,
        }
    }
}

impl From<tokio::task::JoinError> for ODataError {
    fn from(error: tokio::task::JoinError) -> Self {
        if error.is_cancelled() {
            ODataError::Task("call was cancelled".to_string())
        } else {
            ODataError::Task(format!("call panicked: {}", error))
        }
    }
}
