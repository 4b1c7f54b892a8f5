//! Server error types

use thiserror::Error;

/// HTTP server errors
#[derive(Debug, Error)]
pub enum ServerError {
    /// Server bind error
    #[error("failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Error while serving connections
    #[error("server error: {0}")]
    Serve(String),
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;
