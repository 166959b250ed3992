//! Application error types
//!
//! Failures raised while assembling and running the service process.

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Get error code for logs and process exit reports
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) => "STORE_UNAVAILABLE",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
