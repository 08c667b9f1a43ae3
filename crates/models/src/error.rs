use serde::{Deserialize, Serialize};
use thiserror::Error;
use sqlx;

/// Error body returned to clients: `{"detail": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorShape {
    pub detail: String,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Testing is disabled")]
    TestingDisabled,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid username")]
    UsernameMismatch,

    #[error("Invalid platform")]
    PlatformMismatch,

    #[error("Incorrect username or platform")]
    UnknownUser,

    #[error("Inactive user")]
    InactiveUser,

    #[error("User not registered")]
    UserNotRegistered,

    #[error("Name already exist")]
    NameTaken,

    #[error("Creation failed")]
    CreationFailed,

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Token encoding failed: {reason}")]
    TokenEncoding { reason: String },

    #[error("Database error: {reason}")]
    DatabaseError { reason: String },

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Cache error: {reason}")]
    CacheError { reason: String },

    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    #[error("TLS error: {reason}")]
    TlsError { reason: String },

    #[error("Internal server error: {reason}")]
    InternalError { reason: String },
}

impl AuthError {
    /// Client-facing body. Server-side failures never echo their cause.
    pub fn to_error_shape(&self) -> ErrorShape {
        let detail = if self.http_status() >= 500 {
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };
        ErrorShape { detail }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            AuthError::TestingDisabled => "TestingDisabled",
            AuthError::InvalidToken => "InvalidToken",
            AuthError::UsernameMismatch => "UsernameMismatch",
            AuthError::PlatformMismatch => "PlatformMismatch",
            AuthError::UnknownUser => "UnknownUser",
            AuthError::InactiveUser => "InactiveUser",
            AuthError::UserNotRegistered => "UserNotRegistered",
            AuthError::NameTaken => "NameTaken",
            AuthError::CreationFailed => "CreationFailed",
            AuthError::InvalidField { .. } => "ValidationError",
            AuthError::TokenEncoding { .. } => "ServiceException",
            AuthError::DatabaseError { .. } => "ServiceException",
            AuthError::SqlxError(_) => "ServiceException",
            AuthError::CacheError { .. } => "ServiceException",
            AuthError::ConfigError { .. } => "ConfigException",
            AuthError::TlsError { .. } => "ConfigException",
            AuthError::InternalError { .. } => "ServiceException",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            AuthError::TestingDisabled => 400,
            AuthError::InvalidToken => 400,
            AuthError::UsernameMismatch => 400,
            AuthError::PlatformMismatch => 400,
            AuthError::UnknownUser => 400,
            AuthError::InactiveUser => 401,
            AuthError::UserNotRegistered => 400,
            AuthError::NameTaken => 400,
            AuthError::CreationFailed => 400,
            AuthError::InvalidField { .. } => 422,
            AuthError::TokenEncoding { .. } => 500,
            AuthError::DatabaseError { .. } => 500,
            AuthError::SqlxError(_) => 500,
            AuthError::CacheError { .. } => 503,
            AuthError::ConfigError { .. } => 500,
            AuthError::TlsError { .. } => 500,
            AuthError::InternalError { .. } => 500,
        }
    }
}
