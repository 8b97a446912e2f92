//! Error types for authentication operations
//!
//! Every failure of the authentication core maps onto one [`AuthError`]
//! kind with a stable error code and HTTP status. Credential failures and
//! authorization denials are deliberately vague.

use serde::Serialize;
use std::fmt;
use tenantgate_store::StoreError;
use thiserror::Error;

/// Why a bearer token was rejected.
///
/// Kept for logging only. Clients always see the same `INVALID_TOKEN` error
/// whatever the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// No token was supplied
    Missing,
    /// Not a structurally valid JWT, or claims missing/mistyped
    Malformed,
    /// Signature does not match
    BadSignature,
    /// `exp` is in the past
    Expired,
    /// `nbf` is in the future
    Premature,
    /// Issued by someone else
    WrongIssuer,
}

impl fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenRejection::Missing => "missing",
            TokenRejection::Malformed => "malformed",
            TokenRejection::BadSignature => "bad signature",
            TokenRejection::Expired => "expired",
            TokenRejection::Premature => "not yet valid",
            TokenRejection::WrongIssuer => "wrong issuer",
        })
    }
}

/// Authentication error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or missing input, caught before touching the store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Login failed. Never says whether the tenant, user or password was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Old password did not match during a password change
    #[error("Invalid old password")]
    InvalidOldPassword,

    /// The caller is not allowed to perform the operation
    #[error("Forbidden: insufficient permissions")]
    Forbidden,

    /// Target resource does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Uniqueness violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bearer token rejected. The reason is not part of the message.
    #[error("Invalid token")]
    InvalidToken(TokenRejection),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Hashing, store or signing failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Check if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AuthError::Internal(_) | AuthError::ConfigError(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Validation(_) | AuthError::InvalidOldPassword => 400,
            AuthError::InvalidCredentials | AuthError::InvalidToken(_) => 401,
            AuthError::Forbidden => 403,
            AuthError::NotFound(_) => 404,
            AuthError::Conflict(_) => 409,
            AuthError::ConfigError(_) | AuthError::Internal(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::InvalidOldPassword => "INVALID_OLD_PASSWORD",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::NotFound(_) => "NOT_FOUND",
            AuthError::Conflict(_) => "CONFLICT",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::ConfigError(_) => "CONFIG_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to return to clients. Server-side details are withheld.
    pub fn public_message(&self) -> String {
        if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }

    /// Body for an error response.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code(),
            error: self.public_message(),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, .. } => AuthError::NotFound(entity.to_string()),
            StoreError::Conflict(msg) => AuthError::Conflict(msg),
            StoreError::Invariant(msg) => AuthError::Validation(msg),
            StoreError::Backend(msg) => AuthError::Internal(msg),
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: &'static str,
    /// Human-readable message
    pub error: String,
}
