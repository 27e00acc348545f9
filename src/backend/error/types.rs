/**
 * Backend Error Types
 *
 * `BackendError` is the error type of every HTTP handler and middleware.
 * It wraps the errors of the layers below and knows which status code and
 * client-facing message each one maps to.
 *
 * # Error Categories
 *
 * ## Auth Errors
 *
 * Credential, token, duplicate-email and validation failures. Reported to
 * the caller with their own message.
 *
 * ## Database Errors
 *
 * Pool timeouts and an unreachable server surface as 503 so clients may
 * retry. Every other driver failure is a 500 with a generic message; the
 * details only go to the log.
 *
 * ## Request Errors
 *
 * Unknown routes, unreadable request bodies, missing roles and rate
 * limiting.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::error::AuthError;
use crate::backend::db::DatabaseError;
use crate::shared::SharedError;

const INTERNAL_MESSAGE: &str = "Internal server error";
const RETRY_MESSAGE: &str = "Service temporarily unavailable, please retry";

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use gymbook::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Shared error (validation, serialization)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    #[error("Route not found: {path}")]
    NotFound { path: String },

    /// Authenticated, but the role is not allowed here
    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Too many requests, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

impl BackendError {
    /// Create a new handler error with a status code
    ///
    /// # Arguments
    ///
    /// * `status` - HTTP status code
    /// * `message` - Error message
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `InvalidCredentials`, `TokenExpired`, `TokenInvalid` - 401
    /// - `DuplicateEmail` - 409
    /// - validation failures - 400
    /// - `UserNotFound`, `NotFound` - 404
    /// - `Forbidden` - 403
    /// - `RateLimited` - 429
    /// - database timeout or unreachable - 503
    /// - everything else - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::TokenExpired
                | AuthError::TokenInvalid => StatusCode::UNAUTHORIZED,
                AuthError::DuplicateEmail => StatusCode::CONFLICT,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::Validation(_) => StatusCode::BAD_REQUEST,
                AuthError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
                AuthError::Database(db) => database_status(db),
            },
            Self::Database(err) => database_status(err),
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            },
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Get the client-facing error message
    ///
    /// Internal failures are reported with a generic message.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Auth(AuthError::Database(err)) | Self::Database(err) => {
                database_message(err).to_string()
            }
            Self::Auth(AuthError::Hashing(_)) => INTERNAL_MESSAGE.to_string(),
            Self::Auth(AuthError::Validation(SharedError::ValidationError { message, .. }))
            | Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
            Self::Auth(err) => err.to_string(),
            Self::SharedError(SharedError::SerializationError { message }) => message.clone(),
            Self::NotFound { .. } => "Route not found".to_string(),
            Self::Forbidden | Self::RateLimited { .. } => self.to_string(),
        }
    }

    /// Whether the failure is on the server side and should be logged as
    /// an error rather than a warning
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

fn database_status(err: &DatabaseError) -> StatusCode {
    if err.is_retryable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn database_message(err: &DatabaseError) -> &'static str {
    if err.is_retryable() {
        RETRY_MESSAGE
    } else {
        INTERNAL_MESSAGE
    }
}
