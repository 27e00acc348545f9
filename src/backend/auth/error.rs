/**
 * Authentication Errors
 *
 * Every failure the auth core can report to a caller. None of these are
 * fatal to the process; the request boundary turns them into JSON error
 * responses.
 */
use thiserror::Error;

use crate::backend::db::DatabaseError;
use crate::shared::SharedError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. The two cases are indistinguishable
    /// to the caller.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Token has expired")]
    TokenExpired,

    /// Bad signature, malformed token, or a token of the wrong kind
    #[error("Invalid token")]
    TokenInvalid,

    #[error("User not found")]
    UserNotFound,

    #[error(transparent)]
    Validation(#[from] SharedError),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl AuthError {
    /// Whether the failure is about the presented token
    pub fn is_token_error(&self) -> bool {
        matches!(self, Self::TokenExpired | Self::TokenInvalid)
    }
}
