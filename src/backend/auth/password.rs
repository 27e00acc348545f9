//! Password hashing.
//!
//! bcrypt is CPU-bound, so both operations run on the blocking thread pool
//! and never stall the async workers.

use crate::backend::auth::error::AuthError;

/// Hash a password with the given bcrypt cost
pub async fn hash_password(password: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check a password against a stored hash
///
/// A malformed stored hash is treated as a mismatch.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?;

    match outcome {
        Ok(valid) => Ok(valid),
        Err(e) => {
            tracing::error!("Stored password hash could not be parsed: {:?}", e);
            Ok(false)
        }
    }
}
