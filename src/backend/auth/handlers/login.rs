/**
 * Login Handler
 *
 * POST {prefix}/auth/login
 *
 * # Security
 *
 * - Unknown email and wrong password both return 401 with the same message
 * - A failed login body carries no tokens
 * - Passwords are never logged or returned
 */
use axum::{extract::State, response::Json};

use crate::backend::auth::service::AuthService;
use crate::backend::error::{ApiJson, BackendError};
use crate::shared::{AuthPayload, LoginRequest};

/// Login handler
///
/// # Example Response
///
/// ```json
/// {
///   "user": { "id": "123e4567-e89b-12d3-a456-426614174000", "email": "a@x.com", "role": "user", ... },
///   "accessToken": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "refreshToken": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
/// }
/// ```
pub async fn login(
    State(auth): State<AuthService>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthPayload>, BackendError> {
    Ok(Json(auth.login(request).await?))
}
