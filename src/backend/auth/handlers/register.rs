/**
 * Register Handler
 *
 * POST {prefix}/auth/register
 *
 * # Registration Process
 *
 * 1. Validate email, password length and names
 * 2. Hash the password with the configured bcrypt cost
 * 3. Check for a duplicate email and insert, in one transaction
 * 4. Return the profile and a session pair
 */
use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::service::AuthService;
use crate::backend::error::{ApiJson, BackendError};
use crate::shared::{AuthPayload, RegisterRequest};

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - Validation failed
/// * `409 Conflict` - Email already registered
/// * `503 Service Unavailable` - No database connection available
///
/// # Example Request
///
/// ```http
/// POST /api/v1/auth/register HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "a@x.com",
///   "password": "password123",
///   "firstName": "Ada",
///   "lastName": "Lovelace"
/// }
/// ```
pub async fn register(
    State(auth): State<AuthService>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthPayload>), BackendError> {
    let payload = auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(payload)))
}
