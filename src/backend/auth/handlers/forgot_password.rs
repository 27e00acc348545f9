//! POST {prefix}/auth/forgot-password

use axum::{extract::State, response::Json};

use crate::backend::auth::service::AuthService;
use crate::backend::error::{ApiJson, BackendError};
use crate::shared::{ForgotPasswordRequest, MessageResponse};

/// Accept a password reset request
///
/// Any readable request gets 200 with the same body, so the response says
/// nothing about whether the account exists. No email is sent.
pub async fn forgot_password(
    State(auth): State<AuthService>,
    ApiJson(request): ApiJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    Ok(Json(auth.forgot_password(&request.email).await))
}
