//! POST {prefix}/auth/logout (protected)

use axum::{extract::State, response::Json};

use crate::backend::auth::service::AuthService;
use crate::backend::middleware::AuthUser;
use crate::shared::MessageResponse;

/// Acknowledge a logout
///
/// Tokens are not revoked; the client discards them.
pub async fn logout(
    State(auth): State<AuthService>,
    AuthUser(user): AuthUser,
) -> Json<MessageResponse> {
    Json(auth.logout(user.user_id))
}
