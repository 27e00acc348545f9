//! POST {prefix}/auth/refresh

use axum::{extract::State, response::Json};

use crate::backend::auth::service::AuthService;
use crate::backend::error::{ApiJson, BackendError};
use crate::shared::{AuthPayload, RefreshRequest};

/// Exchange a refresh token for a new session pair
///
/// Responds 401 when the token is expired, malformed, an access token, or
/// belongs to a user that no longer exists.
pub async fn refresh(
    State(auth): State<AuthService>,
    ApiJson(request): ApiJson<RefreshRequest>,
) -> Result<Json<AuthPayload>, BackendError> {
    Ok(Json(auth.refresh(&request.refresh_token).await?))
}
