/**
 * Authentication Middleware
 *
 * This module protects routes that require a signed-in user. It extracts
 * the bearer access token from the Authorization header, validates it and
 * attaches the caller to the request extensions for handlers.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use futures_util::future::BoxFuture;
use uuid::Uuid;

use crate::backend::auth::error::AuthError;
use crate::backend::auth::service::AuthService;
use crate::backend::error::BackendError;
use crate::shared::Role;

/// Authenticated user data extracted from the access token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Pull the token out of `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            AuthError::TokenInvalid
        })?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            tracing::warn!("Invalid Authorization header format");
            AuthError::TokenInvalid
        })
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the bearer token from the Authorization header
/// 2. Verifies signature, expiry and token kind
/// 3. Confirms the user still exists and loads their role
/// 4. Attaches `AuthenticatedUser` to the request extensions
///
/// Returns 401 with "Token has expired" or "Invalid token" otherwise.
pub async fn auth_middleware(
    State(auth): State<AuthService>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let claims = auth.tokens().verify_access(bearer_token(request.headers())?)?;
    let user_id = claims.user_id()?;

    let profile = auth.profile(user_id).await.map_err(|err| match err {
        AuthError::UserNotFound => {
            tracing::warn!("Token for unknown user {}", user_id);
            AuthError::TokenInvalid
        }
        other => other,
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email,
        role: profile.role,
    });

    Ok(next.run(request).await)
}

/// Restrict a route to the given roles
///
/// Must run after `auth_middleware`. Responds 403 when the caller's role is
/// not in `allowed`.
///
/// ```rust,no_run
/// use axum::{middleware, routing::get, Router};
/// use gymbook::backend::middleware::require_role;
/// use gymbook::shared::Role;
///
/// let admin: Router = Router::new()
///     .route("/stats", get(|| async { "ok" }))
///     .layer(middleware::from_fn(require_role(&[Role::Admin])));
/// ```
pub fn require_role(
    allowed: &'static [Role],
) -> impl Fn(Request, Next) -> BoxFuture<'static, Result<Response, BackendError>>
       + Clone
       + Send
       + Sync
       + 'static {
    move |request: Request, next: Next| {
        Box::pin(async move {
            let role = request
                .extensions()
                .get::<AuthenticatedUser>()
                .map(|user| user.role)
                .ok_or(AuthError::TokenInvalid)?;

            if !allowed.contains(&role) {
                tracing::warn!("Role {} denied; requires one of {:?}", role, allowed);
                return Err(BackendError::Forbidden);
            }
            Ok(next.run(request).await)
        })
    }
}

/// Axum extractor for the authenticated user
///
/// Use as a handler parameter on routes behind `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::Auth(AuthError::TokenInvalid)
            })?;

        Ok(AuthUser(user))
    }
}
