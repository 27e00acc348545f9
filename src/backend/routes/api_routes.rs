/**
 * API Routes
 *
 * Every route below is mounted under the configured API prefix
 * (`/api/v1` by default).
 *
 * # Routes
 *
 * ## Public
 * - `GET  /health` - Database health
 * - `POST /auth/register` - User registration
 * - `POST /auth/login` - User login
 * - `POST /auth/refresh` - New session pair from a refresh token
 * - `POST /auth/forgot-password` - Password reset request
 *
 * ## Protected (bearer access token)
 * - `GET  /auth/me` - Current user profile
 * - `POST /auth/logout` - Logout acknowledgement
 */

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::backend::auth::handlers::{forgot_password, get_me, login, logout, refresh, register};
use crate::backend::middleware::auth_middleware;
use crate::backend::routes::health::health;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// # Arguments
///
/// * `app_state` - Needed by the auth middleware on protected routes
///
/// # Returns
///
/// Router with API routes configured, still expecting `AppState`
pub fn configure_api_routes(app_state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(get_me))
        .route("/auth/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(app_state, auth_middleware));

    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/forgot-password", post(forgot_password))
        .merge(protected)
}
