//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - bearer-token authentication and role checks
//! - **`rate_limit`** - per-client fixed-window rate limiting
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use gymbook::backend::middleware::auth_middleware;
//! use gymbook::backend::server::AppState;
//!
//! # fn example(state: AppState) -> Router<AppState> {
//! Router::new()
//!     .route("/auth/me", get(|| async { "me" }))
//!     .route_layer(middleware::from_fn_with_state(state, auth_middleware))
//! # }
//! ```

pub mod auth;
pub mod rate_limit;

pub use auth::{auth_middleware, bearer_token, require_role, AuthUser, AuthenticatedUser};
pub use rate_limit::{rate_limit_middleware, RateLimitStatus, RateLimiter};
