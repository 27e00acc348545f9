/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds:
 * - the immutable `Settings`
 * - the `Database` pool handle (the only pool in the process)
 * - the `AuthService`
 * - the `RateLimiter`
 *
 * Every field is a cheap clone over shared internals, so cloning the state
 * per request costs a few reference-count bumps.
 *
 * # Example
 *
 * ```rust,no_run
 * use gymbook::backend::auth::AuthService;
 * use axum::extract::State;
 *
 * async fn handler(State(auth): State<AuthService>) {
 *     // ...
 * }
 * ```
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::auth::{AuthService, TokenService};
use crate::backend::db::Database;
use crate::backend::middleware::RateLimiter;
use crate::backend::server::config::Settings;

/// Central state container for the Axum application
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub db: Database,
    pub auth: AuthService,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Wire the services together around an existing pool
    pub fn new(settings: Arc<Settings>, db: Database) -> Self {
        let tokens = TokenService::new(&settings.jwt);
        let auth = AuthService::new(db.clone(), tokens, settings.bcrypt_cost);
        let rate_limiter = RateLimiter::new(&settings.rate_limit);
        Self {
            settings,
            db,
            auth,
            rate_limiter,
        }
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for RateLimiter {
    fn from_ref(state: &AppState) -> Self {
        state.rate_limiter.clone()
    }
}

impl FromRef<AppState> for Arc<Settings> {
    fn from_ref(state: &AppState) -> Self {
        state.settings.clone()
    }
}
