/**
 * Server Initialization
 *
 * Builds the application state and router from loaded settings and an
 * existing pool. Nothing here touches the network; the process shell
 * decides when the pool is checked and when the listener binds.
 */

use axum::Router;
use std::sync::Arc;

use crate::backend::db::Database;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::Settings;
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
///
/// # Arguments
///
/// * `settings` - Loaded server settings
/// * `db` - The process-wide pool handle
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_app(settings: Arc<Settings>, db: Database) -> Router<()> {
    tracing::info!(
        environment = %settings.server.environment,
        api_prefix = %settings.server.api_prefix,
        "Initializing gym booking backend"
    );

    let app_state = AppState::new(settings, db);
    let app = create_router(app_state);

    tracing::info!("Router configured");
    app
}
