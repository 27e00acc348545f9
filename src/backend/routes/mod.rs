//! Route Configuration Module
//!
//! - **`router`** - router assembly and cross-cutting layers
//! - **`api_routes`** - auth and health endpoints under the API prefix
//! - **`health`** - database health endpoint
//!
//! # Example
//!
//! ```rust,no_run
//! use gymbook::backend::routes::create_router;
//! use gymbook::backend::server::AppState;
//!
//! # fn example(state: AppState) {
//! let router = create_router(state);
//! # }
//! ```

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

/// Health endpoint
pub mod health;

pub use router::create_router;
