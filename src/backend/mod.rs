//! Backend Module
//!
//! The HTTP side of the gym booking service: settings, the PostgreSQL pool,
//! authentication, middleware, routes and the process shell that ties them
//! together.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Settings, state, process lifecycle
//! ├── db/             - Pool, transactions, idle-connection watchdog
//! ├── auth/           - Passwords, tokens, users, auth handlers
//! ├── middleware/     - Bearer auth, role guard, rate limiting
//! ├── routes/         - Router assembly and health check
//! └── error/          - BackendError and its HTTP mapping
//! ```
//!
//! # Error Handling
//!
//! Handlers return `Result<_, BackendError>`. Every error becomes a JSON
//! body of the form `{"error": "...", "status": 401}`; server-side failures
//! are logged and never leak their details to the client.

/// Server setup and configuration
pub mod server;

/// Database access
pub mod db;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

pub use error::BackendError;
pub use server::{create_app, ProcessShell};
