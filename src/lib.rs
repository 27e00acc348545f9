//! Gymbook - Gym Booking Backend Core
//!
//! The foundation of a gym booking service: environment-driven settings, a
//! PostgreSQL pool with transaction management, password and token based
//! authentication, and a process shell that starts the HTTP server only once
//! the database answers and drains it cleanly on shutdown.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between client and backend
//!   - User profile, auth request/response bodies
//!   - Validation errors, client API configuration
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Settings, pool manager, auth/session core
//!   - Axum routes and middleware, process shell
//!
//! - **`client`** - Client auth context
//!   - HTTP client for the auth endpoints
//!   - Token storage and route guards
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend modules and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use gymbook::backend::server::{ProcessShell, Settings};
//!
//! # async fn example() {
//! let settings = Settings::from_env().expect("valid configuration");
//! std::process::exit(ProcessShell::new(settings).run().await);
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// Client auth context
pub mod client;
