//! Backend Error Module
//!
//! Error types for the HTTP boundary. Handlers and middleware return
//! `BackendError`, which converts into a JSON error response.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError and its status/message mapping
//! ├── conversion.rs - IntoResponse implementation
//! └── extract.rs    - ApiJson body extractor
//! ```
//!
//! Request-scoped failures (credentials, tokens, duplicates, failed
//! transactions) end here. Process-scoped failures (configuration, the
//! startup health check, idle pool errors) are handled by the process shell
//! and never reach a handler.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

/// Request body extraction
pub mod extract;

pub use extract::ApiJson;
pub use types::BackendError;
