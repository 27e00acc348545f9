//! Shared Module
//!
//! This module contains types that are shared between the client auth
//! context and the backend. Everything here is plain data designed for
//! serialization over the HTTP API.

/// Shared error types
pub mod error;

/// Client-facing API configuration
pub mod config;

/// User profile and auth request/response types
pub mod user;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, AppConfigError};
pub use error::SharedError;
pub use user::{
    AuthPayload, ErrorBody, ForgotPasswordRequest, LoginRequest, MessageResponse,
    RefreshRequest, RegisterRequest, Role, UserProfile, normalize_email, validate_email,
};
