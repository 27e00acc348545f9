//! Authentication Module
//!
//! Turns credentials into signed session pairs and validates them on
//! incoming requests.
//!
//! # Architecture
//!
//! - **`sessions`** - access/refresh JWT issue and validation
//! - **`password`** - bcrypt hashing on the blocking pool
//! - **`users`** - user records and queries
//! - **`service`** - login, register, refresh, logout and forgot-password flows
//! - **`handlers`** - HTTP handlers
//! - **`error`** - `AuthError`
//!
//! # Authentication Flow
//!
//! 1. **Register**: profile → validated, hashed, inserted in a transaction → session pair
//! 2. **Login**: email and password → hash verified → session pair
//! 3. **Refresh**: refresh token → new session pair
//! 4. **Me**: access token → profile
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt at the configured cost
//! - Tokens are stateless; logout only tells the client to discard them
//! - Access tokens always expire before their refresh token
//! - Invalid credentials return 401 without saying which part was wrong

pub mod error;
pub mod handlers;
pub mod password;
pub mod service;
pub mod sessions;
pub mod users;

pub use error::AuthError;
pub use service::AuthService;
pub use sessions::{Claims, SessionPair, TokenKind, TokenService};
