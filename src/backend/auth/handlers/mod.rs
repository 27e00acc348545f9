//! Authentication Handlers Module
//!
//! HTTP handlers for the auth endpoints. Each one is a thin wrapper over
//! `AuthService`.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs             - Handler exports
//! ├── register.rs        - POST /auth/register
//! ├── login.rs           - POST /auth/login
//! ├── refresh.rs         - POST /auth/refresh
//! ├── logout.rs          - POST /auth/logout (protected)
//! ├── forgot_password.rs - POST /auth/forgot-password
//! └── me.rs              - GET  /auth/me (protected)
//! ```

pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod register;

pub use forgot_password::forgot_password;
pub use login::login;
pub use logout::logout;
pub use me::get_me;
pub use refresh::refresh;
pub use register::register;
