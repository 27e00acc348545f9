//! Client Module
//!
//! The client side of authentication: an HTTP client for the auth
//! endpoints, token persistence, and `AuthContext`, which tracks the signed-in
//! user and answers route-guard questions for a UI.
//!
//! # Example
//!
//! ```rust,no_run
//! use gymbook::client::{ApiClient, AuthContext, ClientConfig, FileTokenStore, TracingNotifier};
//!
//! # async fn example() -> Result<(), gymbook::client::ClientError> {
//! let api = ApiClient::new(ClientConfig::default())?;
//! let context = AuthContext::new(api, FileTokenStore::in_data_dir()?, TracingNotifier);
//! context.initialize().await;
//! if !context.is_authenticated() {
//!     context.login("a@x.com", "password123").await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod notify;
pub mod storage;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use context::{AuthContext, AuthState, GuardDecision};
pub use error::ClientError;
pub use notify::{Notifier, TracingNotifier};
pub use storage::{FileTokenStore, MemoryTokenStore, StoredTokens, TokenStore};
