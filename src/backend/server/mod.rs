//! Server Module
//!
//! Everything needed to turn loaded settings into a running process.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── config.rs       - Environment-driven settings
//! ├── state.rs        - AppState and FromRef implementations
//! ├── init.rs         - Router construction
//! └── shell.rs        - Startup, health gating, graceful shutdown
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gymbook::backend::server::{ProcessShell, Settings};
//!
//! # async fn example() {
//! let settings = Settings::from_env().expect("valid configuration");
//! let code = ProcessShell::new(settings).run().await;
//! std::process::exit(code);
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

/// Process lifecycle
pub mod shell;

pub use config::Settings;
pub use init::create_app;
pub use shell::{ProcessShell, ServerPhase};
pub use state::AppState;
