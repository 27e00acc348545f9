/**
 * Gym Booking Server Entry Point
 *
 * Loads `.env`, reads settings, initializes tracing and hands control to the
 * process shell. The shell's return value becomes the process exit code.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use gymbook::backend::server::config::default_log_filter;
    use gymbook::backend::server::{shell::EXIT_FAILURE, ProcessShell, Settings};

    dotenv::dotenv().ok();

    let settings = Settings::from_env();
    let production = settings
        .as_ref()
        .map(|s| s.server.is_production())
        .unwrap_or(false);

    // RUST_LOG wins; otherwise quieter in production
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(default_log_filter(production))
            }),
        )
        .init();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!("Invalid configuration: {}", err);
            std::process::exit(EXIT_FAILURE);
        }
    };

    let code = ProcessShell::new(settings).run().await;
    std::process::exit(code);
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin gymbook-server --features ssr");
    std::process::exit(1);
}
