/**
 * Process Shell
 *
 * Owns the lifecycle of the server process:
 *
 * ```text
 * Starting → CheckingDb → Listening → Draining → Exited
 *                       ↘ Failed
 * ```
 *
 * The listener is bound only after the database answers the health check.
 * A termination signal, an interrupt, a panic anywhere in the process, or
 * the HTTP server stopping on its own starts draining: stop accepting
 * connections, let in-flight requests finish, close the pool. Draining that
 * takes longer than the forced-shutdown timeout exits non-zero.
 *
 * An error on an idle pooled connection ends the process immediately with
 * `EXIT_IDLE_POOL_FAULT`; the process supervisor is expected to restart it.
 *
 * # Exit Codes
 *
 * - `0` clean shutdown
 * - `1` database unreachable at startup, bind or migration failure,
 *   server failure, or forced-shutdown timeout
 * - `-1` fatal idle-pool error
 */

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch, Notify};

use crate::backend::db::{Database, DatabaseHealth, PoolEvent};
use crate::backend::server::config::Settings;
use crate::backend::server::init::create_app;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_IDLE_POOL_FAULT: i32 = -1;

/// How long draining may take before the process gives up
pub const FORCED_SHUTDOWN_AFTER: Duration = Duration::from_secs(30);

/// Lifecycle phase of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerPhase {
    Starting,
    CheckingDb,
    Listening,
    Failed,
    Draining,
    Exited,
}

/// Handle that starts draining from anywhere, including a panic hook
#[derive(Clone, Default)]
pub struct FatalTrigger {
    notify: Arc<Notify>,
}

impl FatalTrigger {
    /// Request a drain. Safe to call from synchronous code.
    pub fn fire(&self) {
        self.notify.notify_one();
    }

    async fn fired(&self) {
        self.notify.notified().await;
    }
}

/// Why the process left the `Listening` phase
enum Trigger {
    Shutdown,
    Fatal,
    IdlePoolFault(String),
    ServerStopped(Result<std::io::Result<()>, tokio::task::JoinError>),
}

pub struct ProcessShell {
    settings: Arc<Settings>,
    bind_addr: SocketAddr,
    forced_shutdown_after: Duration,
    phase: watch::Sender<ServerPhase>,
    local_addr: watch::Sender<Option<SocketAddr>>,
    fatal: FatalTrigger,
}

impl ProcessShell {
    /// Shell bound to `0.0.0.0:<PORT>` with the default forced-shutdown timeout
    pub fn new(settings: Settings) -> Self {
        let bind_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), settings.server.port);
        Self {
            settings: Arc::new(settings),
            bind_addr,
            forced_shutdown_after: FORCED_SHUTDOWN_AFTER,
            phase: watch::channel(ServerPhase::Starting).0,
            local_addr: watch::channel(None).0,
            fatal: FatalTrigger::default(),
        }
    }

    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_forced_shutdown_after(mut self, timeout: Duration) -> Self {
        self.forced_shutdown_after = timeout;
        self
    }

    /// Watch the lifecycle phase
    pub fn phases(&self) -> watch::Receiver<ServerPhase> {
        self.phase.subscribe()
    }

    /// Address the listener bound to, once listening
    pub fn local_addr(&self) -> watch::Receiver<Option<SocketAddr>> {
        self.local_addr.subscribe()
    }

    pub fn fatal_trigger(&self) -> FatalTrigger {
        self.fatal.clone()
    }

    /// Run until SIGTERM/SIGINT or a panic, returning the exit code.
    ///
    /// Installs a process-wide panic hook that starts draining.
    pub async fn run(self) -> i32 {
        let fatal = self.fatal.clone();
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            previous(info);
            tracing::error!("Uncaught panic, shutting down: {}", info);
            fatal.fire();
        }));

        self.run_until(wait_for_shutdown_signal()).await
    }

    /// Run until `shutdown` completes (or another trigger fires), returning
    /// the exit code.
    pub async fn run_until<F>(self, shutdown: F) -> i32
    where
        F: Future<Output = ()> + Send,
    {
        self.set_phase(ServerPhase::Starting);
        tracing::info!(
            environment = %self.settings.server.environment,
            port = self.settings.server.port,
            "Starting server"
        );

        self.set_phase(ServerPhase::CheckingDb);
        let log_queries = !self.settings.server.is_production();
        let db = Database::connect(&self.settings.database, log_queries);

        match db.check_health().await {
            DatabaseHealth::Reachable { server_time } => {
                tracing::info!(%server_time, "Database connection established");
            }
            DatabaseHealth::Unreachable { error } => {
                tracing::error!(
                    target_db = %self.settings.database.redacted_target(),
                    "Database unreachable, refusing to start: {}",
                    error
                );
                return self.fail(&db).await;
            }
        }

        if let Err(err) = db.migrate().await {
            tracing::error!("Failed to apply migrations: {}", err);
            return self.fail(&db).await;
        }

        let listener = match TcpListener::bind(self.bind_addr).await {
            Ok(listener) => listener,
            Err(err) => {
                tracing::error!("Failed to bind {}: {}", self.bind_addr, err);
                return self.fail(&db).await;
            }
        };
        let local_addr = listener.local_addr().unwrap_or(self.bind_addr);

        let app = create_app(self.settings.clone(), db.clone());
        let (drain_tx, mut drain_rx) = watch::channel(false);
        let mut server = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                let _ = drain_rx.wait_for(|draining| *draining).await;
            })
            .await
        });

        self.local_addr.send_replace(Some(local_addr));
        self.set_phase(ServerPhase::Listening);
        tracing::info!("Listening on {}", local_addr);

        let mut pool_events = db.subscribe();
        let trigger = tokio::select! {
            _ = shutdown => Trigger::Shutdown,
            _ = self.fatal.fired() => Trigger::Fatal,
            message = next_idle_fault(&mut pool_events) => Trigger::IdlePoolFault(message),
            result = &mut server => Trigger::ServerStopped(result),
        };

        match trigger {
            Trigger::IdlePoolFault(message) => {
                tracing::error!("Unexpected error on idle database connection: {}", message);
                server.abort();
                self.set_phase(ServerPhase::Exited);
                EXIT_IDLE_POOL_FAULT
            }
            Trigger::ServerStopped(result) => {
                match result {
                    Ok(Ok(())) => tracing::error!("HTTP server stopped unexpectedly"),
                    Ok(Err(err)) => tracing::error!("HTTP server failed: {}", err),
                    Err(err) => tracing::error!("HTTP server task failed: {}", err),
                }
                self.set_phase(ServerPhase::Draining);
                let code = self.drain(&db, async { Ok(()) }).await;
                self.exit(code.max(EXIT_FAILURE))
            }
            Trigger::Shutdown | Trigger::Fatal => {
                tracing::info!("Shutdown requested, draining connections...");
                self.set_phase(ServerPhase::Draining);
                let _ = drain_tx.send(true);
                let code = self
                    .drain(&db, async move {
                        match server.await {
                            Ok(result) => result,
                            Err(err) => Err(std::io::Error::other(err)),
                        }
                    })
                    .await;
                self.exit(code)
            }
        }
    }

    /// Wait for the server to finish, then close the pool, all within the
    /// forced-shutdown timeout
    async fn drain<F>(&self, db: &Database, server_done: F) -> i32
    where
        F: Future<Output = std::io::Result<()>>,
    {
        let drained = tokio::time::timeout(self.forced_shutdown_after, async {
            let served = server_done.await;
            db.shutdown().await;
            served
        })
        .await;

        match drained {
            Ok(Ok(())) => {
                tracing::info!("Shutdown complete");
                EXIT_OK
            }
            Ok(Err(err)) => {
                tracing::error!("Error while draining HTTP server: {}", err);
                EXIT_FAILURE
            }
            Err(_) => {
                tracing::error!(
                    "Could not drain within {:?}, forcing shutdown",
                    self.forced_shutdown_after
                );
                EXIT_FAILURE
            }
        }
    }

    async fn fail(&self, db: &Database) -> i32 {
        self.set_phase(ServerPhase::Failed);
        db.shutdown().await;
        EXIT_FAILURE
    }

    fn exit(&self, code: i32) -> i32 {
        self.set_phase(ServerPhase::Exited);
        code
    }

    fn set_phase(&self, phase: ServerPhase) {
        tracing::debug!(?phase, "Server phase");
        self.phase.send_replace(phase);
    }
}

async fn next_idle_fault(events: &mut broadcast::Receiver<PoolEvent>) -> String {
    loop {
        match events.recv().await {
            Ok(PoolEvent::IdleConnectionError { message }) => return message,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Missed {} pool events", skipped);
            }
            Err(RecvError::Closed) => return std::future::pending().await,
        }
    }
}

/// Resolve on SIGTERM or SIGINT (Ctrl-C elsewhere)
pub async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => tracing::info!("Received SIGTERM"),
                    _ = sigint.recv() => tracing::info!("Received SIGINT"),
                }
                return;
            }
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!("Could not install signal handlers: {}", err);
            }
        }
    }
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Could not listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
}
