//! End-to-end application suite
//!
//! Starts the server through `ProcessShell` on a loopback port and drives it
//! with the client auth context over real HTTP.

use serial_test::serial;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::oneshot;

use gymbook::backend::server::shell::EXIT_OK;
use gymbook::backend::server::{ProcessShell, ServerPhase};
use gymbook::client::{
    ApiClient, AuthContext, ClientConfig, ClientError, FileTokenStore, GuardDecision,
    TracingNotifier,
};
use gymbook::shared::{AppConfig, RegisterRequest};

use crate::common::{test_settings, TestDatabase};

fn context_for(addr: SocketAddr, store: FileTokenStore) -> AuthContext<FileTokenStore, TracingNotifier> {
    let config = ClientConfig::with_builder(
        AppConfig::builder().server_url(format!("http://{}", addr)),
    )
    .unwrap();
    AuthContext::new(ApiClient::new(config).unwrap(), store, TracingNotifier)
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_register_login_restore_logout() {
    let _fixture = TestDatabase::new().await;
    let shell = ProcessShell::new(test_settings()).with_bind_addr("127.0.0.1:0".parse().unwrap());
    let mut phases = shell.phases();
    let local_addr = shell.local_addr();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let running = tokio::spawn(shell.run_until(async move {
        let _ = stop_rx.await;
    }));

    phases
        .wait_for(|phase| *phase == ServerPhase::Listening)
        .await
        .unwrap();
    let addr = (*local_addr.borrow()).expect("bound address");

    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("session.json");

    // Register, then sign in again from a fresh context
    let context = context_for(addr, FileTokenStore::new(&token_path));
    context.initialize().await;
    assert_eq!(
        context.guard_protected(),
        GuardDecision::Redirect("/login".to_string())
    );

    let request = RegisterRequest {
        email: "a@x.com".to_string(),
        password: "password123".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        phone: None,
    };
    let user = assert_ok!(context.register(&request).await);
    assert_eq!(user.email, "a@x.com");

    let duplicate = context.register(&request).await.unwrap_err();
    assert_eq!(duplicate, ClientError::api(409, "Email is already registered"));

    let restored = context_for(addr, FileTokenStore::new(&token_path));
    restored.initialize().await;
    assert_eq!(restored.user().map(|u| u.id), Some(user.id));

    let wrong = restored.login("a@x.com", "wrong-password").await.unwrap_err();
    assert_eq!(wrong, ClientError::api(401, "Invalid email or password"));

    restored.logout().await.unwrap();
    assert!(!token_path.exists());

    let again = context_for(addr, FileTokenStore::new(&token_path));
    assert_ok!(again.login("a@x.com", "password123").await);
    assert_ok!(again.forgot_password("nonexistent@x.com").await);

    stop_tx.send(()).unwrap();
    let code = tokio::time::timeout(Duration::from_secs(30), running)
        .await
        .expect("drained in time")
        .unwrap();
    assert_eq!(code, EXIT_OK);
}
