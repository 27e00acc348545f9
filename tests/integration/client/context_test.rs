//! Client auth context against a mocked backend

use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gymbook::client::context::{DASHBOARD_PATH, LOGIN_PATH};
use gymbook::client::{
    AuthContext, ClientError, GuardDecision, MemoryTokenStore, StoredTokens, TokenStore,
};
use gymbook::shared::RegisterRequest;

use crate::common::{
    api_client_for, auth_payload_json, error_json, fresh_jwt, jwt_expiring_at, profile_json,
    RecordingNotifier,
};

fn context_with(
    server: &MockServer,
    tokens: StoredTokens,
) -> (AuthContext<MemoryTokenStore, RecordingNotifier>, RecordingNotifier) {
    let notifier = RecordingNotifier::default();
    let context = AuthContext::new(
        api_client_for(server),
        MemoryTokenStore::with_tokens(tokens),
        notifier.clone(),
    );
    (context, notifier)
}

#[tokio::test]
async fn test_initialize_without_token_skips_server() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (context, _) = context_with(&server, StoredTokens::default());
    assert_eq!(context.guard_protected(), GuardDecision::Wait);

    context.initialize().await;

    let state = context.state();
    assert!(!state.loading);
    assert!(state.user.is_none());
    assert_eq!(
        context.guard_protected(),
        GuardDecision::Redirect(LOGIN_PATH.to_string())
    );
    assert_eq!(context.guard_guest(), GuardDecision::Allow);
}

#[tokio::test]
async fn test_initialize_with_expired_token_clears_storage() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let expired = jwt_expiring_at(chrono::Utc::now().timestamp() - 60);
    let (context, _) = context_with(&server, StoredTokens::new(expired, "refresh"));

    context.initialize().await;

    assert!(!context.is_authenticated());
    assert_eq!(context.store().load().unwrap(), StoredTokens::default());
}

#[tokio::test]
async fn test_initialize_restores_session() {
    let server = MockServer::start().await;
    let token = fresh_jwt();
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json("a@x.com")))
        .expect(1)
        .mount(&server)
        .await;

    let (context, _) = context_with(&server, StoredTokens::new(token, "refresh"));
    context.initialize().await;

    assert_eq!(context.user().unwrap().email, "a@x.com");
    assert_eq!(context.guard_protected(), GuardDecision::Allow);
    assert_eq!(
        context.guard_guest(),
        GuardDecision::Redirect(DASHBOARD_PATH.to_string())
    );
}

#[tokio::test]
async fn test_initialize_signs_out_when_profile_fetch_fails() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_json(401, "Invalid token")))
        .mount(&server)
        .await;

    let (context, notifier) = context_with(&server, StoredTokens::new(fresh_jwt(), "refresh"));
    context.initialize().await;

    assert!(!context.is_authenticated());
    assert!(!context.state().loading);
    assert_eq!(context.store().load().unwrap(), StoredTokens::default());
    // Restoring a session is silent
    assert!(notifier.errors().is_empty());
}

#[tokio::test]
async fn test_login_stores_tokens_and_notifies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(serde_json::json!({
            "email": "a@x.com",
            "password": "password123"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(auth_payload_json("a@x.com", "access-1", "refresh-1")),
        )
        .mount(&server)
        .await;

    let (context, notifier) = context_with(&server, StoredTokens::default());
    let user = context.login("a@x.com", "password123").await.unwrap();

    assert_eq!(user.email, "a@x.com");
    assert!(context.is_authenticated());
    assert_eq!(
        context.store().load().unwrap(),
        StoredTokens::new("access-1", "refresh-1")
    );
    assert_eq!(notifier.successes().len(), 1);
}

#[tokio::test]
async fn test_login_failure_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(error_json(401, "Invalid email or password")),
        )
        .mount(&server)
        .await;

    let (context, notifier) = context_with(&server, StoredTokens::default());
    let err = context.login("a@x.com", "wrong").await.unwrap_err();

    assert_eq!(err, ClientError::api(401, "Invalid email or password"));
    assert_eq!(notifier.errors(), vec!["Invalid email or password".to_string()]);
    assert!(!context.is_authenticated());
    assert_eq!(context.store().load().unwrap(), StoredTokens::default());
}

#[tokio::test]
async fn test_register_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(error_json(409, "Email is already registered")),
        )
        .mount(&server)
        .await;

    let (context, notifier) = context_with(&server, StoredTokens::default());
    let request = RegisterRequest {
        email: "a@x.com".to_string(),
        password: "password123".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        phone: None,
    };
    let err = context.register(&request).await.unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert_eq!(notifier.errors(), vec!["Email is already registered".to_string()]);
}

#[tokio::test]
async fn test_non_json_error_uses_status_reason() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/auth/forgot-password"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let (context, _) = context_with(&server, StoredTokens::default());
    let err = context.forgot_password("a@x.com").await.unwrap_err();
    assert_eq!(err, ClientError::api(502, "Bad Gateway"));
}

#[tokio::test]
async fn test_logout_clears_session_even_if_server_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_json(500, "Internal server error")))
        .expect(1)
        .mount(&server)
        .await;

    let (context, notifier) =
        context_with(&server, StoredTokens::new("access-1", "refresh-1"));
    context.logout().await.unwrap();

    assert!(!context.is_authenticated());
    assert_eq!(context.store().load().unwrap(), StoredTokens::default());
    assert_eq!(notifier.successes(), vec!["Logged out successfully".to_string()]);
}

#[tokio::test]
async fn test_forgot_password_reports_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/forgot-password"))
        .and(body_json(serde_json::json!({ "email": "nonexistent@x.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "If an account exists for that email, a password reset link has been sent"
        })))
        .mount(&server)
        .await;

    let (context, notifier) = context_with(&server, StoredTokens::default());
    let response = context.forgot_password("nonexistent@x.com").await.unwrap();

    assert_eq!(notifier.successes(), vec![response.message]);
}

#[tokio::test]
async fn test_refresh_session_replaces_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .and(body_json(serde_json::json!({ "refreshToken": "refresh-1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(auth_payload_json("a@x.com", "access-2", "refresh-2")),
        )
        .mount(&server)
        .await;

    let (context, _) = context_with(&server, StoredTokens::new("access-1", "refresh-1"));
    context.refresh_session().await.unwrap();

    assert_eq!(
        context.store().load().unwrap(),
        StoredTokens::new("access-2", "refresh-2")
    );
    assert!(context.is_authenticated());
}

#[tokio::test]
async fn test_refresh_user_signs_out_on_401() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_json(401, "Token has expired")))
        .mount(&server)
        .await;

    let (context, _) = context_with(&server, StoredTokens::new("access-1", "refresh-1"));
    let err = context.refresh_user().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!context.is_authenticated());
    assert_eq!(context.store().load().unwrap(), StoredTokens::default());
}
