//! Router behaviour that needs no live database
//!
//! The pool points at a closed port, so anything that reaches the database
//! fails fast.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use tower::ServiceExt;
use uuid::Uuid;

use gymbook::backend::auth::TokenService;
use gymbook::backend::auth::service::RESET_REQUESTED_MESSAGE;

use crate::common::{
    app_for, bearer_request, body_json, empty_request, json_request, register_body,
    unreachable_settings,
};

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (app, _db) = app_for(unreachable_settings(&[]));
    let response = app
        .oneshot(empty_request(Method::GET, "/api/v1/classes/nope"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_error_body!(body, 404, "Route not found");
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let (app, _db) = app_for(unreachable_settings(&[]));
    let response = app
        .oneshot(empty_request(Method::GET, "/api/v1/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["status"], "unavailable");
    assert_eq!(body["database"], "unreachable");
}

#[tokio::test]
async fn test_root_prefix_mounts_routes_at_top_level() {
    let (app, _db) = app_for(unreachable_settings(&[("API_PREFIX", "/")]));
    let response = app
        .oneshot(empty_request(Method::GET, "/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_me_requires_bearer_token() {
    let (app, _db) = app_for(unreachable_settings(&[]));

    let response = app
        .clone()
        .oneshot(empty_request(Method::GET, "/api/v1/auth/me"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_error_body!(body, 401, "Invalid token");

    let response = app
        .oneshot(bearer_request(Method::GET, "/api/v1/auth/me", "not-a-jwt"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_error_body!(body, 401, "Invalid token");
}

#[tokio::test]
async fn test_expired_access_token_is_rejected() {
    let settings = unreachable_settings(&[]);
    let tokens = TokenService::new(&settings.jwt);
    let (app, _db) = app_for(settings);

    let stale = tokens
        .issue_pair_at(Uuid::new_v4(), "a@x.com", Utc::now() - Duration::days(8))
        .unwrap();
    let response = app
        .oneshot(bearer_request(Method::GET, "/api/v1/auth/me", &stale.access_token))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_error_body!(body, 401, "Token has expired");
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let settings = unreachable_settings(&[]);
    let tokens = TokenService::new(&settings.jwt);
    let (app, _db) = app_for(settings);

    let pair = tokens.issue_pair(Uuid::new_v4(), "a@x.com").unwrap();
    let response = app
        .oneshot(bearer_request(Method::POST, "/api/v1/auth/logout", &pair.refresh_token))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_error_body!(body, 401, "Invalid token");
}

#[tokio::test]
async fn test_register_validation_happens_before_database() {
    let (app, _db) = app_for(unreachable_settings(&[]));

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/register",
            register_body("no-at-sign", "password123"),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_error_body!(body, 400, "Invalid email format");

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/register",
            register_body("a@x.com", "short"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unreadable_bodies_get_json_400() {
    let (app, _db) = app_for(unreachable_settings(&[]));

    let mut missing_name = register_body("a@x.com", "password123");
    missing_name.as_object_mut().unwrap().remove("firstName");
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/v1/auth/register", missing_name))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body = body_json(response).await;
    assert_eq!(body["status"], 400);
    assert_contains!(body["error"].as_str().unwrap(), "firstName");

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_login_with_database_down_is_a_server_error() {
    let (app, _db) = app_for(unreachable_settings(&[]));
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/login",
            serde_json::json!({ "email": "a@x.com", "password": "password123" }),
        ))
        .await
        .unwrap();

    assert!(response.status().is_server_error());
    let body = body_json(response).await;
    assert!(body.get("accessToken").is_none());
}

#[tokio::test]
async fn test_forgot_password_succeeds_even_when_lookup_fails() {
    let (app, _db) = app_for(unreachable_settings(&[]));
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/forgot-password",
            serde_json::json!({ "email": "nonexistent@x.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], RESET_REQUESTED_MESSAGE);
}

#[tokio::test]
async fn test_rate_limit_rejects_after_threshold() {
    let (app, _db) = app_for(unreachable_settings(&[("RATE_LIMIT_MAX_REQUESTS", "2")]));

    for remaining in ["1", "0"] {
        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, "/api/v1/unknown"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-ratelimit-limit"], "2");
        assert_eq!(response.headers()["x-ratelimit-remaining"], remaining);
    }

    let response = app
        .oneshot(empty_request(Method::GET, "/api/v1/unknown"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
    assert_eq!(response.headers()["x-ratelimit-remaining"], "0");
    let body = body_json(response).await;
    assert_eq!(body["status"], 429);
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let (app, _db) = app_for(unreachable_settings(&[("CORS_ORIGIN", "https://gym.example.com")]));

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/auth/login")
        .header(header::ORIGIN, "https://gym.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(preflight).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://gym.example.com"
    );

    let foreign = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/health")
        .header(header::ORIGIN, "https://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(foreign).await.unwrap();
    assert!(!response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
