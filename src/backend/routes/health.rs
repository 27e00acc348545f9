//! Health endpoint.

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::db::{Database, DatabaseHealth};

/// Body of `GET {prefix}/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_time: Option<DateTime<Utc>>,
}

/// 200 when the database answers, 503 otherwise
pub async fn health(State(db): State<Database>) -> (StatusCode, Json<HealthResponse>) {
    match db.check_health().await {
        DatabaseHealth::Reachable { server_time } => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                database: "reachable".to_string(),
                server_time: Some(server_time),
            }),
        ),
        DatabaseHealth::Unreachable { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unavailable".to_string(),
                database: "unreachable".to_string(),
                server_time: None,
            }),
        ),
    }
}
