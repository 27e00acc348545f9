//! JSON body extractor with the API's error format.
//!
//! `axum::Json` rejects a malformed body with a plain-text 4xx. `ApiJson`
//! turns the same rejection into a `BackendError`, so the client gets the
//! usual `{"error", "status"}` body with 400.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::backend::error::types::BackendError;
use crate::shared::SharedError;

/// Request body extractor for API handlers
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        Self::SharedError(SharedError::serialization(rejection.body_text()))
    }
}
