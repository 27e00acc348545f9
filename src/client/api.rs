/**
 * Booking API Client
 *
 * Thin async HTTP client over the backend auth endpoints. Non-2xx responses
 * become `ClientError::Api` carrying the server's `error` message so callers
 * can show it to the user as-is.
 */

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::client::config::ClientConfig;
use crate::client::error::ClientError;
use crate::shared::{
    AuthPayload, ErrorBody, ForgotPasswordRequest, LoginRequest, MessageResponse,
    RefreshRequest, RegisterRequest, UserProfile,
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, ClientError> {
        let url = self.config.api_url("/auth/login");
        self.send(self.http.post(url).json(request)).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, ClientError> {
        let url = self.config.api_url("/auth/register");
        self.send(self.http.post(url).json(request)).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthPayload, ClientError> {
        let url = self.config.api_url("/auth/refresh");
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.send(self.http.post(url).json(&body)).await
    }

    /// Get current user info with token
    pub async fn me(&self, access_token: &str) -> Result<UserProfile, ClientError> {
        let url = self.config.api_url("/auth/me");
        self.send(self.http.get(url).bearer_auth(access_token)).await
    }

    pub async fn logout(&self, access_token: &str) -> Result<MessageResponse, ClientError> {
        let url = self.config.api_url("/auth/logout");
        self.send(self.http.post(url).bearer_auth(access_token)).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ClientError> {
        let url = self.config.api_url("/auth/forgot-password");
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.send(self.http.post(url).json(&body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
            tracing::debug!(status = status.as_u16(), "API error: {}", message);
            return Err(ClientError::api(status.as_u16(), message));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}
