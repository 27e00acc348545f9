/**
 * Client Auth Context
 *
 * Mirrors the server session on the client: which user is signed in and
 * whether that is still being determined. Tokens live in a `TokenStore`;
 * every mutating call reports its outcome through a `Notifier` and still
 * returns the error so the caller can keep its form open.
 *
 * The local expiry check only decodes the token payload. It never verifies
 * the signature and only saves a round trip; the server re-validates every
 * request.
 */

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;
use std::sync::RwLock;

use crate::client::api::ApiClient;
use crate::client::error::ClientError;
use crate::client::notify::Notifier;
use crate::client::storage::{StoredTokens, TokenStore};
use crate::shared::{AuthPayload, LoginRequest, MessageResponse, RegisterRequest, UserProfile};

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// What the UI knows about the session
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<UserProfile>,
    /// True until `initialize` has settled the session
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Route guard outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still loading; render a spinner
    Wait,
    Allow,
    Redirect(String),
}

pub struct AuthContext<S: TokenStore, N: Notifier> {
    api: ApiClient,
    store: S,
    notifier: N,
    state: RwLock<AuthState>,
}

impl<S: TokenStore, N: Notifier> AuthContext<S, N> {
    pub fn new(api: ApiClient, store: S, notifier: N) -> Self {
        Self {
            api,
            store,
            notifier,
            state: RwLock::new(AuthState::default()),
        }
    }

    pub fn state(&self) -> AuthState {
        match self.state.read() {
            Ok(state) => state.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state().user
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Settle the session from stored tokens.
    ///
    /// Never fails: a missing, expired or rejected token leaves the context
    /// signed out with its tokens cleared.
    pub async fn initialize(&self) {
        self.update(|state| state.loading = true);

        let tokens = self.store.load().unwrap_or_else(|err| {
            tracing::warn!("Could not read stored tokens: {}", err);
            StoredTokens::default()
        });

        let access_token = match tokens.access_token {
            Some(token) if !is_token_expired(&token) => token,
            Some(_) => {
                tracing::debug!("Stored access token expired");
                self.sign_out_locally();
                return;
            }
            None => {
                self.sign_out_locally();
                return;
            }
        };

        match self.api.me(&access_token).await {
            Ok(user) => self.update(|state| {
                state.user = Some(user);
                state.loading = false;
            }),
            Err(err) => {
                tracing::debug!("Session restore failed: {}", err);
                self.sign_out_locally();
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ClientError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = match self.api.login(&request).await {
            Ok(payload) => self.establish(payload),
            Err(err) => Err(err),
        };
        self.report(result, |_| "Welcome back!".to_string())
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, ClientError> {
        let result = match self.api.register(request).await {
            Ok(payload) => self.establish(payload),
            Err(err) => Err(err),
        };
        self.report(result, |_| "Account created successfully".to_string())
    }

    /// Discard the session. The server call is a courtesy; its failure does
    /// not keep the user signed in.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if let Ok(StoredTokens {
            access_token: Some(token),
            ..
        }) = self.store.load()
        {
            if let Err(err) = self.api.logout(&token).await {
                tracing::debug!("Server logout failed: {}", err);
            }
        }

        self.update(|state| state.user = None);
        let result = self.store.clear();
        self.report(result, |_| "Logged out successfully".to_string())
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ClientError> {
        let result = self.api.forgot_password(email).await;
        self.report(result, |response| response.message.clone())
    }

    /// Re-fetch the signed-in user's profile
    ///
    /// Returns `Ok(None)` when there is no stored access token. A 401 signs
    /// the context out.
    pub async fn refresh_user(&self) -> Result<Option<UserProfile>, ClientError> {
        let Some(token) = self.store.load()?.access_token else {
            return Ok(None);
        };

        match self.api.me(&token).await {
            Ok(user) => {
                self.update(|state| state.user = Some(user.clone()));
                Ok(Some(user))
            }
            Err(err) => {
                if err.is_unauthorized() {
                    self.sign_out_locally();
                }
                Err(err)
            }
        }
    }

    /// Trade the stored refresh token for a new session pair
    pub async fn refresh_session(&self) -> Result<UserProfile, ClientError> {
        let refresh_token = self
            .store
            .load()?
            .refresh_token
            .ok_or_else(|| ClientError::api(401, "Invalid token"))?;

        match self.api.refresh(&refresh_token).await {
            Ok(payload) => self.establish(payload),
            Err(err) => {
                if err.is_unauthorized() {
                    self.sign_out_locally();
                }
                Err(err)
            }
        }
    }

    /// Guard for pages that need a signed-in user
    pub fn guard_protected(&self) -> GuardDecision {
        let state = self.state();
        if state.loading {
            GuardDecision::Wait
        } else if state.is_authenticated() {
            GuardDecision::Allow
        } else {
            GuardDecision::Redirect(LOGIN_PATH.to_string())
        }
    }

    /// Guard for login and registration pages
    pub fn guard_guest(&self) -> GuardDecision {
        let state = self.state();
        if state.loading {
            GuardDecision::Wait
        } else if state.is_authenticated() {
            GuardDecision::Redirect(DASHBOARD_PATH.to_string())
        } else {
            GuardDecision::Allow
        }
    }

    fn establish(&self, payload: AuthPayload) -> Result<UserProfile, ClientError> {
        self.store
            .save(&StoredTokens::new(payload.access_token, payload.refresh_token))?;
        let user = payload.user;
        self.update(|state| {
            state.user = Some(user.clone());
            state.loading = false;
        });
        Ok(user)
    }

    fn sign_out_locally(&self) {
        if let Err(err) = self.store.clear() {
            tracing::warn!("Could not clear stored tokens: {}", err);
        }
        self.update(|state| {
            state.user = None;
            state.loading = false;
        });
    }

    fn report<T>(
        &self,
        result: Result<T, ClientError>,
        success: impl FnOnce(&T) -> String,
    ) -> Result<T, ClientError> {
        match &result {
            Ok(value) => self.notifier.success(&success(value)),
            Err(err) => self.notifier.error(&err.to_string()),
        }
        result
    }

    fn update(&self, apply: impl FnOnce(&mut AuthState)) {
        match self.state.write() {
            Ok(mut state) => apply(&mut state),
            Err(poisoned) => apply(&mut poisoned.into_inner()),
        }
    }
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

/// Expiry (`exp`, seconds since the epoch) read from an unverified JWT
pub fn token_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice::<ExpiryClaim>(&bytes).ok()?.exp
}

/// Undecodable tokens count as expired
pub fn is_token_expired(token: &str) -> bool {
    match token_expiry(token) {
        Some(exp) => exp <= Utc::now().timestamp(),
        None => true,
    }
}
