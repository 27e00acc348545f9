/**
 * Auth Service
 *
 * Orchestrates the login, register, refresh, logout and forgot-password
 * flows against the pool. Handlers stay thin and delegate here.
 *
 * # Flows
 *
 * 1. **Register**: validate → hash → BEGIN, duplicate check, insert, COMMIT → session pair
 * 2. **Login**: look up by email → verify hash → session pair
 * 3. **Refresh**: verify refresh token → load user → new session pair
 * 4. **Logout**: acknowledged only; tokens are discarded client-side
 * 5. **Forgot password**: always succeeds, whether or not the email exists
 */
use uuid::Uuid;

use crate::backend::auth::error::AuthError;
use crate::backend::auth::password::{hash_password, verify_password};
use crate::backend::auth::sessions::TokenService;
use crate::backend::auth::users::{self, NewUser, UserRecord};
use crate::backend::db::Database;
use crate::shared::{
    normalize_email, AuthPayload, LoginRequest, MessageResponse, RegisterRequest, UserProfile,
};

/// Body returned by forgot-password for every email
pub const RESET_REQUESTED_MESSAGE: &str =
    "If an account exists for that email, a password reset link has been sent";

/// Body returned by logout
pub const LOGGED_OUT_MESSAGE: &str = "Logged out successfully";

#[derive(Clone)]
pub struct AuthService {
    db: Database,
    tokens: TokenService,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(db: Database, tokens: TokenService, bcrypt_cost: u32) -> Self {
        Self {
            db,
            tokens,
            bcrypt_cost,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Create an account and sign the new user in.
    ///
    /// The duplicate check and the insert share one transaction; a duplicate
    /// leaves no row behind.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthPayload, AuthError> {
        request.validate()?;

        let email = normalize_email(&request.email);
        let password_hash = hash_password(request.password, self.bcrypt_cost).await?;
        let new_user = NewUser {
            email,
            password_hash,
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            phone: request
                .phone
                .map(|phone| phone.trim().to_string())
                .filter(|phone| !phone.is_empty()),
        };

        let record = self
            .db
            .run_transaction(move |client| {
                Box::pin(async move {
                    if users::email_exists(client, &new_user.email).await? {
                        return Err(AuthError::DuplicateEmail);
                    }
                    users::insert_user(client, &new_user).await.map_err(|err| {
                        if err.is_unique_violation() {
                            AuthError::DuplicateEmail
                        } else {
                            AuthError::Database(err)
                        }
                    })
                })
            })
            .await
            .map_err(|err| {
                if matches!(err, AuthError::DuplicateEmail) {
                    tracing::warn!("Registration rejected: email already registered");
                }
                err
            })?;

        tracing::info!("User registered: {} ({})", record.email, record.id);
        self.session_for(record)
    }

    /// Exchange credentials for a session pair
    pub async fn login(&self, request: LoginRequest) -> Result<AuthPayload, AuthError> {
        let email = normalize_email(&request.email);

        let Some(record) = users::find_by_email(&self.db, &email).await? else {
            tracing::warn!("Login failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(request.password, record.password_hash.clone()).await? {
            tracing::warn!("Login failed: wrong password for user {}", record.id);
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!("User logged in: {} ({})", record.email, record.id);
        self.session_for(record)
    }

    /// Mint a new session pair from a valid refresh token
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthPayload, AuthError> {
        let claims = self.tokens.verify_refresh(refresh_token)?;
        let user_id = claims.user_id()?;

        let record = users::find_by_id(&self.db, user_id).await?.ok_or_else(|| {
            tracing::warn!("Refresh token for deleted user {}", user_id);
            AuthError::TokenInvalid
        })?;

        self.session_for(record)
    }

    /// Acknowledge a logout. No server-side state changes.
    pub fn logout(&self, user_id: Uuid) -> MessageResponse {
        tracing::info!("User logged out: {}", user_id);
        MessageResponse::new(LOGGED_OUT_MESSAGE)
    }

    /// Accept a reset request. The response is identical whether or not the
    /// email belongs to an account, and lookup failures are only logged.
    pub async fn forgot_password(&self, email: &str) -> MessageResponse {
        let email = normalize_email(email);
        match users::find_by_email(&self.db, &email).await {
            Ok(Some(record)) => {
                tracing::info!("Password reset requested for user {}", record.id);
            }
            Ok(None) => {
                tracing::debug!("Password reset requested for unknown email");
            }
            Err(err) => {
                tracing::error!("Password reset lookup failed: {}", err);
            }
        }
        MessageResponse::new(RESET_REQUESTED_MESSAGE)
    }

    /// Load the profile of an authenticated user
    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile, AuthError> {
        let record = users::find_by_id(&self.db, user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(record.into_profile()?)
    }

    fn session_for(&self, record: UserRecord) -> Result<AuthPayload, AuthError> {
        let profile = record.into_profile()?;
        let pair = self.tokens.issue_pair(profile.id, &profile.email)?;
        Ok(AuthPayload {
            user: profile,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }
}
