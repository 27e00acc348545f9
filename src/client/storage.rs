//! Token Storage
//!
//! Persists the access and refresh tokens between runs under fixed keys.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::client::error::ClientError;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Stored session tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken", skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl StoredTokens {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
        }
    }
}

/// Where the auth context keeps its tokens
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<StoredTokens, ClientError>;
    fn save(&self, tokens: &StoredTokens) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

/// In-process store, lost on exit
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<Mutex<StoredTokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: StoredTokens) -> Self {
        Self {
            tokens: Arc::new(Mutex::new(tokens)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoredTokens> {
        match self.tokens.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<StoredTokens, ClientError> {
        Ok(self.lock().clone())
    }

    fn save(&self, tokens: &StoredTokens) -> Result<(), ClientError> {
        *self.lock() = tokens.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.lock() = StoredTokens::default();
        Ok(())
    }
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/gymbook/session.json`
    pub fn in_data_dir() -> Result<Self, ClientError> {
        let dir = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| ClientError::Storage("no data directory available".to_string()))?;
        Ok(Self::new(dir.join("gymbook").join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<StoredTokens, ClientError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).or_else(|err| {
                tracing::warn!("Discarding unreadable token file {}: {}", self.path.display(), err);
                Ok(StoredTokens::default())
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(StoredTokens::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, tokens: &StoredTokens) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(tokens)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
