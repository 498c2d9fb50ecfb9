//! Persisted credential capability.
//!
//! ARCHITECTURE
//! ============
//! The provider recovers the signed-in identity across process restarts
//! through an opaque key-value capability. Values are opaque strings to
//! the store; the credential payload itself is a JSON document with an
//! expiry, so a stale token degrades to "no actor" instead of leaking
//! into an allow decision.
//!
//! `FileCredentialStore` stands in for the device secure store; swapping
//! in a platform keychain only means implementing [`CredentialStore`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::session::Identity;

/// Failure inside a credential store implementation.
///
/// The provider degrades every variant to "no actor"; these errors never
/// reach the guard or the wrapped screens.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credential storage i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed credential payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

// =============================================================================
// PERSISTED CREDENTIAL
// =============================================================================

/// Credential payload persisted across launches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedCredential {
    /// Opaque backend session token.
    pub token: String,
    /// Identity recovered on the next launch.
    pub identity: Identity,
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl PersistedCredential {
    /// Whether the credential is stale at `now`.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }

    /// Serialize for storage.
    pub fn encode(&self) -> Result<String, CredentialError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a stored value.
    pub fn decode(raw: &str) -> Result<Self, CredentialError> {
        Ok(serde_json::from_str(raw)?)
    }
}

// =============================================================================
// STORE CAPABILITY
// =============================================================================

/// Opaque key-value capability for credential persistence.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the value for `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, CredentialError>;
    /// Write the value for `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), CredentialError>;
    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CredentialError>;
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Volatile store for tests and previews.
#[derive(Default)]
pub struct MemoryCredentialStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CredentialError> {
        self.lock().remove(key);
        Ok(())
    }
}

// =============================================================================
// FILE-BACKED STORE
// =============================================================================

/// JSON-file-backed store, one document holding all keys.
///
/// A missing file reads as empty. Writes rewrite the whole document; the
/// credential map holds a handful of keys at most, so this stays cheap.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_map(&self) -> Result<HashMap<String, String>, CredentialError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_map(&self, map: &HashMap<String, String>) -> Result<(), CredentialError> {
        let bytes = serde_json::to_vec(map)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.read_map().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        let mut map = self.read_map().await?;
        map.insert(key.to_owned(), value.to_owned());
        self.write_map(&map).await
    }

    async fn delete(&self, key: &str) -> Result<(), CredentialError> {
        let mut map = self.read_map().await?;
        if map.remove(key).is_some() {
            self.write_map(&map).await?;
        }
        Ok(())
    }
}

// =============================================================================
// TEST FIXTURES
// =============================================================================


#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;
