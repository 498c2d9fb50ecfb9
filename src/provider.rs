//! Session provider — owns the store and the one-time resolution.
//!
//! DESIGN
//! ======
//! The provider owns the [`SessionStore`] for the lifetime of its mount
//! and is the only writer role: the initial resolution plus the explicit
//! login/logout entry points all funnel through it. Resolution reads the
//! persisted credential exactly once per mount, bounded by the configured
//! timeout, and every failure shape (missing, unreadable, malformed,
//! expired, timed out) settles the session as resolved-with-no-actor.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here escalates: an anonymous session is a valid terminal state
//! of resolution, so failures are logged and degraded, never returned.
//! Dropping the provider aborts an in-flight resolution; a result that
//! still lands after unmount is discarded rather than applied.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::GateConfig;
use crate::credentials::{CredentialStore, PersistedCredential};
use crate::session::{Actor, Identity};
use crate::store::SessionStore;

/// Process-lifetime owner of the session store.
pub struct SessionProvider {
    store: Arc<SessionStore>,
    credentials: Arc<dyn CredentialStore>,
    config: GateConfig,
    mounted: Arc<AtomicBool>,
    resolution: Option<JoinHandle<()>>,
}

impl SessionProvider {
    /// Create an unmounted provider with a fresh unresolved store.
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialStore>, config: GateConfig) -> Self {
        Self {
            store: Arc::new(SessionStore::new()),
            credentials,
            config,
            mounted: Arc::new(AtomicBool::new(false)),
            resolution: None,
        }
    }

    /// Read handle to the owned store, for gates and subscribers.
    #[must_use]
    pub fn store(&self) -> Arc<SessionStore> {
        Arc::clone(&self.store)
    }

    /// Begin the one-time asynchronous resolution.
    ///
    /// Calling `mount` again on an already-mounted provider is a no-op;
    /// resolution runs exactly once per mount.
    pub fn mount(&mut self) {
        if self.resolution.is_some() {
            debug!("provider already mounted; resolution not restarted");
            return;
        }
        self.mounted.store(true, Ordering::Release);

        let store = Arc::clone(&self.store);
        let credentials = Arc::clone(&self.credentials);
        let config = self.config.clone();
        let mounted = Arc::clone(&self.mounted);

        self.resolution = Some(tokio::spawn(async move {
            let actor = resolve(credentials, &config).await;
            if mounted.load(Ordering::Acquire) {
                store.set_actor(actor);
            } else {
                debug!("resolution settled after unmount; result discarded");
            }
        }));
    }

    /// Record a successful authentication against the remote API.
    ///
    /// Persists the credential best-effort (a storage failure is logged,
    /// not surfaced; the in-memory session still logs in) and commits the
    /// actor, which resolves the session and notifies subscribers.
    pub async fn login(&self, identity: Identity, token: impl Into<String>) {
        let now = OffsetDateTime::now_utc();
        let credential = PersistedCredential {
            token: token.into(),
            identity: identity.clone(),
            issued_at: now,
            expires_at: now + self.config.credential_ttl,
        };

        match credential.encode() {
            Ok(encoded) => {
                if let Err(e) = self.credentials.set(&self.config.credential_key, &encoded).await {
                    warn!(error = %e, "credential persist failed; session will not survive restart");
                }
            }
            Err(e) => {
                warn!(error = %e, "credential encode failed; session will not survive restart");
            }
        }

        info!(role = ?identity.role, "login committed");
        self.store.set_actor(Actor::Present(identity));
    }

    /// Clear the session and drop the persisted credential best-effort.
    pub async fn logout(&self) {
        if let Err(e) = self.credentials.delete(&self.config.credential_key).await {
            warn!(error = %e, "credential delete failed on logout");
        }
        info!("logout committed");
        self.store.reset();
    }
}

impl Drop for SessionProvider {
    fn drop(&mut self) {
        self.mounted.store(false, Ordering::Release);
        if let Some(handle) = self.resolution.take() {
            handle.abort();
        }
    }
}

/// Recover the persisted actor, degrading every failure to `Absent`.
async fn resolve(credentials: Arc<dyn CredentialStore>, config: &GateConfig) -> Actor {
    let read = tokio::time::timeout(config.resolve_timeout, credentials.get(&config.credential_key)).await;

    let raw = match read {
        Err(_) => {
            warn!(
                timeout_ms = config.resolve_timeout.as_millis() as u64,
                "credential read timed out; resolving without actor"
            );
            return Actor::Absent;
        }
        Ok(Err(e)) => {
            warn!(error = %e, "credential read failed; resolving without actor");
            return Actor::Absent;
        }
        Ok(Ok(None)) => {
            info!("no persisted credential; resolving without actor");
            return Actor::Absent;
        }
        Ok(Ok(Some(raw))) => raw,
    };

    let credential = match PersistedCredential::decode(&raw) {
        Ok(credential) => credential,
        Err(e) => {
            warn!(error = %e, "persisted credential malformed; resolving without actor");
            return Actor::Absent;
        }
    };

    if credential.is_expired(OffsetDateTime::now_utc()) {
        info!("persisted credential expired; resolving without actor");
        if let Err(e) = credentials.delete(&config.credential_key).await {
            warn!(error = %e, "expired credential cleanup failed");
        }
        return Actor::Absent;
    }

    if !credential.identity.is_well_formed() {
        warn!("persisted identity malformed; resolving without actor");
        return Actor::Absent;
    }

    info!(role = ?credential.identity.role, "session restored from persisted credential");
    Actor::Present(credential.identity)
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
