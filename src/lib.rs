//! Session resolution and route gating for a two-role ride-hailing
//! client.
//!
//! ARCHITECTURE
//! ============
//! One [`SessionProvider`] per process owns the [`SessionStore`] and runs
//! the one-time credential resolution at launch. Screens never touch
//! authentication state directly: a [`Gate`] wraps each protected screen,
//! re-derives a [`GuardDecision`] from the live snapshot on every render,
//! and redirects via the injected [`Navigator`] when nobody is signed in.
//!
//! Until resolution settles the gate renders nothing, so neither the
//! protected content nor the login redirect flashes during startup.

pub mod config;
pub mod credentials;
pub mod gate;
pub mod guard;
pub mod provider;
pub mod session;
pub mod store;

pub use config::GateConfig;
pub use credentials::{CredentialError, CredentialStore, FileCredentialStore, MemoryCredentialStore, PersistedCredential};
pub use gate::{Gate, GateOutcome, GuardedScreen, Navigator};
pub use guard::{GuardDecision, decide};
pub use provider::SessionProvider;
pub use session::{Actor, Identity, Role, Session, SessionStatus};
pub use store::{SessionStore, SubscriptionId};
