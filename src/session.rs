//! Session and actor model.
//!
//! DESIGN
//! ======
//! The session is a plain `{actor, status}` value. `status` starts
//! `Unresolved` and flips to `Resolved` exactly once per provider mount;
//! while `Unresolved`, the actor field carries no authority and the guard
//! must not honor it. The actor is a tagged variant so guard branches are
//! exhaustive at compile time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// ROLE
// =============================================================================

/// User role in the ride-hailing client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Books rides.
    Passenger,
    /// Accepts and fulfils rides.
    Driver,
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Identity of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Passenger or driver.
    pub role: Role,
}

impl Identity {
    /// Whether this identity is usable for access-control decisions.
    ///
    /// A nil id or an empty/whitespace name marks a corrupt or default
    /// value; the guard treats such an identity as absent.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.id.is_nil() && !self.name.trim().is_empty()
    }
}

// =============================================================================
// ACTOR
// =============================================================================

/// The application's belief about who is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Actor {
    /// Nobody is signed in.
    Absent,
    /// A user is signed in.
    Present(Identity),
}

impl Actor {
    /// Whether this actor carries a usable identity.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::Absent => false,
            Self::Present(identity) => identity.is_well_formed(),
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Whether the initial session resolution has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Resolution still in flight; the actor must not be trusted.
    Unresolved,
    /// Resolution settled; the actor is authoritative.
    Resolved,
}

/// Snapshot of authentication state for the running process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Who is signed in, if anyone.
    pub actor: Actor,
    /// Whether `actor` can be trusted yet.
    pub status: SessionStatus,
}

impl Session {
    /// Initial state at process start: nothing known, nothing trusted.
    #[must_use]
    pub fn unresolved() -> Self {
        Self { actor: Actor::Absent, status: SessionStatus::Unresolved }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::unresolved()
    }
}

// =============================================================================
// TEST FIXTURES
// =============================================================================

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;

    /// Passenger identity with a fresh id.
    #[must_use]
    pub(crate) fn rider(name: &str) -> Identity {
        Identity { id: Uuid::new_v4(), name: name.into(), role: Role::Passenger }
    }

    /// Driver identity with a fresh id.
    #[must_use]
    pub(crate) fn driver(name: &str) -> Identity {
        Identity { id: Uuid::new_v4(), name: name.into(), role: Role::Driver }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
