//! Route guard — pure decision over a session snapshot.
//!
//! DESIGN
//! ======
//! `decide` is total and referentially transparent: same snapshot in,
//! same decision out, no I/O. Every failure mode upstream (missing
//! credential, malformed identity, resolution timeout) has already been
//! folded into the snapshot, so the decision space stays three-valued.

use crate::session::{Session, SessionStatus};

/// Outcome of evaluating a session snapshot for a protected screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Resolution still in flight; render nothing yet.
    Pending,
    /// Nobody usable is signed in; redirect to the login entry point.
    DenyRedirect,
    /// A well-formed actor is signed in; render the protected screen.
    Allow,
}

/// Decide what a protected screen may do under the given session.
///
/// An unresolved session is always `Pending`, even if a stale actor is
/// present: untrusted data must never leak into an `Allow`. A present but
/// malformed identity counts as absent.
#[must_use]
pub fn decide(session: &Session) -> GuardDecision {
    match session.status {
        SessionStatus::Unresolved => GuardDecision::Pending,
        SessionStatus::Resolved => {
            if session.actor.is_present() {
                GuardDecision::Allow
            } else {
                GuardDecision::DenyRedirect
            }
        }
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
