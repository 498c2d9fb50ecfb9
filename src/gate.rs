//! Guard wrapper — applies the route guard uniformly to screens.
//!
//! DESIGN
//! ======
//! A screen is any `Fn(Props) -> View`. Wrapping one yields a
//! [`GuardedScreen`] that consults the live store snapshot on every
//! render: pending renders nothing (no flash of protected content or of
//! the login redirect), deny issues one `replace` on the injected
//! navigator, allow calls through with the props untouched. The wrapper
//! holds no state of its own, so the same gate wraps any number of
//! screens without per-screen customization.

use std::sync::Arc;

use crate::guard::{GuardDecision, decide};
use crate::store::SessionStore;

/// Navigation capability used on a deny decision.
///
/// `replace` swaps the current screen for `destination` without pushing
/// history, so the blocked screen cannot be reached with a back gesture.
pub trait Navigator {
    /// Replace the current screen with `destination`.
    fn replace(&self, destination: &str);
}

/// What a gated render produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome<V> {
    /// Session still resolving; the caller shows a neutral placeholder.
    Blank,
    /// Not signed in; a redirect was issued and nothing renders.
    Redirected,
    /// Signed in; the wrapped screen's output.
    Rendered(V),
}

impl<V> GateOutcome<V> {
    /// The rendered view, if the guard allowed one.
    pub fn rendered(self) -> Option<V> {
        match self {
            Self::Rendered(view) => Some(view),
            Self::Blank | Self::Redirected => None,
        }
    }
}

/// Factory that applies one guard policy to many screens.
pub struct Gate {
    store: Arc<SessionStore>,
    login_destination: String,
}

impl Gate {
    /// Gate screens against `store`, redirecting denials to
    /// `login_destination`.
    #[must_use]
    pub fn new(store: Arc<SessionStore>, login_destination: impl Into<String>) -> Self {
        Self { store, login_destination: login_destination.into() }
    }

    /// Wrap a screen-rendering function without touching its props
    /// contract.
    pub fn wrap<F>(&self, screen: F) -> GuardedScreen<F> {
        GuardedScreen {
            store: Arc::clone(&self.store),
            login_destination: self.login_destination.clone(),
            screen,
        }
    }
}

/// A screen with the route guard applied.
pub struct GuardedScreen<F> {
    store: Arc<SessionStore>,
    login_destination: String,
    screen: F,
}

impl<F> GuardedScreen<F> {
    /// Evaluate the guard against the current snapshot and render
    /// accordingly. Never fails; every internal failure upstream has
    /// already collapsed into a deny or pending decision.
    pub fn render<P, V>(&self, navigator: &dyn Navigator, props: P) -> GateOutcome<V>
    where
        F: Fn(P) -> V,
    {
        match decide(&self.store.snapshot()) {
            GuardDecision::Pending => GateOutcome::Blank,
            GuardDecision::DenyRedirect => {
                tracing::debug!(destination = %self.login_destination, "gated screen redirecting");
                navigator.replace(&self.login_destination);
                GateOutcome::Redirected
            }
            GuardDecision::Allow => GateOutcome::Rendered((self.screen)(props)),
        }
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
