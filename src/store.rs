//! Session store — single source of truth for `{actor, status}`.
//!
//! DESIGN
//! ======
//! One writer role (the provider plus login/logout funnelled through it),
//! many readers (guard evaluations across screens). Mutation and snapshot
//! both go through a mutex, and snapshots are cloned out under the lock so
//! readers never observe a torn pair.
//!
//! Subscribers are invoked synchronously, in registration order, before
//! the mutating call returns. A mutation issued from inside a callback is
//! queued and applied after the current notification pass completes, so
//! callbacks never observe a half-applied commit. Registering or removing
//! subscribers from inside a callback is unsupported.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::session::{Actor, Session, SessionStatus};

/// Handle returned by [`SessionStore::subscribe`]; pass to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&Session) + Send>;

#[derive(Debug)]
enum Mutation {
    SetActor(Actor),
    Reset,
}

struct StoreState {
    session: Session,
    /// Mutations issued from inside a subscriber callback, applied after
    /// the triggering commit's notification pass.
    deferred: VecDeque<Mutation>,
    notifying: bool,
}

/// Shared session state with ordered synchronous change notification.
pub struct SessionStore {
    state: Mutex<StoreState>,
    subscribers: Mutex<Vec<(SubscriptionId, Callback)>>,
    next_subscription: AtomicU64,
}

impl SessionStore {
    /// Create a store in the initial `Unresolved` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                session: Session::unresolved(),
                deferred: VecDeque::new(),
                notifying: false,
            }),
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        }
    }

    /// Current `{actor, status}` snapshot. No side effects, never fails.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.lock_state().session.clone()
    }

    /// Set the actor and force `status` to `Resolved`.
    ///
    /// Subscribers see the committed snapshot before this call returns.
    pub fn set_actor(&self, actor: Actor) {
        self.commit(Mutation::SetActor(actor));
    }

    /// Clear the actor on logout. `status` stays `Resolved`; a resolved
    /// session never reverts to `Unresolved` within a mount.
    pub fn reset(&self) {
        self.commit(Mutation::Reset);
    }

    /// Register a change callback, invoked on every committed mutation in
    /// registration order.
    pub fn subscribe(&self, callback: impl FnMut(&Session) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.lock_subscribers().push((id, Box::new(callback)));
        id
    }

    /// Remove a previously registered callback. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.lock_subscribers().retain(|(sub_id, _)| *sub_id != id);
    }

    fn commit(&self, mutation: Mutation) {
        let mut state = self.lock_state();
        if state.notifying {
            // Reentrant mutation from a callback: defer until the current
            // notification pass completes.
            state.deferred.push_back(mutation);
            return;
        }
        state.notifying = true;

        let mut next = mutation;
        loop {
            apply(&mut state.session, next);
            let snapshot = state.session.clone();
            drop(state);

            self.notify(&snapshot);

            state = self.lock_state();
            match state.deferred.pop_front() {
                Some(deferred) => next = deferred,
                None => {
                    state.notifying = false;
                    return;
                }
            }
        }
    }

    fn notify(&self, snapshot: &Session) {
        let mut subscribers = self.lock_subscribers();
        for (_, callback) in subscribers.iter_mut() {
            callback(snapshot);
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, StoreState> {
        // Mutex poisoning only happens if a subscriber panicked; the
        // session value itself is always a complete committed pair, so
        // continuing with it is sound.
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_subscribers(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, Callback)>> {
        self.subscribers.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(session: &mut Session, mutation: Mutation) {
    match mutation {
        Mutation::SetActor(actor) => {
            tracing::debug!(present = actor.is_present(), "session actor committed");
            session.actor = actor;
            session.status = SessionStatus::Resolved;
        }
        Mutation::Reset => {
            tracing::debug!("session reset");
            session.actor = Actor::Absent;
            session.status = SessionStatus::Resolved;
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
