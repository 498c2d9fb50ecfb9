use std::sync::Arc;
use std::sync::Mutex;

use super::*;
use crate::session::test_fixtures::{driver, rider};

fn present(name: &str) -> Actor {
    Actor::Present(rider(name))
}

// =============================================================================
// snapshot
// =============================================================================

#[test]
fn new_store_is_unresolved() {
    let store = SessionStore::new();
    let session = store.snapshot();
    assert_eq!(session.status, SessionStatus::Unresolved);
    assert_eq!(session.actor, Actor::Absent);
}

#[test]
fn snapshot_is_idempotent_between_mutations() {
    let store = SessionStore::new();
    store.set_actor(present("alice"));
    assert_eq!(store.snapshot(), store.snapshot());
}

// =============================================================================
// set_actor / reset
// =============================================================================

#[test]
fn set_actor_resolves_session() {
    let store = SessionStore::new();
    store.set_actor(present("alice"));
    let session = store.snapshot();
    assert_eq!(session.status, SessionStatus::Resolved);
    assert!(session.actor.is_present());
}

#[test]
fn set_actor_absent_resolves_without_actor() {
    let store = SessionStore::new();
    store.set_actor(Actor::Absent);
    let session = store.snapshot();
    assert_eq!(session.status, SessionStatus::Resolved);
    assert_eq!(session.actor, Actor::Absent);
}

#[test]
fn reset_clears_actor_but_stays_resolved() {
    let store = SessionStore::new();
    store.set_actor(Actor::Present(driver("bob")));
    store.reset();
    let session = store.snapshot();
    assert_eq!(session.status, SessionStatus::Resolved);
    assert_eq!(session.actor, Actor::Absent);
}

#[test]
fn status_never_reverts_to_unresolved() {
    let store = SessionStore::new();
    store.set_actor(Actor::Absent);
    store.reset();
    store.set_actor(present("carol"));
    store.reset();
    assert_eq!(store.snapshot().status, SessionStatus::Resolved);
}

// =============================================================================
// subscription
// =============================================================================

#[test]
fn subscriber_sees_committed_snapshot_before_call_returns() {
    let store = SessionStore::new();
    let seen: Arc<Mutex<Vec<Session>>> = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    store.subscribe(move |session| sink.lock().unwrap().push(session.clone()));

    store.set_actor(present("alice"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].status, SessionStatus::Resolved);
    assert!(seen[0].actor.is_present());
}

#[test]
fn subscribers_run_in_registration_order() {
    let store = SessionStore::new();
    let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

    let first = Arc::clone(&order);
    store.subscribe(move |_| first.lock().unwrap().push("first"));
    let second = Arc::clone(&order);
    store.subscribe(move |_| second.lock().unwrap().push("second"));

    store.set_actor(Actor::Absent);

    assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn unsubscribe_stops_delivery() {
    let store = SessionStore::new();
    let count = Arc::new(Mutex::new(0u32));

    let sink = Arc::clone(&count);
    let id = store.subscribe(move |_| *sink.lock().unwrap() += 1);

    store.set_actor(Actor::Absent);
    store.unsubscribe(id);
    store.set_actor(present("alice"));

    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn unsubscribe_unknown_id_is_ignored() {
    let store = SessionStore::new();
    let id = store.subscribe(|_| {});
    store.unsubscribe(id);
    store.unsubscribe(id);
}

#[test]
fn every_commit_notifies() {
    let store = SessionStore::new();
    let count = Arc::new(Mutex::new(0u32));

    let sink = Arc::clone(&count);
    store.subscribe(move |_| *sink.lock().unwrap() += 1);

    store.set_actor(Actor::Absent);
    store.set_actor(present("alice"));
    store.reset();

    assert_eq!(*count.lock().unwrap(), 3);
}

// =============================================================================
// reentrant mutation
// =============================================================================

#[test]
fn mutation_from_callback_is_deferred_not_reentrant() {
    let store = Arc::new(SessionStore::new());
    let seen: Arc<Mutex<Vec<Session>>> = Arc::new(Mutex::new(Vec::new()));

    // On the first notification, log out from inside the callback. The
    // reset must land as a second, separate commit.
    let inner = Arc::clone(&store);
    let sink = Arc::clone(&seen);
    let mut fired = false;
    store.subscribe(move |session| {
        sink.lock().unwrap().push(session.clone());
        if !fired {
            fired = true;
            inner.reset();
        }
    });

    store.set_actor(present("alice"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].actor.is_present());
    assert_eq!(seen[1].actor, Actor::Absent);
    // Both commits settled before set_actor returned.
    assert_eq!(store.snapshot().actor, Actor::Absent);
}

#[test]
fn snapshot_from_callback_sees_committed_value() {
    let store = Arc::new(SessionStore::new());
    let observed: Arc<Mutex<Option<Session>>> = Arc::new(Mutex::new(None));

    let inner = Arc::clone(&store);
    let sink = Arc::clone(&observed);
    store.subscribe(move |_| {
        *sink.lock().unwrap() = Some(inner.snapshot());
    });

    store.set_actor(present("alice"));

    let observed = observed.lock().unwrap();
    let session = observed.as_ref().expect("callback ran");
    assert_eq!(session.status, SessionStatus::Resolved);
    assert!(session.actor.is_present());
}
