// tests/session_tests.rs
mod common;

use common::*;
use revstoran::{add_item, SessionData, SessionId, SessionStore};
use serial_test::serial;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

#[tokio::test]
#[serial]
async fn test_cart_is_lazily_initialized_and_persists_across_requests() {
  setup_tracing();
  let catalog = fixture_catalog();
  let store = SessionStore::new();
  let id = SessionId::generate();

  // First request: nothing stored yet.
  let mut session = store.load_or_default(id);
  assert!(session.cart_if_initialized().is_none());
  add_item(session.cart(), &catalog, MARGHERITA).await.unwrap();
  store.store(id, session);

  // Second request sees the same cart.
  let mut session = store.load(id).expect("session should be stored");
  assert_eq!(session.cart_if_initialized().unwrap().line_count(), 1);
  add_item(session.cart(), &catalog, MARGHERITA).await.unwrap();
  store.store(id, session);

  let session = store.load(id).unwrap();
  assert_eq!(session.cart_if_initialized().unwrap().line(MARGHERITA).unwrap().quantity, 2);
}

#[test]
fn test_repeated_initialization_keeps_existing_cart() {
  let mut session = SessionData::new();
  session.cart();
  assert!(session.cart_if_initialized().unwrap().is_empty());

  let before = session.clone();
  session.cart();
  assert_eq!(session, before);
}

#[tokio::test]
#[serial]
async fn test_destroy_discards_cart_and_identity() {
  setup_tracing();
  let catalog = fixture_catalog();
  let store = SessionStore::new();
  let id = SessionId::generate();

  let mut session = SessionData::new();
  session.user_id = Some(CUSTOMER);
  add_item(session.cart(), &catalog, RAMEN).await.unwrap();
  store.store(id, session);
  assert!(store.load(id).unwrap().is_authenticated());

  assert!(store.destroy(id));
  assert!(store.load(id).is_none());
  assert!(!store.destroy(id));

  let fresh = store.load_or_default(id);
  assert!(!fresh.is_authenticated());
  assert!(fresh.cart_if_initialized().is_none());
}

#[test]
fn test_sessions_are_isolated() {
  let store = SessionStore::new();
  let (a, b) = (SessionId::generate(), SessionId::generate());
  assert_ne!(a, b);

  let mut session = SessionData::new();
  session.user_id = Some(CUSTOMER);
  store.store(a, session);

  assert!(store.load(a).unwrap().is_authenticated());
  assert!(store.load(b).is_none());
  assert_eq!(store.len(), 1);
}

#[test]
fn test_session_id_parsing() {
  let id = SessionId::generate();
  assert_eq!(SessionId::parse(&id.to_string()), Some(id));
  assert_eq!(SessionId::parse("not-a-session"), None);
  assert_eq!(SessionId::parse(""), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn test_concurrent_sessions_do_not_interfere() {
  setup_tracing();
  let store = Arc::new(SessionStore::new());
  let catalog = Arc::new(fixture_catalog());

  let mut handles = Vec::new();
  for n in 0..16u32 {
    let store = Arc::clone(&store);
    let catalog = Arc::clone(&catalog);
    handles.push(tokio::spawn(async move {
      let id = SessionId::generate();
      let mut session = store.load_or_default(id);
      for _ in 0..=n {
        add_item(session.cart(), catalog.as_ref(), GYOZA).await.unwrap();
      }
      store.store(id, session);
      (id, n + 1)
    }));
  }

  for handle in handles {
    let (id, expected) = handle.await.unwrap();
    let session = store.load(id).unwrap();
    assert_eq!(session.cart_if_initialized().unwrap().line(GYOZA).unwrap().quantity, expected);
  }
  assert_eq!(store.len(), 16);
}

#[test]
fn test_idle_sessions_are_evicted() {
  let store = SessionStore::with_idle_timeout(Duration::from_millis(200));
  let (idle, active) = (SessionId::generate(), SessionId::generate());
  store.store(idle, SessionData::new());
  store.store(active, SessionData::new());

  sleep(Duration::from_millis(120));
  assert!(store.load(active).is_some(), "a load counts as activity");
  sleep(Duration::from_millis(120));

  assert_eq!(store.evict_idle(), 1);
  assert!(store.load(idle).is_none());
  assert!(store.load(active).is_some());
  assert_eq!(store.len(), 1);
}

#[test]
fn test_expired_session_is_not_loaded() {
  let store = SessionStore::with_idle_timeout(Duration::from_millis(10));
  let id = SessionId::generate();
  let mut session = SessionData::new();
  session.user_id = Some(CUSTOMER);
  store.store(id, session);

  sleep(Duration::from_millis(25));
  assert!(store.load(id).is_none());
  assert!(store.is_empty(), "expired entry is dropped on load");
}

#[test]
fn test_default_store_keeps_recent_sessions() {
  let store = SessionStore::new();
  assert_eq!(store.idle_timeout(), revstoran::DEFAULT_IDLE_TIMEOUT);
  store.store(SessionId::generate(), SessionData::new());
  assert_eq!(store.evict_idle(), 0);
  assert_eq!(store.len(), 1);
}

#[tokio::test]
#[serial]
async fn test_blank_session_detection() {
  setup_tracing();
  let catalog = fixture_catalog();

  let mut session = SessionData::new();
  assert!(session.is_blank());
  session.cart();
  assert!(session.is_blank(), "an initialized but empty cart is still blank");

  add_item(session.cart(), &catalog, RAMEN).await.unwrap();
  assert!(!session.is_blank());

  let mut logged_in = SessionData::new();
  logged_in.user_id = Some(CUSTOMER);
  assert!(!logged_in.is_blank());
}

#[test]
fn test_lease_is_exclusive_per_session() {
  let store = Arc::new(SessionStore::new());
  let (a, b) = (SessionId::generate(), SessionId::generate());

  let lease = store.lease(a).expect("first lease is granted");
  assert_eq!(lease.session_id(), a);
  assert!(store.lease(a).is_none());
  assert!(store.lease(b).is_some(), "other sessions are unaffected");

  drop(lease);
  assert!(store.lease(a).is_some());
}
