// revstoran/src/session.rs

//! Process-local session storage.
//!
//! Request handlers load a `SessionData` snapshot before an action and store it
//! back afterwards. The store only guarantees that each load/store is atomic;
//! an action that must not overlap with another one on the same session (such
//! as checkout) takes a [`SessionLease`] first.
//!
//! Sessions end when they are destroyed or once they sit idle for longer than
//! the store's idle timeout.

use crate::cart::store::Cart;
use crate::ids::{SessionId, UserId};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, event, Level};

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Everything a session carries: who is logged in, and their cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
  pub user_id: Option<UserId>,
  cart: Option<Cart>,
}

impl SessionData {
  pub fn new() -> Self {
    Self::default()
  }

  /// The session's cart, created empty on first access. Safe to call before
  /// every operation.
  pub fn cart(&mut self) -> &mut Cart {
    self.cart.get_or_insert_with(Cart::new)
  }

  /// Read-only view; `None` until something initialized the cart.
  pub fn cart_if_initialized(&self) -> Option<&Cart> {
    self.cart.as_ref()
  }

  pub fn is_authenticated(&self) -> bool {
    self.user_id.is_some()
  }

  /// Nobody logged in and nothing in the cart.
  pub fn is_blank(&self) -> bool {
    self.user_id.is_none() && self.cart.as_ref().map_or(true, Cart::is_empty)
  }
}

#[derive(Debug)]
struct StoredSession {
  data: SessionData,
  last_access: Instant,
}

impl StoredSession {
  fn is_idle(&self, now: Instant, idle_timeout: Duration) -> bool {
    now.saturating_duration_since(self.last_access) > idle_timeout
  }
}

/// Sessions keyed by id.
///
/// IMPORTANT: lock guards are blocking and are never handed out; callers get
/// owned snapshots, so nothing is held across `.await` points.
#[derive(Debug)]
pub struct SessionStore {
  sessions: RwLock<HashMap<SessionId, StoredSession>>,
  leased: Mutex<HashSet<SessionId>>,
  idle_timeout: Duration,
}

impl Default for SessionStore {
  fn default() -> Self {
    Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
  }
}

impl SessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
    Self {
      sessions: RwLock::new(HashMap::new()),
      leased: Mutex::new(HashSet::new()),
      idle_timeout,
    }
  }

  pub fn idle_timeout(&self) -> Duration {
    self.idle_timeout
  }

  /// Snapshot of the session, or `None` for an unknown or expired id. A hit
  /// counts as activity.
  pub fn load(&self, id: SessionId) -> Option<SessionData> {
    let now = Instant::now();
    let mut sessions = self.sessions.write();
    match sessions.get_mut(&id) {
      Some(stored) if stored.is_idle(now, self.idle_timeout) => {
        sessions.remove(&id);
        debug!(session_id = %id, "Session expired.");
        None
      }
      Some(stored) => {
        stored.last_access = now;
        Some(stored.data.clone())
      }
      None => None,
    }
  }

  /// Loads the session or starts a fresh one. The fresh one is not stored
  /// until `store` is called.
  pub fn load_or_default(&self, id: SessionId) -> SessionData {
    self.load(id).unwrap_or_default()
  }

  pub fn store(&self, id: SessionId, data: SessionData) {
    let stored = StoredSession {
      data,
      last_access: Instant::now(),
    };
    self.sessions.write().insert(id, stored);
    event!(Level::TRACE, session_id = %id, "Session stored.");
  }

  /// Ends the session, dropping its cart.
  pub fn destroy(&self, id: SessionId) -> bool {
    self.sessions.write().remove(&id).is_some()
  }

  /// Drops every session idle for longer than the timeout. Returns how many
  /// were dropped.
  pub fn evict_idle(&self) -> usize {
    let now = Instant::now();
    let mut sessions = self.sessions.write();
    let before = sessions.len();
    sessions.retain(|_, stored| !stored.is_idle(now, self.idle_timeout));
    let evicted = before - sessions.len();
    if evicted > 0 {
      debug!(evicted, remaining = sessions.len(), "Evicted idle sessions.");
    }
    evicted
  }

  /// Exclusive right to run a multi-step action on the session. `None` while
  /// another lease for the same id is alive.
  pub fn lease(self: &Arc<Self>, id: SessionId) -> Option<SessionLease> {
    if !self.leased.lock().insert(id) {
      debug!(session_id = %id, "Session lease refused: already held.");
      return None;
    }
    Some(SessionLease {
      store: Arc::clone(self),
      id,
    })
  }

  pub fn len(&self) -> usize {
    self.sessions.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.sessions.read().is_empty()
  }
}

/// Held while an exclusive action runs; released on drop.
#[derive(Debug)]
pub struct SessionLease {
  store: Arc<SessionStore>,
  id: SessionId,
}

impl SessionLease {
  pub fn session_id(&self) -> SessionId {
    self.id
  }
}

impl Drop for SessionLease {
  fn drop(&mut self) {
    self.store.leased.lock().remove(&self.id);
  }
}
