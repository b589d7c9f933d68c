// revstoran_server/src/web/session.rs

//! Cookie-bound sessions.
//!
//! `Session` loads the caller's `SessionData` from the shared store before the
//! handler runs; the handler stores it back with [`Session::save`] (which also
//! sets the cookie for a brand-new session) or [`Session::persist`].
//!
//! A brand-new session that is still blank (no user, nothing in the cart) is
//! never stored and gets no cookie.

use crate::errors::AppError;
use crate::state::AppState;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, FromRequest, HttpRequest, HttpResponseBuilder};
use futures_util::future::{ready, Ready};
use revstoran::{Cart, SessionData, SessionId, SessionLease, SessionStore, UserId};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct Session {
  id: SessionId,
  pub data: SessionData,
  is_new: bool,
  store: Arc<SessionStore>,
  cookie_name: String,
  cookie_secure: bool,
}

impl Session {
  fn from_http_request(req: &HttpRequest) -> Result<Self, AppError> {
    let state = app_state(req)?;
    let cookie_name = state.config.session_cookie_name.clone();

    let existing = req
      .cookie(&cookie_name)
      .and_then(|cookie| SessionId::parse(cookie.value()))
      .and_then(|id| state.sessions.load(id).map(|data| (id, data)));

    let (id, data, is_new) = match existing {
      Some((id, data)) => (id, data, false),
      None => {
        let id = SessionId::generate();
        debug!(session_id = %id, "Starting new session.");
        (id, SessionData::new(), true)
      }
    };

    Ok(Self {
      id,
      data,
      is_new,
      store: Arc::clone(&state.sessions),
      cookie_name,
      cookie_secure: state.config.session_cookie_secure,
    })
  }

  pub fn id(&self) -> SessionId {
    self.id
  }

  pub fn require_user(&self) -> Result<UserId, AppError> {
    self.data.user_id.ok_or_else(login_required)
  }

  pub fn cart(&mut self) -> &mut Cart {
    self.data.cart()
  }

  /// Moves the session to a fresh id, keeping its data. Used on login.
  pub fn renew(&mut self) {
    if !self.is_new {
      self.store.destroy(self.id);
    }
    self.id = SessionId::generate();
    self.is_new = true;
  }

  /// Re-reads the data from the store, e.g. after waiting for a lease.
  pub fn reload(&mut self) {
    if let Some(data) = self.store.load(self.id) {
      self.data = data;
    }
  }

  pub fn lease(&self) -> Option<SessionLease> {
    self.store.lease(self.id)
  }

  fn worth_storing(&self) -> bool {
    !(self.is_new && self.data.is_blank())
  }

  /// Writes the data back to the store without touching the response.
  pub fn persist(&self) {
    if self.worth_storing() {
      self.store.store(self.id, self.data.clone());
    }
  }

  /// Writes the data back and, for a new session, attaches the cookie.
  pub fn save(self, response: &mut HttpResponseBuilder) {
    if !self.worth_storing() {
      return;
    }
    self.persist();
    if self.is_new {
      response.cookie(
        Cookie::build(self.cookie_name, self.id.to_string())
          .path("/")
          .http_only(true)
          .secure(self.cookie_secure)
          .same_site(SameSite::Lax)
          .finish(),
      );
    }
  }
}

impl FromRequest for Session {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    ready(Session::from_http_request(req))
  }
}

/// The logged-in user of the current session. Rejects anonymous requests.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
  pub user_id: UserId,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let resolved = app_state(req).and_then(|state| {
      req
        .cookie(&state.config.session_cookie_name)
        .and_then(|cookie| SessionId::parse(cookie.value()))
        .and_then(|id| state.sessions.load(id))
        .and_then(|data| data.user_id)
        .map(|user_id| AuthenticatedUser { user_id })
        .ok_or_else(|| {
          warn!(path = %req.path(), "AuthenticatedUser extractor: no logged-in session.");
          login_required()
        })
    });
    ready(resolved)
  }
}

fn app_state(req: &HttpRequest) -> Result<&web::Data<AppState>, AppError> {
  req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))
}

fn login_required() -> AppError {
  AppError::Auth("You must be logged in to continue.".to_string())
}
