// revstoran/src/ids.rs

//! Typed identifiers. Every persisted entity uses its native integer key, so a
//! restaurant id can never be confused with a menu item id at a call site.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! integer_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(i64);

    impl $name {
      pub const fn new(raw: i64) -> Self {
        Self(raw)
      }

      pub const fn get(self) -> i64 {
        self.0
      }
    }

    impl From<i64> for $name {
      fn from(raw: i64) -> Self {
        Self(raw)
      }
    }

    impl From<$name> for i64 {
      fn from(id: $name) -> i64 {
        id.0
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
      }
    }
  };
}

integer_id!(
  /// Registered user; doubles as the customer id on orders.
  UserId
);
integer_id!(RestaurantId);
integer_id!(MenuItemId);
integer_id!(OrderId);

/// Opaque handle for a browser session. Random, so it can travel in a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
  pub fn generate() -> Self {
    Self(Uuid::new_v4())
  }

  pub fn parse(raw: &str) -> Option<Self> {
    Uuid::parse_str(raw.trim()).ok().map(Self)
  }
}

impl fmt::Display for SessionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
