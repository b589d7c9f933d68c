// revstoran_server/src/models/restaurant.rs

use chrono::{DateTime, Utc};
use revstoran::UserId;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Restaurant {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub city: String,
  pub state: String,
  pub image_path: Option<String>,
  pub owner_id: i64,
  pub created_at: DateTime<Utc>,
}

impl Restaurant {
  pub fn is_owned_by(&self, user_id: UserId) -> bool {
    self.owner_id == user_id.get()
  }
}
