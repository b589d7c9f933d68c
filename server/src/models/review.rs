// revstoran_server/src/models/review.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A customer review, stored in the `comments` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
  pub id: i64,
  pub user_id: i64,
  pub username: String, // Joined from users
  pub restaurant_id: i64,
  pub content: String,
  pub rating: i16,
  pub created_at: DateTime<Utc>,
}
