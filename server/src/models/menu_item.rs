// revstoran_server/src/models/menu_item.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MenuItem {
  pub id: i64,
  pub restaurant_id: i64,
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub image_path: Option<String>,
}
