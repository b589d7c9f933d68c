// revstoran_server/src/models/order_item.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
  pub id: i64,
  pub order_id: i64,
  pub menu_item_id: i64,
  pub quantity: i32,
  pub price: Decimal, // Unit price captured when the item was added to the cart
}
