// revstoran/src/orders/mod.rs

//! Persisted order records and the storage collaborator that writes them.
//!
//! Orders are only ever written inside an [`OrderTransaction`]; an order row
//! without its items must never become visible.

pub mod materializer;
pub mod memory;

use crate::ids::{MenuItemId, OrderId, RestaurantId, UserId};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an order. Checkout only ever creates `Pending` orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
  pub customer_id: UserId,
  pub restaurant_id: RestaurantId,
  pub total_price: Decimal,
  pub status: OrderStatus,
}

/// Quantity and price are copied verbatim from the cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
  pub order_id: OrderId,
  pub menu_item_id: MenuItemId,
  pub quantity: u32,
  pub price: Decimal,
}

/// Storage collaborator for orders. Each call to `begin` opens one atomic unit
/// of work.
#[async_trait]
pub trait OrderStore: Send + Sync {
  type Tx: OrderTransaction;

  async fn begin(&self) -> anyhow::Result<Self::Tx>;
}

/// An open write transaction. Dropping it without `commit` must discard every
/// write made through it.
#[async_trait]
pub trait OrderTransaction: Send {
  async fn insert_order(&mut self, order: &NewOrder) -> anyhow::Result<OrderId>;

  async fn insert_order_item(&mut self, item: &NewOrderItem) -> anyhow::Result<()>;

  async fn commit(self) -> anyhow::Result<()>;

  async fn rollback(self) -> anyhow::Result<()>;
}
