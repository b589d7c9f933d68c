// revstoran_server/src/services/order_store.rs

//! `OrderStore` over PostgreSQL. Each `OrderTransaction` wraps one sqlx
//! transaction; dropping it without commit rolls the writes back.

use anyhow::Context;
use async_trait::async_trait;
use revstoran::{NewOrder, NewOrderItem, OrderId, OrderStore, OrderTransaction};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{event, instrument, Level};

#[derive(Debug, Clone)]
pub struct PgOrderStore {
  pool: PgPool,
}

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl OrderStore for PgOrderStore {
  type Tx = PgOrderTransaction;

  async fn begin(&self) -> anyhow::Result<PgOrderTransaction> {
    let tx = self.pool.begin().await.context("failed to begin order transaction")?;
    Ok(PgOrderTransaction { tx })
  }
}

pub struct PgOrderTransaction {
  tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderTransaction for PgOrderTransaction {
  #[instrument(name = "PgOrderTransaction::insert_order", skip_all, fields(restaurant_id = %order.restaurant_id), err(Display))]
  async fn insert_order(&mut self, order: &NewOrder) -> anyhow::Result<OrderId> {
    let id: i64 = sqlx::query_scalar(
      "INSERT INTO orders (customer_id, restaurant_id, total_price, status) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(order.customer_id.get())
    .bind(order.restaurant_id.get())
    .bind(order.total_price)
    .bind(order.status.as_str())
    .fetch_one(&mut *self.tx)
    .await
    .context("failed to insert order")?;
    Ok(OrderId::new(id))
  }

  async fn insert_order_item(&mut self, item: &NewOrderItem) -> anyhow::Result<()> {
    let quantity = i32::try_from(item.quantity).context("order item quantity out of range")?;
    sqlx::query("INSERT INTO order_items (order_id, menu_item_id, quantity, price) VALUES ($1, $2, $3, $4)")
      .bind(item.order_id.get())
      .bind(item.menu_item_id.get())
      .bind(quantity)
      .bind(item.price)
      .execute(&mut *self.tx)
      .await
      .with_context(|| format!("failed to insert item {} for order {}", item.menu_item_id, item.order_id))?;
    Ok(())
  }

  async fn commit(self) -> anyhow::Result<()> {
    self.tx.commit().await.context("failed to commit order transaction")?;
    event!(Level::DEBUG, "Order transaction committed.");
    Ok(())
  }

  async fn rollback(self) -> anyhow::Result<()> {
    self.tx.rollback().await.context("failed to roll back order transaction")?;
    Ok(())
  }
}
