// revstoran/src/orders/memory.rs

//! In-memory `OrderStore`. Writes are staged per transaction and only become
//! visible on commit, so it behaves like a transactional database for tests.
//! Failures can be injected per menu item to exercise rollback paths.

use crate::ids::{MenuItemId, OrderId, RestaurantId, UserId};
use crate::orders::{NewOrder, NewOrderItem, OrderStatus, OrderStore, OrderTransaction};
use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use tracing::{event, Level};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredOrder {
  pub id: OrderId,
  pub customer_id: UserId,
  pub restaurant_id: RestaurantId,
  pub total_price: Decimal,
  pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredOrderItem {
  pub order_id: OrderId,
  pub menu_item_id: MenuItemId,
  pub quantity: u32,
  pub price: Decimal,
}

#[derive(Debug, Default)]
struct Tables {
  orders: Vec<StoredOrder>,
  items: Vec<StoredOrderItem>,
}

#[derive(Debug, Default)]
struct Shared {
  tables: Mutex<Tables>,
  // Like a database sequence: ids handed out by rolled-back work are not reused.
  next_order_id: AtomicI64,
  failing_items: Mutex<HashSet<MenuItemId>>,
  fail_commits: AtomicBool,
  commits: AtomicI64,
  rollbacks: AtomicI64,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
  shared: Arc<Shared>,
}

impl InMemoryOrderStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Makes every `insert_order_item` for `menu_item_id` fail.
  pub fn fail_items_for(&self, menu_item_id: MenuItemId) {
    self.shared.failing_items.lock().insert(menu_item_id);
  }

  /// Makes every commit fail (the transaction is then discarded).
  pub fn fail_commits(&self, fail: bool) {
    self.shared.fail_commits.store(fail, Ordering::SeqCst);
  }

  pub fn orders(&self) -> Vec<StoredOrder> {
    self.shared.tables.lock().orders.clone()
  }

  pub fn items(&self) -> Vec<StoredOrderItem> {
    self.shared.tables.lock().items.clone()
  }

  pub fn items_for(&self, order_id: OrderId) -> Vec<StoredOrderItem> {
    self
      .shared
      .tables
      .lock()
      .items
      .iter()
      .filter(|item| item.order_id == order_id)
      .cloned()
      .collect()
  }

  pub fn commit_count(&self) -> i64 {
    self.shared.commits.load(Ordering::SeqCst)
  }

  pub fn rollback_count(&self) -> i64 {
    self.shared.rollbacks.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
  type Tx = InMemoryTransaction;

  async fn begin(&self) -> anyhow::Result<InMemoryTransaction> {
    Ok(InMemoryTransaction {
      shared: Arc::clone(&self.shared),
      staged: Tables::default(),
    })
  }
}

#[derive(Debug)]
pub struct InMemoryTransaction {
  shared: Arc<Shared>,
  staged: Tables,
}

#[async_trait]
impl OrderTransaction for InMemoryTransaction {
  async fn insert_order(&mut self, order: &NewOrder) -> anyhow::Result<OrderId> {
    let id = OrderId::new(self.shared.next_order_id.fetch_add(1, Ordering::SeqCst) + 1);
    self.staged.orders.push(StoredOrder {
      id,
      customer_id: order.customer_id,
      restaurant_id: order.restaurant_id,
      total_price: order.total_price,
      status: order.status,
    });
    Ok(id)
  }

  async fn insert_order_item(&mut self, item: &NewOrderItem) -> anyhow::Result<()> {
    if self.shared.failing_items.lock().contains(&item.menu_item_id) {
      return Err(anyhow!("injected failure inserting order item for menu item {}", item.menu_item_id));
    }
    if !self.staged.orders.iter().any(|o| o.id == item.order_id) {
      return Err(anyhow!("order {} is not part of this transaction", item.order_id));
    }
    self.staged.items.push(StoredOrderItem {
      order_id: item.order_id,
      menu_item_id: item.menu_item_id,
      quantity: item.quantity,
      price: item.price,
    });
    Ok(())
  }

  async fn commit(self) -> anyhow::Result<()> {
    if self.shared.fail_commits.load(Ordering::SeqCst) {
      self.shared.rollbacks.fetch_add(1, Ordering::SeqCst);
      return Err(anyhow!("injected commit failure"));
    }
    let InMemoryTransaction { shared, staged } = self;
    {
      let mut tables = shared.tables.lock();
      tables.orders.extend(staged.orders);
      tables.items.extend(staged.items);
    }
    shared.commits.fetch_add(1, Ordering::SeqCst);
    event!(Level::TRACE, "In-memory transaction committed.");
    Ok(())
  }

  async fn rollback(self) -> anyhow::Result<()> {
    self.shared.rollbacks.fetch_add(1, Ordering::SeqCst);
    event!(Level::TRACE, staged_orders = self.staged.orders.len(), "In-memory transaction rolled back.");
    Ok(())
  }
}
