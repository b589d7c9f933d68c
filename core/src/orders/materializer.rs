// revstoran/src/orders/materializer.rs

//! Turns a cart into persisted orders: one `pending` order per restaurant
//! group, each with one item row per cart line, then empties the cart.
//!
//! Atomicity follows the configured [`TransactionScope`]:
//!  - `PerRestaurant`: each group (order + all its items) is one transaction.
//!    If group *k* fails, groups before it stay committed and leave the cart,
//!    while group *k* and later groups stay in the cart for a retry.
//!  - `WholeCart`: all groups share one transaction; any failure leaves no
//!    orders and the cart untouched.

use crate::cart::line::CartLine;
use crate::cart::ops;
use crate::cart::store::Cart;
use crate::error::{RevstoranError, RevstoranResult};
use crate::ids::{OrderId, RestaurantId, UserId};
use crate::orders::{NewOrder, NewOrderItem, OrderStatus, OrderStore, OrderTransaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{error, event, info, instrument, warn, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionScope {
  #[default]
  PerRestaurant,
  WholeCart,
}

impl FromStr for TransactionScope {
  type Err = String;

  fn from_str(raw: &str) -> Result<Self, Self::Err> {
    match raw.trim().to_ascii_lowercase().as_str() {
      "per-restaurant" | "per_restaurant" => Ok(TransactionScope::PerRestaurant),
      "whole-cart" | "whole_cart" => Ok(TransactionScope::WholeCart),
      other => Err(format!(
        "unknown transaction scope '{}' (expected 'per-restaurant' or 'whole-cart')",
        other
      )),
    }
  }
}

/// Which user action triggered materialization. Both behave identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutEntry {
  Checkout,
  Payment,
}

impl fmt::Display for CheckoutEntry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CheckoutEntry::Checkout => f.write_str("checkout"),
      CheckoutEntry::Payment => f.write_str("payment"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedOrder {
  pub order_id: OrderId,
  pub restaurant_id: RestaurantId,
  pub total_price: Decimal,
  pub item_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutReceipt {
  pub customer_id: UserId,
  pub orders: Vec<PlacedOrder>,
  pub grand_total: Decimal,
}

/// A restaurant group copied out of the cart, ready to be written.
struct GroupDraft {
  restaurant_id: RestaurantId,
  lines: Vec<CartLine>,
  total_price: Decimal,
}

impl GroupDraft {
  fn from_cart(cart: &Cart) -> Vec<GroupDraft> {
    cart
      .groups()
      .map(|(restaurant_id, lines)| GroupDraft {
        restaurant_id,
        lines: lines.to_vec(),
        total_price: lines.iter().map(CartLine::subtotal).sum(),
      })
      .collect()
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OrderMaterializer {
  scope: TransactionScope,
}

impl OrderMaterializer {
  pub fn new(scope: TransactionScope) -> Self {
    Self { scope }
  }

  pub fn scope(&self) -> TransactionScope {
    self.scope
  }

  /// Materializes `cart` for `customer_id`.
  ///
  /// Returns `EmptyCart` without touching storage when the cart has no groups.
  /// On success the cart is cleared.
  #[instrument(
    name = "OrderMaterializer::checkout",
    skip_all,
    fields(customer_id = %customer_id, entry = %entry, scope = ?self.scope, groups = cart.group_count()),
    err(Display)
  )]
  pub async fn checkout<S>(
    &self,
    cart: &mut Cart,
    store: &S,
    customer_id: UserId,
    entry: CheckoutEntry,
  ) -> RevstoranResult<CheckoutReceipt>
  where
    S: OrderStore + ?Sized,
  {
    if cart.is_empty() {
      warn!("Checkout attempted with an empty cart.");
      return Err(RevstoranError::EmptyCart);
    }

    let drafts = GroupDraft::from_cart(cart);
    let orders = match self.scope {
      TransactionScope::PerRestaurant => Self::write_per_restaurant(cart, store, customer_id, drafts).await?,
      TransactionScope::WholeCart => Self::write_whole_cart(store, customer_id, drafts).await?,
    };

    ops::clear(cart);
    let grand_total: Decimal = orders.iter().map(|o| o.total_price).sum();
    info!(
      orders = orders.len(),
      %grand_total,
      "Checkout via {} placed {} order(s).",
      entry,
      orders.len()
    );
    Ok(CheckoutReceipt {
      customer_id,
      orders,
      grand_total,
    })
  }

  async fn write_per_restaurant<S>(
    cart: &mut Cart,
    store: &S,
    customer_id: UserId,
    drafts: Vec<GroupDraft>,
  ) -> RevstoranResult<Vec<PlacedOrder>>
  where
    S: OrderStore + ?Sized,
  {
    let mut placed = Vec::with_capacity(drafts.len());
    for draft in &drafts {
      let written = write_group_in_own_tx(store, customer_id, draft).await;

      match written {
        Ok(order) => {
          event!(Level::DEBUG, order_id = %order.order_id, restaurant_id = %order.restaurant_id, "Group committed.");
          placed.push(order);
        }
        Err(source) => {
          // Committed groups are already orders; keep them out of any retry.
          for order in &placed {
            cart.remove_group(order.restaurant_id);
          }
          error!(
            restaurant_id = %draft.restaurant_id,
            committed = placed.len(),
            error = %source,
            "Order write failed; group rolled back."
          );
          return Err(RevstoranError::TransactionFailure {
            restaurant_id: draft.restaurant_id,
            committed_orders: placed.len(),
            source,
          });
        }
      }
    }
    Ok(placed)
  }

  async fn write_whole_cart<S>(store: &S, customer_id: UserId, drafts: Vec<GroupDraft>) -> RevstoranResult<Vec<PlacedOrder>>
  where
    S: OrderStore + ?Sized,
  {
    let mut tx = store.begin().await.map_err(|source| RevstoranError::TransactionFailure {
      restaurant_id: drafts[0].restaurant_id,
      committed_orders: 0,
      source,
    })?;

    let mut placed = Vec::with_capacity(drafts.len());
    for draft in &drafts {
      match write_group(&mut tx, customer_id, draft).await {
        Ok(order) => placed.push(order),
        Err(source) => {
          discard(tx, draft.restaurant_id).await;
          error!(restaurant_id = %draft.restaurant_id, error = %source, "Order write failed; checkout rolled back.");
          return Err(RevstoranError::TransactionFailure {
            restaurant_id: draft.restaurant_id,
            committed_orders: 0,
            source,
          });
        }
      }
    }

    if let Err(source) = tx.commit().await {
      let restaurant_id = drafts[drafts.len() - 1].restaurant_id;
      error!(error = %source, "Checkout commit failed.");
      return Err(RevstoranError::TransactionFailure {
        restaurant_id,
        committed_orders: 0,
        source,
      });
    }
    Ok(placed)
  }
}

/// Writes one order and its items through `tx`. Does not commit.
async fn write_group<T>(tx: &mut T, customer_id: UserId, draft: &GroupDraft) -> anyhow::Result<PlacedOrder>
where
  T: OrderTransaction,
{
  let order_id = tx
    .insert_order(&NewOrder {
      customer_id,
      restaurant_id: draft.restaurant_id,
      total_price: draft.total_price,
      status: OrderStatus::Pending,
    })
    .await?;

  for line in &draft.lines {
    tx.insert_order_item(&NewOrderItem {
      order_id,
      menu_item_id: line.menu_item_id,
      quantity: line.quantity,
      price: line.unit_price,
    })
    .await?;
  }

  Ok(PlacedOrder {
    order_id,
    restaurant_id: draft.restaurant_id,
    total_price: draft.total_price,
    item_count: draft.lines.len(),
  })
}

/// Opens a transaction for a single restaurant group, writes it and commits.
async fn write_group_in_own_tx<S>(store: &S, customer_id: UserId, draft: &GroupDraft) -> anyhow::Result<PlacedOrder>
where
  S: OrderStore + ?Sized,
{
  let mut tx = store.begin().await?;
  match write_group(&mut tx, customer_id, draft).await {
    Ok(order) => {
      tx.commit().await?;
      Ok(order)
    }
    Err(e) => {
      discard(tx, draft.restaurant_id).await;
      Err(e)
    }
  }
}

/// Rolls `tx` back. A failed rollback is only logged: the store discards the
/// transaction's writes when it is dropped anyway.
async fn discard<T>(tx: T, restaurant_id: RestaurantId)
where
  T: OrderTransaction,
{
  if let Err(e) = tx.rollback().await {
    warn!(restaurant_id = %restaurant_id, error = %e, "Explicit rollback failed.");
  }
}
