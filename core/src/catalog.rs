// revstoran/src/catalog.rs

//! Menu lookup collaborator. The cart never reads menu storage directly; it
//! asks a `MenuCatalog` for a snapshot of the item at add-time.

use crate::ids::{MenuItemId, RestaurantId};
use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the cart captures about a menu item when it is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemSnapshot {
  pub id: MenuItemId,
  pub name: String,
  pub price: Decimal,
  pub restaurant_id: RestaurantId,
  pub restaurant_name: String,
}

#[async_trait]
pub trait MenuCatalog: Send + Sync {
  /// `Ok(None)` when the item does not exist; `Err` only for lookup failures.
  async fn menu_item(&self, id: MenuItemId) -> anyhow::Result<Option<MenuItemSnapshot>>;
}

/// A fixed, in-memory catalog. Useful for tests, benchmarks and demos.
#[derive(Debug, Default)]
pub struct StaticMenuCatalog {
  items: RwLock<HashMap<MenuItemId, MenuItemSnapshot>>,
}

impl StaticMenuCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_items<I: IntoIterator<Item = MenuItemSnapshot>>(items: I) -> Self {
    let catalog = Self::new();
    for item in items {
      catalog.insert(item);
    }
    catalog
  }

  pub fn insert(&self, item: MenuItemSnapshot) {
    self.items.write().insert(item.id, item);
  }

  pub fn remove(&self, id: MenuItemId) -> Option<MenuItemSnapshot> {
    self.items.write().remove(&id)
  }

  /// Changes a price in place; carts holding the item keep the old price.
  pub fn set_price(&self, id: MenuItemId, price: Decimal) -> bool {
    match self.items.write().get_mut(&id) {
      Some(item) => {
        item.price = price;
        true
      }
      None => false,
    }
  }
}

#[async_trait]
impl MenuCatalog for StaticMenuCatalog {
  async fn menu_item(&self, id: MenuItemId) -> anyhow::Result<Option<MenuItemSnapshot>> {
    Ok(self.items.read().get(&id).cloned())
  }
}
