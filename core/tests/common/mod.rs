// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every fixture

use once_cell::sync::Lazy;
use revstoran::{Cart, MenuItemId, MenuItemSnapshot, RestaurantId, StaticMenuCatalog, UserId};
use rust_decimal::Decimal;
use tracing::Level;

// --- Fixture ids ---
pub const PIZZERIA: RestaurantId = RestaurantId::new(1);
pub const NOODLE_BAR: RestaurantId = RestaurantId::new(2);

pub const MARGHERITA: MenuItemId = MenuItemId::new(1);
pub const RAMEN: MenuItemId = MenuItemId::new(2);
pub const CALZONE: MenuItemId = MenuItemId::new(3);
pub const GYOZA: MenuItemId = MenuItemId::new(4);
pub const MISSING_ITEM: MenuItemId = MenuItemId::new(999);

pub const CUSTOMER: UserId = UserId::new(42);

pub fn snapshot(id: MenuItemId, name: &str, price: Decimal, restaurant_id: RestaurantId, restaurant_name: &str) -> MenuItemSnapshot {
  MenuItemSnapshot {
    id,
    name: name.to_string(),
    price,
    restaurant_id,
    restaurant_name: restaurant_name.to_string(),
  }
}

/// Two restaurants, two dishes each:
/// Pizzeria: Margherita 10.00, Calzone 12.50
/// Noodle Bar: Ramen 5.00, Gyoza 3.25
pub fn fixture_catalog() -> StaticMenuCatalog {
  StaticMenuCatalog::with_items([
    snapshot(MARGHERITA, "Margherita", Decimal::new(1000, 2), PIZZERIA, "Pizzeria Uno"),
    snapshot(CALZONE, "Calzone", Decimal::new(1250, 2), PIZZERIA, "Pizzeria Uno"),
    snapshot(RAMEN, "Shoyu Ramen", Decimal::new(500, 2), NOODLE_BAR, "Noodle Bar"),
    snapshot(GYOZA, "Gyoza", Decimal::new(325, 2), NOODLE_BAR, "Noodle Bar"),
  ])
}

/// Adds each id once, in order, panicking on lookup failure.
pub async fn cart_with(catalog: &StaticMenuCatalog, ids: &[MenuItemId]) -> Cart {
  let mut cart = Cart::new();
  for id in ids {
    revstoran::add_item(&mut cart, catalog, *id).await.expect("fixture item should exist");
  }
  cart
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
