// revstoran/src/cart/line.rs

use crate::catalog::MenuItemSnapshot;
use crate::ids::MenuItemId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One menu item's selection inside a restaurant group.
///
/// Name, price and restaurant name are captured when the item is first added
/// and are not refreshed if the menu item changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
  pub menu_item_id: MenuItemId,
  pub name: String,
  pub unit_price: Decimal,
  pub quantity: u32,
  pub restaurant_name: String,
}

impl CartLine {
  pub(crate) fn from_snapshot(item: &MenuItemSnapshot) -> Self {
    Self {
      menu_item_id: item.id,
      name: item.name.clone(),
      unit_price: item.price,
      quantity: 1,
      restaurant_name: item.restaurant_name.clone(),
    }
  }

  /// `unit_price * quantity`
  pub fn subtotal(&self) -> Decimal {
    self.unit_price * Decimal::from(self.quantity)
  }
}
