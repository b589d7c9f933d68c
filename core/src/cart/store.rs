// revstoran/src/cart/store.rs

//! The `Cart` value. It is owned by a session and only changes through the
//! operations in [`crate::cart::ops`] (and checkout), which keep two shape
//! invariants:
//!  - every restaurant key maps to a non-empty line list;
//!  - a menu item appears at most once per restaurant group.

use crate::cart::line::CartLine;
use crate::catalog::MenuItemSnapshot;
use crate::ids::{MenuItemId, RestaurantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
  /// Ordered by restaurant id, which makes checkout order deterministic.
  restaurants: BTreeMap<RestaurantId, Vec<CartLine>>,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_empty(&self) -> bool {
    self.restaurants.is_empty()
  }

  /// Number of restaurant groups.
  pub fn group_count(&self) -> usize {
    self.restaurants.len()
  }

  /// Number of distinct lines across all groups.
  pub fn line_count(&self) -> usize {
    self.restaurants.values().map(Vec::len).sum()
  }

  pub fn groups(&self) -> impl Iterator<Item = (RestaurantId, &[CartLine])> + '_ {
    self.restaurants.iter().map(|(rid, lines)| (*rid, lines.as_slice()))
  }

  pub fn group(&self, restaurant_id: RestaurantId) -> Option<&[CartLine]> {
    self.restaurants.get(&restaurant_id).map(Vec::as_slice)
  }

  pub fn restaurant_ids(&self) -> impl Iterator<Item = RestaurantId> + '_ {
    self.restaurants.keys().copied()
  }

  pub fn lines(&self) -> impl Iterator<Item = &CartLine> + '_ {
    self.restaurants.values().flatten()
  }

  /// First line for `menu_item_id`, scanning groups in order.
  pub fn line(&self, menu_item_id: MenuItemId) -> Option<&CartLine> {
    self.lines().find(|line| line.menu_item_id == menu_item_id)
  }

  /// Sum of `unit_price * quantity` over every line. Zero for an empty cart.
  pub fn total(&self) -> Decimal {
    self.lines().map(CartLine::subtotal).sum()
  }

  pub fn group_total(&self, restaurant_id: RestaurantId) -> Decimal {
    self
      .group(restaurant_id)
      .map(|lines| lines.iter().map(CartLine::subtotal).sum())
      .unwrap_or(Decimal::ZERO)
  }

  // --- Mutations. Public entry points live in `cart::ops`. ---

  /// Adds one unit of `item`: increments an existing line for the same
  /// (restaurant, item) pair, otherwise appends a new line with quantity 1.
  /// Repeat adds are not clamped to the update range.
  pub(crate) fn add_snapshot(&mut self, item: &MenuItemSnapshot) -> &CartLine {
    let lines = self.restaurants.entry(item.restaurant_id).or_default();
    match lines.iter().position(|line| line.menu_item_id == item.id) {
      Some(idx) => {
        let line = &mut lines[idx];
        line.quantity = line.quantity.saturating_add(1);
        &lines[idx]
      }
      None => {
        lines.push(CartLine::from_snapshot(item));
        let last = lines.len() - 1;
        &lines[last]
      }
    }
  }

  /// Sets the quantity of the first matching line and stops scanning.
  /// Returns false when no line matches.
  pub(crate) fn set_quantity(&mut self, menu_item_id: MenuItemId, quantity: u32) -> bool {
    for lines in self.restaurants.values_mut() {
      if let Some(line) = lines.iter_mut().find(|line| line.menu_item_id == menu_item_id) {
        line.quantity = quantity;
        return true;
      }
    }
    false
  }

  /// Drops every line for `menu_item_id` from every group, then deletes any
  /// group left empty. Returns the number of lines removed.
  pub(crate) fn remove_lines(&mut self, menu_item_id: MenuItemId) -> usize {
    let mut removed = 0;
    for lines in self.restaurants.values_mut() {
      let before = lines.len();
      lines.retain(|line| line.menu_item_id != menu_item_id);
      removed += before - lines.len();
    }
    self.restaurants.retain(|_, lines| !lines.is_empty());
    removed
  }

  /// Removes a whole restaurant group (used after that group was ordered).
  pub(crate) fn remove_group(&mut self, restaurant_id: RestaurantId) -> Option<Vec<CartLine>> {
    self.restaurants.remove(&restaurant_id)
  }

  pub(crate) fn reset(&mut self) {
    self.restaurants = BTreeMap::new();
  }
}
