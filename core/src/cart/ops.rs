// revstoran/src/cart/ops.rs

//! Cart mutation operations. These are the only public ways to change a cart.
//!
//! `update_quantity` and `remove_item` are deliberately lenient: a target that
//! is no longer in the cart is a no-op, not an error.

use crate::cart::line::CartLine;
use crate::cart::store::Cart;
use crate::cart::{MAX_LINE_QUANTITY, MIN_LINE_QUANTITY};
use crate::catalog::MenuCatalog;
use crate::error::{RevstoranError, RevstoranResult};
use crate::ids::MenuItemId;
use std::num::IntErrorKind;
use tracing::{debug, info, instrument, warn};

/// Resolves `menu_item_id` through the catalog and adds one unit of it.
///
/// Fails with `MenuItemNotFound` (cart untouched) when the item does not exist.
#[instrument(name = "cart::add_item", skip_all, fields(menu_item_id = %menu_item_id), err(Display))]
pub async fn add_item<'c, C>(cart: &'c mut Cart, catalog: &C, menu_item_id: MenuItemId) -> RevstoranResult<&'c CartLine>
where
  C: MenuCatalog + ?Sized,
{
  let item = match catalog.menu_item(menu_item_id).await? {
    Some(item) => item,
    None => {
      warn!("Add to cart rejected: menu item {} does not exist.", menu_item_id);
      return Err(RevstoranError::MenuItemNotFound { menu_item_id });
    }
  };

  let line = cart.add_snapshot(&item);
  info!(
    restaurant_id = %item.restaurant_id,
    quantity = line.quantity,
    "Menu item {} added to cart.",
    menu_item_id
  );
  Ok(line)
}

/// Sets the quantity of `menu_item_id` from raw user input.
///
/// Unparseable input counts as 1; the result is clamped to [1, 50]. Returns the
/// quantity stored, or `None` when the item is not in the cart.
#[instrument(name = "cart::update_quantity", skip_all, fields(menu_item_id = %menu_item_id))]
pub fn update_quantity(cart: &mut Cart, menu_item_id: MenuItemId, requested: &str) -> Option<u32> {
  let quantity = match parse_quantity(requested) {
    Ok(raw) => clamp_quantity(raw),
    Err(e) => {
      debug!(error = %e, "Falling back to quantity {}.", MIN_LINE_QUANTITY);
      MIN_LINE_QUANTITY
    }
  };

  if cart.set_quantity(menu_item_id, quantity) {
    info!(quantity, "Cart quantity updated.");
    Some(quantity)
  } else {
    debug!("Quantity update ignored: item not in cart.");
    None
  }
}

/// Removes `menu_item_id` from whichever group holds it. Returns true when
/// something was removed.
#[instrument(name = "cart::remove_item", skip_all, fields(menu_item_id = %menu_item_id))]
pub fn remove_item(cart: &mut Cart, menu_item_id: MenuItemId) -> bool {
  let removed = cart.remove_lines(menu_item_id);
  if removed > 0 {
    info!(groups_left = cart.group_count(), "Menu item removed from cart.");
  } else {
    debug!("Remove ignored: item not in cart.");
  }
  removed > 0
}

/// Empties the cart unconditionally.
pub fn clear(cart: &mut Cart) {
  cart.reset();
  debug!("Cart cleared.");
}

/// Parses a quantity field the way a form submits it: surrounding whitespace
/// and a leading sign are fine, numeric overflow saturates, anything else is
/// `InvalidQuantity`.
pub fn parse_quantity(input: &str) -> RevstoranResult<i64> {
  let trimmed = input.trim();
  match trimmed.parse::<i64>() {
    Ok(value) => Ok(value),
    Err(e) => match e.kind() {
      IntErrorKind::PosOverflow => Ok(i64::MAX),
      IntErrorKind::NegOverflow => Ok(i64::MIN),
      _ => Err(RevstoranError::InvalidQuantity {
        input: input.to_string(),
      }),
    },
  }
}

/// Clamps any integer into [`MIN_LINE_QUANTITY`, `MAX_LINE_QUANTITY`].
pub fn clamp_quantity(raw: i64) -> u32 {
  raw.clamp(i64::from(MIN_LINE_QUANTITY), i64::from(MAX_LINE_QUANTITY)) as u32
}
