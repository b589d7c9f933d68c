// revstoran/src/error.rs
use crate::ids::{MenuItemId, RestaurantId};
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RevstoranError {
    #[error("Menu item not found: {menu_item_id}")]
    MenuItemNotFound { menu_item_id: MenuItemId },

    #[error("Your cart is empty.")]
    EmptyCart,

    /// Never surfaced to users: cart operations recover by falling back to a
    /// quantity of 1.
    #[error("Invalid quantity input: {input:?}")]
    InvalidQuantity { input: String },

    #[error(
        "Order write failed for restaurant {restaurant_id} ({committed_orders} order(s) already committed). Source: {source}"
    )]
    TransactionFailure {
        restaurant_id: RestaurantId,
        committed_orders: usize,
        #[source]
        source: AnyhowError,
    },

    #[error("Storage collaborator failed. Source: {source}")]
    Store {
        #[source]
        source: AnyhowError,
    },
}

impl RevstoranError {
    /// True for outcomes the caller should show as a warning rather than a failure.
    pub fn is_warning(&self) -> bool {
        matches!(self, RevstoranError::EmptyCart)
    }
}

impl From<AnyhowError> for RevstoranError {
    fn from(err: AnyhowError) -> Self {
        // Unwrap an already-typed error instead of nesting it one level deeper.
        match err.downcast::<RevstoranError>() {
            Ok(inner) => inner,
            Err(err) => RevstoranError::Store { source: err },
        }
    }
}

pub type RevstoranResult<T, E = RevstoranError> = std::result::Result<T, E>;
