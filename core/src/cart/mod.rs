// revstoran/src/cart/mod.rs

//! The session cart: its value types and the operations allowed to mutate it.

pub mod line;
pub mod ops;
pub mod store;

/// Smallest quantity a line may be set to.
pub const MIN_LINE_QUANTITY: u32 = 1;
/// Largest quantity a line may be set to through an explicit quantity update.
pub const MAX_LINE_QUANTITY: u32 = 50;
