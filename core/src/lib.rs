// revstoran/src/lib.rs

//! Revstoran: the ordering core of a restaurant-ordering service.
//!
//! The crate owns the state that actually changes during an ordering session:
//!  - A per-session shopping [`Cart`] grouping [`CartLine`]s by restaurant.
//!  - Cart mutations (add, update quantity, remove, clear) that keep the cart
//!    free of empty restaurant groups and quantities inside [1, 50].
//!  - The [`OrderMaterializer`], which turns a cart into persisted orders (one
//!    per restaurant) inside store transactions and then empties the cart.
//!  - An in-process [`SessionStore`] holding identity and cart per session.
//!
//! Storage and identity are collaborators expressed as traits
//! ([`MenuCatalog`], [`OrderStore`]); the server crate implements them over
//! PostgreSQL, and the in-memory implementations here back the tests.

pub mod cart;
pub mod catalog;
pub mod error;
pub mod ids;
pub mod orders;
pub mod session;

// --- Re-exports for the Public API ---

pub use crate::cart::line::CartLine;
pub use crate::cart::ops::{add_item, clear, clamp_quantity, parse_quantity, remove_item, update_quantity};
pub use crate::cart::store::Cart;
pub use crate::cart::{MAX_LINE_QUANTITY, MIN_LINE_QUANTITY};

pub use crate::catalog::{MenuCatalog, MenuItemSnapshot, StaticMenuCatalog};

pub use crate::orders::materializer::{CheckoutEntry, CheckoutReceipt, OrderMaterializer, PlacedOrder, TransactionScope};
pub use crate::orders::memory::{InMemoryOrderStore, InMemoryTransaction, StoredOrder, StoredOrderItem};
pub use crate::orders::{NewOrder, NewOrderItem, OrderStatus, OrderStore, OrderTransaction};

pub use crate::session::{SessionData, SessionLease, SessionStore, DEFAULT_IDLE_TIMEOUT};

pub use crate::error::{RevstoranError, RevstoranResult};
pub use crate::ids::{MenuItemId, OrderId, RestaurantId, SessionId, UserId};
