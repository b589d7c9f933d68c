// revstoran_server/src/models/mod.rs

//! Row types for the tables in `schema.sql`.

pub mod menu_item;
pub mod order;
pub mod order_item;
pub mod restaurant;
pub mod review;
pub mod user;

pub use menu_item::MenuItem;
pub use order::{Order, OrderWithItems};
pub use order_item::OrderItem;
pub use restaurant::Restaurant;
pub use review::Review;
pub use user::User;
