// revstoran_server/src/services/mod.rs

pub mod auth_service;
pub mod catalog;
pub mod order_store;
