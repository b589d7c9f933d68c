// revstoran_server/src/web/mod.rs

pub mod forms;
pub mod handlers;
pub mod routes;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use routes::configure_app_routes;
