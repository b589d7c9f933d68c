// revstoran_server/src/state.rs
use crate::config::AppConfig;
use crate::services::catalog::PgMenuCatalog;
use crate::services::order_store::PgOrderStore;
use revstoran::{MenuCatalog, OrderMaterializer, SessionStore};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub sessions: Arc<SessionStore>,
  pub catalog: Arc<dyn MenuCatalog>,
  pub materializer: OrderMaterializer,
  pub config: Arc<AppConfig>,
}

impl AppState {
  pub fn new(db_pool: PgPool, config: Arc<AppConfig>) -> Self {
    Self {
      catalog: Arc::new(PgMenuCatalog::new(db_pool.clone())),
      db_pool,
      sessions: Arc::new(SessionStore::with_idle_timeout(config.session_idle_timeout)),
      materializer: OrderMaterializer::new(config.checkout_scope),
      config,
    }
  }

  /// Replaces the menu lookup used by the cart.
  pub fn with_menu_catalog(mut self, catalog: Arc<dyn MenuCatalog>) -> Self {
    self.catalog = catalog;
    self
  }

  pub fn order_store(&self) -> PgOrderStore {
    PgOrderStore::new(self.db_pool.clone())
  }
}
