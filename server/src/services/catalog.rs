// revstoran_server/src/services/catalog.rs
use async_trait::async_trait;
use revstoran::{MenuCatalog, MenuItemId, MenuItemSnapshot, RestaurantId};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

/// `MenuCatalog` over the `menu_items` and `restaurants` tables.
#[derive(Debug, Clone)]
pub struct PgMenuCatalog {
  pool: PgPool,
}

impl PgMenuCatalog {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(FromRow)]
struct SnapshotRow {
  id: i64,
  name: String,
  price: Decimal,
  restaurant_id: i64,
  restaurant_name: String,
}

#[async_trait]
impl MenuCatalog for PgMenuCatalog {
  #[instrument(name = "PgMenuCatalog::menu_item", skip(self), fields(menu_item_id = %id), err(Display))]
  async fn menu_item(&self, id: MenuItemId) -> anyhow::Result<Option<MenuItemSnapshot>> {
    let row: Option<SnapshotRow> = sqlx::query_as(
      "SELECT m.id, m.name, m.price, m.restaurant_id, r.name AS restaurant_name \
       FROM menu_items m JOIN restaurants r ON r.id = m.restaurant_id \
       WHERE m.id = $1",
    )
    .bind(id.get())
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(|row| MenuItemSnapshot {
      id: MenuItemId::new(row.id),
      name: row.name,
      price: row.price,
      restaurant_id: RestaurantId::new(row.restaurant_id),
      restaurant_name: row.restaurant_name,
    }))
  }
}
