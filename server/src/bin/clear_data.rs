// revstoran_server/src/bin/clear_data.rs

//! Maintenance tool: deletes every review and every menu item in a single
//! transaction. Users, restaurants and orders are left alone.

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .init();

  let database_url = std::env::var("DATABASE_URL").context("Missing environment variable 'DATABASE_URL'")?;
  let pool = PgPoolOptions::new()
    .max_connections(1)
    .connect(&database_url)
    .await
    .context("failed to connect to the database")?;

  let mut tx = pool.begin().await?;
  let deleted_reviews = sqlx::query("DELETE FROM comments").execute(&mut *tx).await?.rows_affected();
  let deleted_menu_items = sqlx::query("DELETE FROM menu_items").execute(&mut *tx).await?.rows_affected();
  tx.commit().await.context("failed to commit cleanup")?;

  info!(deleted_reviews, deleted_menu_items, "Cleanup committed.");
  println!("{} reviews, {} menu items deleted.", deleted_reviews, deleted_menu_items);
  Ok(())
}
