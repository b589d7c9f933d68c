// revstoran_server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use std::collections::HashMap;
use tracing::instrument;

use crate::errors::AppError;
use crate::models::{Order, OrderItem, OrderWithItems};
use crate::state::AppState;
use crate::web::session::AuthenticatedUser;

/// The current user's orders, newest first, each with its items.
#[instrument(name = "handler::list_orders", skip_all, fields(user_id = %auth_user.user_id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders: Vec<Order> = sqlx::query_as(
    "SELECT id, customer_id, restaurant_id, total_price, status, created_at \
     FROM orders WHERE customer_id = $1 ORDER BY id DESC",
  )
  .bind(auth_user.user_id.get())
  .fetch_all(&app_state.db_pool)
  .await?;

  let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
  let items: Vec<OrderItem> = if order_ids.is_empty() {
    Vec::new()
  } else {
    sqlx::query_as(
      "SELECT id, order_id, menu_item_id, quantity, price FROM order_items WHERE order_id = ANY($1) ORDER BY id",
    )
    .bind(&order_ids)
    .fetch_all(&app_state.db_pool)
    .await?
  };

  let mut items_by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
  for item in items {
    items_by_order.entry(item.order_id).or_default().push(item);
  }

  let orders: Vec<OrderWithItems> = orders
    .into_iter()
    .map(|order| OrderWithItems {
      items: items_by_order.remove(&order.id).unwrap_or_default(),
      order,
    })
    .collect();

  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}
