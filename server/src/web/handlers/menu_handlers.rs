// revstoran_server/src/web/handlers/menu_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::restaurant_handlers::{fetch_restaurant, require_owner};
use crate::errors::AppError;
use crate::models::MenuItem;
use crate::state::AppState;
use crate::web::forms::{parse_price, price_field, trimmed};
use crate::web::session::AuthenticatedUser;

const MENU_ITEM_COLUMNS: &str = "id, restaurant_id, name, description, price, image_path";

#[derive(Deserialize, Debug, Default)]
pub struct MenuItemPayload {
  pub name: Option<String>,
  pub description: Option<String>,
  /// Number or text; "12,50" is accepted.
  pub price: Option<Value>,
  pub image_path: Option<String>,
}

#[instrument(name = "handler::create_menu_item", skip_all, fields(restaurant_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn create_menu_item_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<i64>,
  req_payload: web::Json<MenuItemPayload>,
) -> Result<HttpResponse, AppError> {
  let restaurant = fetch_restaurant(&app_state.db_pool, path.into_inner()).await?;
  require_owner(&restaurant, auth_user.user_id)?;

  let payload = req_payload.into_inner();
  let price = match price_field(payload.price.as_ref())? {
    Some(price) => price,
    None => parse_price("0")?,
  };

  let item: MenuItem = sqlx::query_as(&format!(
    "INSERT INTO menu_items (restaurant_id, name, description, price, image_path) \
     VALUES ($1, $2, $3, $4, $5) RETURNING {}",
    MENU_ITEM_COLUMNS
  ))
  .bind(restaurant.id)
  .bind(trimmed(payload.name.as_ref()).unwrap_or_default())
  .bind(trimmed(payload.description.as_ref()).unwrap_or_default())
  .bind(price)
  .bind(trimmed(payload.image_path.as_ref()).filter(|p| !p.is_empty()))
  .fetch_one(&app_state.db_pool)
  .await?;

  info!(menu_item_id = item.id, "New menu item added.");
  Ok(HttpResponse::Created().json(json!({
      "message": "New menu item added.",
      "menuItem": item,
  })))
}

async fn fetch_menu_item(app_state: &AppState, menu_item_id: i64) -> Result<MenuItem, AppError> {
  let item: Option<MenuItem> = sqlx::query_as(&format!("SELECT {} FROM menu_items WHERE id = $1", MENU_ITEM_COLUMNS))
    .bind(menu_item_id)
    .fetch_optional(&app_state.db_pool)
    .await?;
  item.ok_or_else(|| AppError::NotFound(format!("Menu item with ID {} not found.", menu_item_id)))
}

#[instrument(name = "handler::update_menu_item", skip_all, fields(menu_item_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn update_menu_item_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<i64>,
  req_payload: web::Json<MenuItemPayload>,
) -> Result<HttpResponse, AppError> {
  let current = fetch_menu_item(&app_state, path.into_inner()).await?;
  let restaurant = fetch_restaurant(&app_state.db_pool, current.restaurant_id).await?;
  require_owner(&restaurant, auth_user.user_id)?;

  let payload = req_payload.into_inner();
  // Validate before writing anything.
  let price = price_field(payload.price.as_ref())?.unwrap_or(current.price);
  let image_path = match trimmed(payload.image_path.as_ref()) {
    Some(p) if !p.is_empty() => Some(p),
    _ => current.image_path.clone(),
  };

  let item: MenuItem = sqlx::query_as(&format!(
    "UPDATE menu_items SET name = $1, description = $2, price = $3, image_path = $4 WHERE id = $5 RETURNING {}",
    MENU_ITEM_COLUMNS
  ))
  .bind(trimmed(payload.name.as_ref()).unwrap_or(current.name))
  .bind(trimmed(payload.description.as_ref()).unwrap_or(current.description))
  .bind(price)
  .bind(image_path)
  .bind(current.id)
  .fetch_one(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Menu item updated.",
      "menuItem": item,
  })))
}

#[instrument(name = "handler::delete_menu_item", skip_all, fields(menu_item_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn delete_menu_item_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let item = fetch_menu_item(&app_state, path.into_inner()).await?;
  let restaurant = fetch_restaurant(&app_state.db_pool, item.restaurant_id).await?;
  require_owner(&restaurant, auth_user.user_id)?;

  sqlx::query("DELETE FROM menu_items WHERE id = $1")
    .bind(item.id)
    .execute(&app_state.db_pool)
    .await?;

  info!("Menu item deleted.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Menu item deleted.",
      "restaurantId": restaurant.id,
  })))
}
