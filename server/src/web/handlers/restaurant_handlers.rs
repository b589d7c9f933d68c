// revstoran_server/src/web/handlers/restaurant_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use tracing::{error, info, instrument, warn};

use crate::errors::AppError;
use crate::models::{MenuItem, Restaurant};
use crate::state::AppState;
use crate::web::forms::trimmed;
use crate::web::session::AuthenticatedUser;
use revstoran::UserId;

const RESTAURANT_COLUMNS: &str = "id, name, description, city, state, image_path, owner_id, created_at";

/// Create and update share one payload; on update an absent field keeps the
/// stored value.
#[derive(Deserialize, Debug, Default)]
pub struct RestaurantPayload {
  pub name: Option<String>,
  pub description: Option<String>,
  pub city: Option<String>,
  pub state: Option<String>,
  pub image_path: Option<String>,
}

pub(crate) async fn fetch_restaurant(pool: &PgPool, restaurant_id: i64) -> Result<Restaurant, AppError> {
  let restaurant: Option<Restaurant> =
    sqlx::query_as(&format!("SELECT {} FROM restaurants WHERE id = $1", RESTAURANT_COLUMNS))
      .bind(restaurant_id)
      .fetch_optional(pool)
      .await
      .map_err(|e| {
        error!("Database error while fetching restaurant {}: {}", restaurant_id, e);
        AppError::Sqlx(e)
      })?;
  restaurant.ok_or_else(|| AppError::NotFound(format!("Restaurant with ID {} not found.", restaurant_id)))
}

pub(crate) fn require_owner(restaurant: &Restaurant, user_id: UserId) -> Result<(), AppError> {
  if restaurant.is_owned_by(user_id) {
    Ok(())
  } else {
    warn!(restaurant_id = restaurant.id, user_id = %user_id, "Owner check failed.");
    Err(AppError::Forbidden("Only the restaurant owner can do that.".to_string()))
  }
}

#[instrument(name = "handler::list_restaurants", skip_all)]
pub async fn list_restaurants_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let restaurants: Vec<Restaurant> =
    sqlx::query_as(&format!("SELECT {} FROM restaurants ORDER BY id DESC", RESTAURANT_COLUMNS))
      .fetch_all(&app_state.db_pool)
      .await?;

  Ok(HttpResponse::Ok().json(json!({ "restaurants": restaurants })))
}

#[instrument(name = "handler::get_restaurant", skip_all, fields(restaurant_id = %path.as_ref()))]
pub async fn get_restaurant_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let restaurant_id = path.into_inner();
  let restaurant = fetch_restaurant(&app_state.db_pool, restaurant_id).await?;

  let menu_items: Vec<MenuItem> = sqlx::query_as(
    "SELECT id, restaurant_id, name, description, price, image_path FROM menu_items WHERE restaurant_id = $1 ORDER BY id",
  )
  .bind(restaurant_id)
  .fetch_all(&app_state.db_pool)
  .await?;

  let reviews = super::review_handlers::fetch_reviews(&app_state.db_pool, restaurant_id).await?;

  Ok(HttpResponse::Ok().json(json!({
      "restaurant": restaurant,
      "menuItems": menu_items,
      "reviews": reviews,
  })))
}

#[instrument(name = "handler::create_restaurant", skip_all, fields(user_id = %auth_user.user_id))]
pub async fn create_restaurant_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<RestaurantPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let name = trimmed(payload.name.as_ref()).unwrap_or_default();
  if name.is_empty() {
    return Err(AppError::Validation("Restaurant name is required.".to_string()));
  }

  let restaurant: Restaurant = sqlx::query_as(&format!(
    "INSERT INTO restaurants (name, description, city, state, image_path, owner_id) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
    RESTAURANT_COLUMNS
  ))
  .bind(&name)
  .bind(trimmed(payload.description.as_ref()).unwrap_or_default())
  .bind(trimmed(payload.city.as_ref()).unwrap_or_default())
  .bind(trimmed(payload.state.as_ref()).unwrap_or_default())
  .bind(trimmed(payload.image_path.as_ref()).filter(|p| !p.is_empty()))
  .bind(auth_user.user_id.get())
  .fetch_one(&app_state.db_pool)
  .await?;

  info!(restaurant_id = restaurant.id, "New restaurant added.");
  Ok(HttpResponse::Created().json(json!({
      "message": "New restaurant added.",
      "restaurant": restaurant,
  })))
}

#[instrument(name = "handler::update_restaurant", skip_all, fields(restaurant_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn update_restaurant_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<i64>,
  req_payload: web::Json<RestaurantPayload>,
) -> Result<HttpResponse, AppError> {
  let current = fetch_restaurant(&app_state.db_pool, path.into_inner()).await?;
  require_owner(&current, auth_user.user_id)?;

  let payload = req_payload.into_inner();
  let image_path = match trimmed(payload.image_path.as_ref()) {
    Some(p) if !p.is_empty() => Some(p),
    _ => current.image_path.clone(),
  };

  let restaurant: Restaurant = sqlx::query_as(&format!(
    "UPDATE restaurants SET name = $1, description = $2, city = $3, state = $4, image_path = $5 \
     WHERE id = $6 RETURNING {}",
    RESTAURANT_COLUMNS
  ))
  .bind(trimmed(payload.name.as_ref()).unwrap_or(current.name))
  .bind(trimmed(payload.description.as_ref()).unwrap_or(current.description))
  .bind(trimmed(payload.city.as_ref()).unwrap_or(current.city))
  .bind(trimmed(payload.state.as_ref()).unwrap_or(current.state))
  .bind(image_path)
  .bind(current.id)
  .fetch_one(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Restaurant updated.",
      "restaurant": restaurant,
  })))
}

#[instrument(name = "handler::delete_restaurant", skip_all, fields(restaurant_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn delete_restaurant_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let restaurant = fetch_restaurant(&app_state.db_pool, path.into_inner()).await?;
  require_owner(&restaurant, auth_user.user_id)?;

  sqlx::query("DELETE FROM restaurants WHERE id = $1")
    .bind(restaurant.id)
    .execute(&app_state.db_pool)
    .await?;

  info!("Restaurant deleted.");
  Ok(HttpResponse::Ok().json(json!({ "message": "Restaurant deleted." })))
}

#[instrument(name = "handler::my_restaurants", skip_all, fields(user_id = %auth_user.user_id))]
pub async fn my_restaurants_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let restaurants: Vec<Restaurant> = sqlx::query_as(&format!(
    "SELECT {} FROM restaurants WHERE owner_id = $1 ORDER BY id",
    RESTAURANT_COLUMNS
  ))
  .bind(auth_user.user_id.get())
  .fetch_all(&app_state.db_pool)
  .await?;

  Ok(HttpResponse::Ok().json(json!({ "restaurants": restaurants })))
}
