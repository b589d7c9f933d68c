// revstoran_server/src/web/handlers/review_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use super::restaurant_handlers::fetch_restaurant;
use crate::errors::AppError;
use crate::models::Review;
use crate::state::AppState;
use crate::web::forms::parse_rating;
use crate::web::session::AuthenticatedUser;

#[derive(Deserialize, Debug, Default)]
pub struct ReviewPayload {
  pub content: Option<String>,
  pub rating: Option<Value>,
}

/// Reviews for one restaurant, newest first.
pub(crate) async fn fetch_reviews(pool: &PgPool, restaurant_id: i64) -> Result<Vec<Review>, AppError> {
  let reviews: Vec<Review> = sqlx::query_as(
    "SELECT c.id, c.user_id, u.username, c.restaurant_id, c.content, c.rating, c.created_at \
     FROM comments c JOIN users u ON u.id = c.user_id \
     WHERE c.restaurant_id = $1 ORDER BY c.id DESC",
  )
  .bind(restaurant_id)
  .fetch_all(pool)
  .await?;
  Ok(reviews)
}

#[instrument(name = "handler::add_review", skip_all, fields(restaurant_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn add_review_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<i64>,
  req_payload: web::Json<ReviewPayload>,
) -> Result<HttpResponse, AppError> {
  let restaurant = fetch_restaurant(&app_state.db_pool, path.into_inner()).await?;

  let content = req_payload.content.as_deref().unwrap_or_default().trim().to_string();
  let rating = parse_rating(req_payload.rating.as_ref());
  if content.is_empty() {
    warn!("Empty review rejected.");
    return Err(AppError::Validation("Review cannot be empty.".to_string()));
  }

  let review: Review = sqlx::query_as(
    "WITH inserted AS ( \
       INSERT INTO comments (user_id, restaurant_id, content, rating) VALUES ($1, $2, $3, $4) \
       RETURNING id, user_id, restaurant_id, content, rating, created_at \
     ) \
     SELECT i.id, i.user_id, u.username, i.restaurant_id, i.content, i.rating, i.created_at \
     FROM inserted i JOIN users u ON u.id = i.user_id",
  )
  .bind(auth_user.user_id.get())
  .bind(restaurant.id)
  .bind(&content)
  .bind(rating)
  .fetch_one(&app_state.db_pool)
  .await?;

  info!(review_id = review.id, rating, "Review submitted.");
  Ok(HttpResponse::Created().json(json!({
      "message": "Review submitted.",
      "review": review,
  })))
}

#[instrument(name = "handler::list_reviews", skip_all, fields(restaurant_id = %path.as_ref()))]
pub async fn list_reviews_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let reviews = fetch_reviews(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "reviews": reviews })))
}
