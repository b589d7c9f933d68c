// revstoran_server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::auth_service::{self, Registration};
use crate::state::AppState;
use crate::web::session::Session;
use revstoran::UserId;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct RegisterRequestPayload {
  #[serde(default)]
  pub username: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequestPayload {
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub password: String,
}

// --- Handler Implementations ---

#[instrument(name = "handler::register", skip_all, fields(req_email = %req_payload.email))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegisterRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let registration = Registration::normalize(&req_payload.username, &req_payload.email, &req_payload.password)?;
  let user = auth_service::register_user(&app_state.db_pool, &registration).await?;

  Ok(HttpResponse::Created().json(json!({
      "message": "Registration successful! You can now log in.",
      "user": user,
  })))
}

#[instrument(name = "handler::login", skip_all, fields(req_email = %req_payload.email))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LoginRequestPayload>,
  mut session: Session,
) -> Result<HttpResponse, AppError> {
  let user = auth_service::authenticate(&app_state.db_pool, &req_payload.email, &req_payload.password).await?;

  // New id on privilege change; the cart comes along.
  session.renew();
  session.data.user_id = Some(UserId::new(user.id));
  info!(user_id = user.id, "Login successful.");

  let mut response = HttpResponse::Ok();
  session.save(&mut response);
  Ok(response.json(json!({
      "message": "Login successful!",
      "user": user,
  })))
}

#[instrument(name = "handler::logout", skip_all)]
pub async fn logout_handler(mut session: Session) -> Result<HttpResponse, AppError> {
  if let Some(user_id) = session.data.user_id.take() {
    info!(user_id = %user_id, "User logged out.");
  }

  let mut response = HttpResponse::Ok();
  session.save(&mut response);
  Ok(response.json(json!({ "message": "You have been logged out." })))
}
