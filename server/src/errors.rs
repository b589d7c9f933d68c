// revstoran_server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use revstoran::RevstoranError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  /// Not a failure: the user tried to pay for nothing.
  #[error("Your cart is empty.")]
  EmptyCart,

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Order could not be placed: {source}")]
  Checkout {
    #[source]
    source: RevstoranError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<RevstoranError> for AppError {
  fn from(err: RevstoranError) -> Self {
    match err {
      RevstoranError::EmptyCart => AppError::EmptyCart,
      RevstoranError::MenuItemNotFound { menu_item_id } => {
        AppError::NotFound(format!("Menu item with ID {} not found.", menu_item_id))
      }
      RevstoranError::InvalidQuantity { input } => AppError::Validation(format!("Invalid quantity: {:?}", input)),
      other => AppError::Checkout { source: other },
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    let err = match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => return AppError::Sqlx(sqlx_err),
      Err(err) => err,
    };
    match err.downcast::<RevstoranError>() {
      Ok(core_err) => core_err.into(),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) | AppError::EmptyCart => StatusCode::CONFLICT,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Checkout { .. } | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    match self {
      AppError::EmptyCart => tracing::warn!(application_error = %self, "Responding with warning"),
      _ => tracing::error!(application_error = %self, "Responding with error"),
    }
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::Forbidden(m) => HttpResponse::Forbidden().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Conflict(m) => HttpResponse::Conflict().json(json!({"error": m})),
      AppError::EmptyCart => HttpResponse::Conflict().json(json!({"warning": self.to_string()})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
      AppError::Checkout { source } => {
        let mut body = json!({"error": "Your order could not be placed. Please try again."});
        if let RevstoranError::TransactionFailure {
          restaurant_id,
          committed_orders,
          ..
        } = source
        {
          body["failedRestaurantId"] = json!(restaurant_id);
          body["committedOrders"] = json!(committed_orders);
        }
        HttpResponse::InternalServerError().json(body)
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
