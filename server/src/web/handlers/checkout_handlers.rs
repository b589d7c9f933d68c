// revstoran_server/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::session::Session;
use revstoran::{CheckoutEntry, CheckoutReceipt};

/// Runs the materializer for the session's cart under the session's lease, on
/// a fresh copy of the stored cart. The session is written back on failure
/// too, since a partial per-restaurant failure has already removed the
/// committed groups from the cart.
async fn place_orders(
  app_state: &AppState,
  session: &mut Session,
  entry: CheckoutEntry,
) -> Result<CheckoutReceipt, AppError> {
  let customer_id = session.require_user()?;
  let _lease = session.lease().ok_or_else(|| {
    warn!(session_id = %session.id(), "Checkout already running for this session.");
    AppError::Conflict("Your order is already being placed.".to_string())
  })?;
  session.reload();

  let store = app_state.order_store();
  let outcome = app_state
    .materializer
    .checkout(session.cart(), &store, customer_id, entry)
    .await;

  // Stored before the lease is released, so the next checkout sees the result.
  session.persist();
  outcome.map_err(AppError::from)
}

fn cart_total(session: &Session) -> Decimal {
  session.data.cart_if_initialized().map(|cart| cart.total()).unwrap_or(Decimal::ZERO)
}

#[instrument(name = "handler::checkout", skip_all)]
pub async fn checkout_handler(app_state: web::Data<AppState>, mut session: Session) -> Result<HttpResponse, AppError> {
  let receipt = place_orders(&app_state, &mut session, CheckoutEntry::Checkout).await?;
  info!(orders = receipt.orders.len(), "Order placed successfully.");

  let mut response = HttpResponse::Ok();
  session.save(&mut response);
  Ok(response.json(json!({
      "message": "Order placed successfully!",
      "receipt": receipt,
  })))
}

#[instrument(name = "handler::payment_summary", skip_all)]
pub async fn payment_summary_handler(session: Session) -> Result<HttpResponse, AppError> {
  session.require_user()?;
  let total = cart_total(&session);
  if total.is_zero() {
    warn!("Payment page requested with an empty cart.");
    return Err(AppError::EmptyCart);
  }
  Ok(HttpResponse::Ok().json(json!({ "total": total })))
}

#[instrument(name = "handler::payment", skip_all)]
pub async fn payment_handler(app_state: web::Data<AppState>, mut session: Session) -> Result<HttpResponse, AppError> {
  session.require_user()?;
  if cart_total(&session).is_zero() {
    warn!("Payment attempted with an empty cart.");
    return Err(AppError::EmptyCart);
  }

  let receipt = place_orders(&app_state, &mut session, CheckoutEntry::Payment).await?;
  info!(orders = receipt.orders.len(), "Payment accepted.");

  let mut response = HttpResponse::Ok();
  session.save(&mut response);
  Ok(response.json(json!({
      "message": "Payment successful! Your order has been placed.",
      "receipt": receipt,
  })))
}
