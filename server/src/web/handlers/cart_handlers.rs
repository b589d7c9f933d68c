// revstoran_server/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::forms::quantity_text;
use crate::web::session::Session;
use revstoran::{Cart, CartLine, MenuItemId, RestaurantId};

// --- Response DTOs ---
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
  pub menu_item_id: MenuItemId,
  pub name: String,
  pub unit_price: Decimal,
  pub quantity: u32,
  pub subtotal: Decimal,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CartGroupView {
  pub restaurant_id: RestaurantId,
  pub restaurant_name: String,
  pub lines: Vec<CartLineView>,
  pub subtotal: Decimal,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
  pub restaurants: Vec<CartGroupView>,
  pub item_count: usize,
  pub total: Decimal,
}

impl From<&CartLine> for CartLineView {
  fn from(line: &CartLine) -> Self {
    Self {
      menu_item_id: line.menu_item_id,
      name: line.name.clone(),
      unit_price: line.unit_price,
      quantity: line.quantity,
      subtotal: line.subtotal(),
    }
  }
}

impl From<&Cart> for CartView {
  fn from(cart: &Cart) -> Self {
    let restaurants = cart
      .groups()
      .map(|(restaurant_id, lines)| CartGroupView {
        restaurant_id,
        restaurant_name: lines.first().map(|l| l.restaurant_name.clone()).unwrap_or_default(),
        lines: lines.iter().map(CartLineView::from).collect(),
        subtotal: cart.group_total(restaurant_id),
      })
      .collect();
    Self {
      restaurants,
      item_count: cart.line_count(),
      total: cart.total(),
    }
  }
}

// --- Request DTOs ---
#[derive(Deserialize, Debug, Default)]
pub struct QuantityRequestPayload {
  /// Number or text; absent means 1.
  pub quantity: Option<Value>,
}

#[derive(Deserialize, Debug, Default)]
pub struct QuantityFormPayload {
  pub quantity: Option<String>,
}

/// The quantity field comes as JSON or as a url-encoded form. A body that is
/// neither is rejected by the extractor.
pub type QuantityPayload = web::Either<web::Json<QuantityRequestPayload>, web::Form<QuantityFormPayload>>;

fn requested_quantity(payload: &QuantityPayload) -> String {
  match payload {
    web::Either::Left(json) => quantity_text(json.quantity.as_ref()),
    web::Either::Right(form) => form.quantity.clone().unwrap_or_else(|| quantity_text(None)),
  }
}

fn cart_response(mut session: Session, message: Option<&str>) -> HttpResponse {
  let view = CartView::from(&*session.cart());
  let mut response = HttpResponse::Ok();
  session.save(&mut response);
  match message {
    Some(message) => response.json(json!({ "message": message, "cart": view })),
    None => response.json(json!({ "cart": view })),
  }
}

// --- Handler Implementations ---

#[instrument(name = "handler::view_cart", skip_all)]
pub async fn view_cart_handler(session: Session) -> Result<HttpResponse, AppError> {
  Ok(cart_response(session, None))
}

#[instrument(name = "handler::add_to_cart", skip_all, fields(menu_item_id = %path.as_ref()))]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  mut session: Session,
) -> Result<HttpResponse, AppError> {
  let menu_item_id = MenuItemId::new(path.into_inner());
  let quantity = revstoran::add_item(session.cart(), app_state.catalog.as_ref(), menu_item_id)
    .await?
    .quantity;
  info!(session_id = %session.id(), quantity, "Item added to cart.");

  Ok(cart_response(session, Some("Item added to cart.")))
}

#[instrument(name = "handler::update_cart_quantity", skip_all, fields(menu_item_id = %path.as_ref()))]
pub async fn update_quantity_handler(
  path: web::Path<i64>,
  req_payload: QuantityPayload,
  mut session: Session,
) -> Result<HttpResponse, AppError> {
  let menu_item_id = MenuItemId::new(path.into_inner());
  let requested = requested_quantity(&req_payload);

  revstoran::update_quantity(session.cart(), menu_item_id, &requested);
  Ok(cart_response(session, None))
}

#[instrument(name = "handler::remove_from_cart", skip_all, fields(menu_item_id = %path.as_ref()))]
pub async fn remove_from_cart_handler(path: web::Path<i64>, mut session: Session) -> Result<HttpResponse, AppError> {
  revstoran::remove_item(session.cart(), MenuItemId::new(path.into_inner()));
  Ok(cart_response(session, None))
}

#[instrument(name = "handler::clear_cart", skip_all)]
pub async fn clear_cart_handler(mut session: Session) -> Result<HttpResponse, AppError> {
  revstoran::clear(session.cart());
  Ok(cart_response(session, Some("Cart cleared.")))
}
