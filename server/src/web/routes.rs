// revstoran_server/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{
  auth_handlers, cart_handlers, checkout_handlers, menu_handlers, order_handlers, restaurant_handlers, review_handlers,
};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      // Authentication
      .service(
        web::scope("/auth")
          .route("/register", web::post().to(auth_handlers::register_handler))
          .route("/login", web::post().to(auth_handlers::login_handler))
          .route("/logout", web::post().to(auth_handlers::logout_handler)),
      )
      // Restaurants, their menus and reviews
      .service(
        web::scope("/restaurants")
          .route("", web::get().to(restaurant_handlers::list_restaurants_handler))
          .route("", web::post().to(restaurant_handlers::create_restaurant_handler))
          .route("/{id}", web::get().to(restaurant_handlers::get_restaurant_handler))
          .route("/{id}", web::put().to(restaurant_handlers::update_restaurant_handler))
          .route("/{id}", web::delete().to(restaurant_handlers::delete_restaurant_handler))
          .route("/{id}/menu", web::post().to(menu_handlers::create_menu_item_handler))
          .route("/{id}/reviews", web::get().to(review_handlers::list_reviews_handler))
          .route("/{id}/reviews", web::post().to(review_handlers::add_review_handler)),
      )
      .route("/my/restaurants", web::get().to(restaurant_handlers::my_restaurants_handler))
      .service(
        web::scope("/menu")
          .route("/{id}", web::put().to(menu_handlers::update_menu_item_handler))
          .route("/{id}", web::delete().to(menu_handlers::delete_menu_item_handler)),
      )
      // Cart (anonymous sessions allowed)
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::view_cart_handler))
          .route("/items/{menu_id}", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/items/{menu_id}", web::delete().to(cart_handlers::remove_from_cart_handler))
          .route("/items/{menu_id}/quantity", web::post().to(cart_handlers::update_quantity_handler))
          .route("/clear", web::post().to(cart_handlers::clear_cart_handler)),
      )
      // Order placement
      .route("/checkout", web::post().to(checkout_handlers::checkout_handler))
      .route("/payment", web::get().to(checkout_handlers::payment_summary_handler))
      .route("/payment", web::post().to(checkout_handlers::payment_handler))
      .route("/orders", web::get().to(order_handlers::list_orders_handler)),
  );
}
