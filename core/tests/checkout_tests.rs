// tests/checkout_tests.rs
mod common;

use common::*;
use revstoran::{
  add_item, Cart, CheckoutEntry, InMemoryOrderStore, OrderMaterializer, OrderStatus, RevstoranError, TransactionScope,
};
use rust_decimal_macros::dec;
use serial_test::serial;

/// Margherita x2 (10.00) at the pizzeria, Ramen x1 (5.00) at the noodle bar.
async fn two_restaurant_cart() -> Cart {
  let catalog = fixture_catalog();
  let mut cart = Cart::new();
  add_item(&mut cart, &catalog, MARGHERITA).await.unwrap();
  add_item(&mut cart, &catalog, MARGHERITA).await.unwrap();
  add_item(&mut cart, &catalog, RAMEN).await.unwrap();
  cart
}

#[tokio::test]
#[serial]
async fn test_checkout_creates_one_order_per_restaurant() {
  setup_tracing();
  let store = InMemoryOrderStore::new();
  let materializer = OrderMaterializer::default();
  let mut cart = two_restaurant_cart().await;

  let receipt = materializer
    .checkout(&mut cart, &store, CUSTOMER, CheckoutEntry::Checkout)
    .await
    .expect("checkout should succeed");

  assert_eq!(receipt.customer_id, CUSTOMER);
  assert_eq!(receipt.orders.len(), 2);
  assert_eq!(receipt.grand_total, dec!(25.00));
  assert!(cart.is_empty(), "cart should be cleared after checkout");

  let orders = store.orders();
  assert_eq!(orders.len(), 2);

  let pizzeria = orders.iter().find(|o| o.restaurant_id == PIZZERIA).unwrap();
  assert_eq!(pizzeria.total_price, dec!(20.00));
  assert_eq!(pizzeria.customer_id, CUSTOMER);
  assert_eq!(pizzeria.status, OrderStatus::Pending);
  let pizzeria_items = store.items_for(pizzeria.id);
  assert_eq!(pizzeria_items.len(), 1);
  assert_eq!(pizzeria_items[0].menu_item_id, MARGHERITA);
  assert_eq!(pizzeria_items[0].quantity, 2);
  assert_eq!(pizzeria_items[0].price, dec!(10.00));

  let noodles = orders.iter().find(|o| o.restaurant_id == NOODLE_BAR).unwrap();
  assert_eq!(noodles.total_price, dec!(5.00));
  let noodle_items = store.items_for(noodles.id);
  assert_eq!(noodle_items.len(), 1);
  assert_eq!(noodle_items[0].menu_item_id, RAMEN);
  assert_eq!(noodle_items[0].quantity, 1);

  assert_eq!(store.commit_count(), 2);
  assert_eq!(store.rollback_count(), 0);
}

#[tokio::test]
#[serial]
async fn test_order_total_matches_its_items() {
  setup_tracing();
  let catalog = fixture_catalog();
  let store = InMemoryOrderStore::new();
  let mut cart = cart_with(&catalog, &[MARGHERITA, CALZONE, CALZONE, GYOZA, RAMEN, GYOZA]).await;

  OrderMaterializer::default()
    .checkout(&mut cart, &store, CUSTOMER, CheckoutEntry::Checkout)
    .await
    .unwrap();

  for order in store.orders() {
    let items = store.items_for(order.id);
    let recomputed: rust_decimal::Decimal = items.iter().map(|i| i.price * rust_decimal::Decimal::from(i.quantity)).sum();
    assert_eq!(order.total_price, recomputed, "order {}", order.id);
  }
  assert_eq!(store.orders().iter().map(|o| o.total_price).sum::<rust_decimal::Decimal>(), dec!(46.50));
}

#[tokio::test]
#[serial]
async fn test_empty_cart_checkout_writes_nothing() {
  setup_tracing();
  let store = InMemoryOrderStore::new();
  let mut cart = Cart::new();

  for scope in [TransactionScope::PerRestaurant, TransactionScope::WholeCart] {
    let result = OrderMaterializer::new(scope)
      .checkout(&mut cart, &store, CUSTOMER, CheckoutEntry::Checkout)
      .await;
    match result {
      Err(ref err @ RevstoranError::EmptyCart) => assert!(err.is_warning()),
      other => panic!("Expected EmptyCart, got {:?}", other),
    }
  }

  assert!(store.orders().is_empty());
  assert_eq!(store.commit_count(), 0);
  assert_eq!(store.rollback_count(), 0);
}

#[tokio::test]
#[serial]
async fn test_payment_entry_behaves_like_checkout() {
  setup_tracing();
  let via_checkout = InMemoryOrderStore::new();
  let via_payment = InMemoryOrderStore::new();
  let materializer = OrderMaterializer::default();

  let mut first = two_restaurant_cart().await;
  let mut second = two_restaurant_cart().await;

  let a = materializer
    .checkout(&mut first, &via_checkout, CUSTOMER, CheckoutEntry::Checkout)
    .await
    .unwrap();
  let b = materializer
    .checkout(&mut second, &via_payment, CUSTOMER, CheckoutEntry::Payment)
    .await
    .unwrap();

  assert_eq!(a, b);
  assert_eq!(via_checkout.orders(), via_payment.orders());
  assert_eq!(via_checkout.items(), via_payment.items());
  assert!(first.is_empty() && second.is_empty());
}

#[tokio::test]
#[serial]
async fn test_per_restaurant_failure_keeps_earlier_orders_and_failed_group() {
  setup_tracing();
  let catalog = fixture_catalog();
  let store = InMemoryOrderStore::new();
  store.fail_items_for(GYOZA);
  let mut cart = cart_with(&catalog, &[MARGHERITA, RAMEN, GYOZA]).await;

  let result = OrderMaterializer::new(TransactionScope::PerRestaurant)
    .checkout(&mut cart, &store, CUSTOMER, CheckoutEntry::Checkout)
    .await;

  match result {
    Err(RevstoranError::TransactionFailure {
      restaurant_id,
      committed_orders,
      ..
    }) => {
      assert_eq!(restaurant_id, NOODLE_BAR);
      assert_eq!(committed_orders, 1);
    }
    other => panic!("Expected TransactionFailure, got {:?}", other),
  }

  // The pizzeria order is durable and complete.
  let orders = store.orders();
  assert_eq!(orders.len(), 1);
  assert_eq!(orders[0].restaurant_id, PIZZERIA);
  assert_eq!(store.items().len(), 1);
  assert!(store.items().iter().all(|i| i.order_id == orders[0].id));

  // Only the failed group is left for a retry.
  assert!(cart.group(PIZZERIA).is_none());
  assert_eq!(cart.group(NOODLE_BAR).unwrap().len(), 2);
  assert_eq!(store.rollback_count(), 1);
}

#[tokio::test]
#[serial]
async fn test_per_restaurant_failure_in_first_group_leaves_cart_intact() {
  setup_tracing();
  let catalog = fixture_catalog();
  let store = InMemoryOrderStore::new();
  store.fail_items_for(CALZONE);
  let mut cart = cart_with(&catalog, &[MARGHERITA, CALZONE, RAMEN]).await;
  let before = cart.clone();

  let err = OrderMaterializer::new(TransactionScope::PerRestaurant)
    .checkout(&mut cart, &store, CUSTOMER, CheckoutEntry::Payment)
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    RevstoranError::TransactionFailure {
      committed_orders: 0,
      ..
    }
  ));
  assert!(!err.is_warning());
  assert!(store.orders().is_empty());
  assert!(store.items().is_empty());
  assert_eq!(cart, before);
}

#[tokio::test]
#[serial]
async fn test_whole_cart_failure_rolls_back_everything() {
  setup_tracing();
  let catalog = fixture_catalog();
  let store = InMemoryOrderStore::new();
  store.fail_items_for(GYOZA);
  let mut cart = cart_with(&catalog, &[MARGHERITA, RAMEN, GYOZA]).await;
  let before = cart.clone();

  let result = OrderMaterializer::new(TransactionScope::WholeCart)
    .checkout(&mut cart, &store, CUSTOMER, CheckoutEntry::Checkout)
    .await;

  match result {
    Err(RevstoranError::TransactionFailure {
      restaurant_id,
      committed_orders,
      ..
    }) => {
      assert_eq!(restaurant_id, NOODLE_BAR);
      assert_eq!(committed_orders, 0);
    }
    other => panic!("Expected TransactionFailure, got {:?}", other),
  }
  assert!(store.orders().is_empty());
  assert!(store.items().is_empty());
  assert_eq!(cart, before);
  assert_eq!(store.commit_count(), 0);
  assert_eq!(store.rollback_count(), 1);
}

#[tokio::test]
#[serial]
async fn test_whole_cart_success_uses_single_transaction() {
  setup_tracing();
  let store = InMemoryOrderStore::new();
  let mut cart = two_restaurant_cart().await;

  let receipt = OrderMaterializer::new(TransactionScope::WholeCart)
    .checkout(&mut cart, &store, CUSTOMER, CheckoutEntry::Checkout)
    .await
    .unwrap();

  assert_eq!(receipt.orders.len(), 2);
  assert_eq!(store.orders().len(), 2);
  assert_eq!(store.commit_count(), 1);
  assert!(cart.is_empty());
}

#[tokio::test]
#[serial]
async fn test_commit_failure_keeps_cart_and_writes_nothing() {
  setup_tracing();
  let store = InMemoryOrderStore::new();
  store.fail_commits(true);

  for scope in [TransactionScope::PerRestaurant, TransactionScope::WholeCart] {
    let mut cart = two_restaurant_cart().await;
    let before = cart.clone();

    let err = OrderMaterializer::new(scope)
      .checkout(&mut cart, &store, CUSTOMER, CheckoutEntry::Checkout)
      .await
      .unwrap_err();

    assert!(matches!(err, RevstoranError::TransactionFailure { committed_orders: 0, .. }), "scope {:?}", scope);
    assert_eq!(cart, before, "scope {:?}", scope);
  }
  assert!(store.orders().is_empty());
}

#[tokio::test]
#[serial]
async fn test_retry_after_partial_failure_places_remaining_group() {
  setup_tracing();
  let catalog = fixture_catalog();
  let flaky = InMemoryOrderStore::new();
  flaky.fail_items_for(RAMEN);
  let mut cart = cart_with(&catalog, &[MARGHERITA, RAMEN]).await;
  let materializer = OrderMaterializer::default();

  assert!(materializer
    .checkout(&mut cart, &flaky, CUSTOMER, CheckoutEntry::Checkout)
    .await
    .is_err());
  assert_eq!(cart.restaurant_ids().collect::<Vec<_>>(), vec![NOODLE_BAR]);

  let healthy = InMemoryOrderStore::new();
  let receipt = materializer
    .checkout(&mut cart, &healthy, CUSTOMER, CheckoutEntry::Checkout)
    .await
    .unwrap();
  assert_eq!(receipt.orders.len(), 1);
  assert_eq!(receipt.orders[0].restaurant_id, NOODLE_BAR);
  assert!(cart.is_empty());
}

#[test]
fn test_transaction_scope_parsing() {
  assert_eq!("per-restaurant".parse::<TransactionScope>(), Ok(TransactionScope::PerRestaurant));
  assert_eq!(" WHOLE_CART ".parse::<TransactionScope>(), Ok(TransactionScope::WholeCart));
  assert!("everything".parse::<TransactionScope>().is_err());
  assert_eq!(TransactionScope::default(), TransactionScope::PerRestaurant);
}
