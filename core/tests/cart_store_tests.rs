// tests/cart_store_tests.rs
mod common;
use common::*;
use martaba::{CartChange, CartEventKind, CartStore, Quantity};
use serial_test::serial;

#[test]
#[serial]
fn test_update_clamps_into_range() {
  setup_tracing();
  let store = CartStore::from_items([line("bed", 100.0)]);

  for (requested, stored) in [(-5, 1), (0, 1), (1, 1), (42, 42), (99, 99), (100, 99), (i64::MAX, 99)] {
    store.update_cart_item_quantity("bed", requested);
    assert_eq!(store.quantity_of("bed"), Some(Quantity::clamp(stored)), "requested {requested}");
  }
}

#[test]
#[serial]
fn test_add_merges_duplicates_and_keeps_order() {
  setup_tracing();
  let store = CartStore::new();
  store.add_item(line_with_quantity("a", 10.0, 2));
  store.add_item(line("b", 20.0));
  store.add_item(line_with_quantity("a", 10.0, 3));
  store.add_item(line_with_quantity("c", 30.0, 1));
  store.add_item(line_with_quantity("b", 20.0, 98));

  assert_eq!(product_ids(&store), vec!["a", "b", "c"]);
  assert_eq!(store.quantity_of("a"), Some(Quantity::clamp(5)));
  assert_eq!(store.quantity_of("b"), Some(Quantity::MAX));
  assert_eq!(store.len(), 3);
  assert_eq!(store.item_count(), 5 + 99 + 1);
}

#[test]
#[serial]
fn test_merged_add_keeps_first_snapshot() {
  setup_tracing();
  let store = CartStore::new();
  store.add_item(line("a", 10.0));
  let mut renamed = line("a", 999.0);
  renamed.name = "Changed".to_string();
  store.add_item(renamed);

  let item = store.get("a").unwrap();
  assert_eq!(item.original_price, 10.0);
  assert_eq!(item.name, "Mattress a");
}

#[test]
#[serial]
fn test_update_does_not_reorder() {
  setup_tracing();
  let store = CartStore::from_items([line("a", 1.0), line("b", 2.0), line("c", 3.0)]);
  store.update_cart_item_quantity("a", 7);
  store.update_cart_item_quantity("c", 2);
  assert_eq!(product_ids(&store), vec!["a", "b", "c"]);
}

#[test]
#[serial]
fn test_missing_key_is_a_no_op() {
  setup_tracing();
  let store = CartStore::from_items([line("a", 1.0), line_with_quantity("b", 2.0, 4)]);
  let events = record_events(&store);
  let before = store.items();
  let version = store.version();

  assert_eq!(store.update_cart_item_quantity("ghost", 5), CartChange::Unchanged);
  assert_eq!(store.remove_item_from_cart("ghost"), CartChange::Unchanged);

  assert_eq!(store.items(), before);
  assert_eq!(store.version(), version);
  assert!(events.lock().is_empty());
}

#[test]
#[serial]
fn test_remove_keeps_remaining_order() {
  setup_tracing();
  let store = CartStore::from_items([line("a", 1.0), line("b", 2.0), line("c", 3.0)]);
  assert!(store.remove_item_from_cart("b").is_applied());
  assert_eq!(product_ids(&store), vec!["a", "c"]);
  assert!(!store.contains("b"));
}

#[test]
#[serial]
fn test_subscribers_see_each_change() {
  setup_tracing();
  let store = CartStore::new();
  let events = record_events(&store);

  store.add_item(line("a", 1.0));
  store.add_item(line("a", 1.0));
  store.update_cart_item_quantity("a", 9);
  store.update_cart_item_quantity("a", 9);
  store.remove_item_from_cart("a");

  let kinds: Vec<CartEventKind> = events.lock().iter().map(|e| e.kind.clone()).collect();
  assert_eq!(
    kinds,
    vec![
      CartEventKind::Added { product_id: "a".into() },
      CartEventKind::QuantityUpdated { product_id: "a".into(), quantity: 2 },
      CartEventKind::QuantityUpdated { product_id: "a".into(), quantity: 9 },
      CartEventKind::Removed { product_id: "a".into() },
    ]
  );
  let versions: Vec<u64> = events.lock().iter().map(|e| e.version).collect();
  assert_eq!(versions, vec![1, 2, 3, 4]);
}

#[test]
#[serial]
fn test_unsubscribe_stops_notifications() {
  setup_tracing();
  let store = CartStore::new();
  let events = std::sync::Arc::new(parking_lot::Mutex::new(0usize));
  let sink = events.clone();
  let id = store.subscribe(move |_| *sink.lock() += 1);

  store.add_item(line("a", 1.0));
  assert!(store.unsubscribe(id));
  assert!(!store.unsubscribe(id));
  store.add_item(line("b", 1.0));

  assert_eq!(*events.lock(), 1);
  assert_eq!(store.subscriber_count(), 0);
}

#[test]
#[serial]
fn test_subscriber_may_read_store() {
  setup_tracing();
  let store = CartStore::new();
  let totals = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
  let sink = totals.clone();
  let reader = store.clone();
  store.subscribe(move |_| sink.lock().push(reader.total()));

  store.add_item(line_with_quantity("a", 10.0, 2));
  store.add_item(line("b", 5.0));

  assert_eq!(*totals.lock(), vec![20.0, 25.0]);
}

#[test]
#[serial]
fn test_clones_share_one_cart() {
  setup_tracing();
  let store = CartStore::new();
  let header_badge = store.clone();
  store.add_item(line_with_quantity("a", 1.0, 3));
  assert_eq!(header_badge.item_count(), 3);
}

#[test]
#[serial]
fn test_deserialized_prices_are_normalized_on_add() {
  setup_tracing();
  let store = CartStore::new();
  let tampered: martaba::CartLineItem = serde_json::from_value(serde_json::json!({
    "productId": "bed",
    "name": "Mattress",
    "image": "bed.jpg",
    "originalPrice": -120.0,
    "finalPrice": -5.0,
    "quantity": 2
  }))
  .unwrap();
  let mut non_finite = line("pillow", 40.0);
  non_finite.original_price = f64::NAN;
  non_finite.final_price = Some(f64::INFINITY);

  store.add_item(tampered);
  store.add_item(non_finite);

  let bed = store.get("bed").unwrap();
  assert_eq!(bed.original_price, 0.0);
  assert_eq!(bed.final_price, Some(0.0));
  let pillow = store.get("pillow").unwrap();
  assert_eq!(pillow.original_price, 0.0);
  assert_eq!(pillow.final_price, Some(0.0));
  assert_eq!(store.total(), 0.0);
}
