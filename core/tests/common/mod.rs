// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use martaba::{CartEvent, CartLineItem, CartStore, Quantity};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

// --- Common Fixtures ---
pub fn line(product_id: &str, original_price: f64) -> CartLineItem {
  CartLineItem::new(
    product_id,
    format!("Mattress {product_id}"),
    format!("https://cdn.example/{product_id}.jpg"),
    original_price,
  )
}

pub fn line_with_quantity(product_id: &str, original_price: f64, quantity: i64) -> CartLineItem {
  line(product_id, original_price).with_quantity(Quantity::clamp(quantity))
}

pub fn product_ids(store: &CartStore) -> Vec<String> {
  store.items().into_iter().map(|item| item.product_id).collect()
}

// --- Call recorders ---
/// Collects every argument a rate-limited callback receives.
#[derive(Clone)]
pub struct Recorder<T> {
  calls: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone + Send + 'static> Recorder<T> {
  pub fn new() -> Self {
    Self {
      calls: Arc::new(Mutex::new(Vec::new())),
    }
  }

  pub fn callback(&self) -> impl Fn(T) + Send + Sync + 'static {
    let calls = Arc::clone(&self.calls);
    move |value: T| calls.lock().push(value)
  }

  pub fn calls(&self) -> Vec<T> {
    self.calls.lock().clone()
  }

  pub fn count(&self) -> usize {
    self.calls.lock().len()
  }
}

/// Subscribes to a store and keeps every event it emits.
pub fn record_events(store: &CartStore) -> Arc<Mutex<Vec<CartEvent>>> {
  let events = Arc::new(Mutex::new(Vec::new()));
  let sink = Arc::clone(&events);
  store.subscribe(move |event: &CartEvent| sink.lock().push(event.clone()));
  events
}

/// Lets the paused clock run forward and gives woken timer tasks a turn.
pub async fn settle(duration: Duration) {
  tokio::time::sleep(duration).await;
  tokio::task::yield_now().await;
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
