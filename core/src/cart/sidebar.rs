// martaba/src/cart/sidebar.rs

//! The cart listing: ordered lines, one quantity controller per line and a
//! total derived from the store on every render.

use super::item::{CartLineItem, Quantity};
use super::quantity::{QuantityInput, QUANTITY_THROTTLE_WINDOW};
use super::store::{CartChange, CartStore};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{event, Level};

/// `Σ unit_price × quantity`, where the unit price is the final (discounted)
/// price when present and the original price otherwise.
pub fn cart_total(items: &[CartLineItem]) -> f64 {
  items.iter().map(CartLineItem::line_total).sum()
}

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineView {
  pub product_id: String,
  pub name: String,
  pub image: String,
  pub original_price: f64,
  pub unit_price: f64,
  /// What the quantity field shows (may lead the store while being edited).
  pub quantity: Quantity,
  /// Based on the committed quantity.
  pub line_total: f64,
}

impl CartLineView {
  pub fn is_discounted(&self) -> bool {
    self.unit_price < self.original_price
  }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartView {
  pub lines: Vec<CartLineView>,
  pub total: f64,
  pub item_count: u32,
}

impl CartView {
  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }
}

pub struct CartSidebar {
  store: CartStore,
  inputs: HashMap<String, QuantityInput>,
  throttle_window: Duration,
}

impl CartSidebar {
  pub fn new(store: CartStore) -> Self {
    Self::with_throttle_window(store, QUANTITY_THROTTLE_WINDOW)
  }

  pub fn with_throttle_window(store: CartStore, throttle_window: Duration) -> Self {
    Self {
      store,
      inputs: HashMap::new(),
      throttle_window,
    }
  }

  /// Reconciles the quantity controllers with the store and renders every line.
  pub fn render(&mut self) -> CartView {
    for input in self.inputs.values_mut() {
      input.commit_pending();
    }
    let items = self.store.items();

    self.inputs.retain(|product_id, input| {
      let still_present = items.iter().any(|item| &item.product_id == product_id);
      if !still_present {
        input.dispose();
      }
      still_present
    });

    let lines = items
      .iter()
      .map(|item| {
        let input = self
          .inputs
          .entry(item.product_id.clone())
          .or_insert_with(|| QuantityInput::with_window(self.store.clone(), item.product_id.clone(), self.throttle_window));
        input.on_external_quantity(item.quantity);
        CartLineView {
          product_id: item.product_id.clone(),
          name: item.name.clone(),
          image: item.image.clone(),
          original_price: item.original_price,
          unit_price: item.unit_price(),
          quantity: input.displayed(),
          line_total: item.line_total(),
        }
      })
      .collect();

    CartView {
      lines,
      total: cart_total(&items),
      item_count: items.iter().map(|item| item.quantity.get() as u32).sum(),
    }
  }

  /// The controller for a line, created on demand while the line exists.
  pub fn input_mut(&mut self, product_id: &str) -> Option<&mut QuantityInput> {
    if !self.inputs.contains_key(product_id) {
      if !self.store.contains(product_id) {
        return None;
      }
      let input = QuantityInput::with_window(self.store.clone(), product_id, self.throttle_window);
      self.inputs.insert(product_id.to_string(), input);
    }
    self.inputs.get_mut(product_id)
  }

  /// Removal button: goes straight to the store, no throttling.
  pub fn remove(&mut self, product_id: &str) -> CartChange {
    if let Some(input) = self.inputs.remove(product_id) {
      input.dispose();
    }
    self.store.remove_item_from_cart(product_id)
  }

  pub fn store(&self) -> &CartStore {
    &self.store
  }

  /// Teardown: disposes every quantity controller.
  pub fn dispose(&mut self) {
    event!(Level::DEBUG, inputs = self.inputs.len(), "Disposing cart sidebar.");
    for input in self.inputs.values() {
      input.dispose();
    }
    self.inputs.clear();
  }
}

impl std::fmt::Debug for CartSidebar {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CartSidebar")
      .field("store", &self.store)
      .field("inputs", &self.inputs.len())
      .field("throttle_window", &self.throttle_window)
      .finish()
  }
}
