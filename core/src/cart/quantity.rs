// martaba/src/cart/quantity.rs

//! The controller behind one quantity field in the cart.

use super::item::Quantity;
use super::store::CartStore;
use crate::rate_limit::debounce::Debouncer;
use crate::rate_limit::throttle::Throttler;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{event, Level};

/// Minimum spacing between throttled quantity commits to the store.
pub const QUANTITY_THROTTLE_WINDOW: Duration = Duration::from_millis(300);

type CommitFn = Box<dyn Fn(Quantity) + Send + Sync + 'static>;

/// Binds one numeric input to `CartStore::update_cart_item_quantity`.
///
/// The store owns the committed quantity; the controller owns only a local
/// echo (`displayed`) so typing is reflected with no delay. Writes reach the
/// store through a throttle. A value the throttle drops is not lost: blur
/// commits it, and so does the trailing commit scheduled for the end of the
/// window (when a tokio runtime is available) or the next `commit_pending`.
pub struct QuantityInput {
  product_id: String,
  store: CartStore,
  quantity_value: Quantity,
  is_focused: bool,
  // Set when the throttle dropped the latest local value.
  unsent: bool,
  throttled_commit: Throttler<Quantity, CommitFn>,
  trailing_commit: Option<Debouncer<Quantity, CommitFn>>,
}

impl QuantityInput {
  pub fn new(store: CartStore, product_id: impl Into<String>) -> Self {
    Self::with_window(store, product_id, QUANTITY_THROTTLE_WINDOW)
  }

  pub fn with_window(store: CartStore, product_id: impl Into<String>, window: Duration) -> Self {
    let product_id = product_id.into();
    let quantity_value = store.quantity_of(&product_id).unwrap_or_default();

    let throttled_commit = Throttler::new(commit_fn(&store, &product_id), window);
    let trailing_commit = Handle::try_current()
      .ok()
      .map(|runtime| Debouncer::with_handle(commit_fn(&store, &product_id), window, runtime));

    Self {
      product_id,
      store,
      quantity_value,
      is_focused: false,
      unsent: false,
      throttled_commit,
      trailing_commit,
    }
  }

  /// Handles the input's change event with the raw field text.
  ///
  /// The local echo updates immediately; the store sees the value only if the
  /// throttle window is open. Returns the clamped value now displayed.
  pub fn on_change(&mut self, raw: &str) -> Quantity {
    let quantity = Quantity::parse_lenient(raw);
    self.apply_local(quantity);
    quantity
  }

  /// Spinner "+" button.
  pub fn step_up(&mut self) -> Quantity {
    let quantity = self.quantity_value.increment();
    self.apply_local(quantity);
    quantity
  }

  /// Spinner "-" button.
  pub fn step_down(&mut self) -> Quantity {
    let quantity = self.quantity_value.decrement();
    self.apply_local(quantity);
    quantity
  }

  fn apply_local(&mut self, quantity: Quantity) {
    self.quantity_value = quantity;
    let committed = self.throttled_commit.call(quantity);
    if committed {
      self.mark_sent();
    } else if !self.throttled_commit.is_disposed() {
      self.unsent = true;
      if let Some(trailing) = &self.trailing_commit {
        trailing.call(quantity);
      }
    }
    event!(
      Level::TRACE,
      product_id = %self.product_id,
      quantity = quantity.get(),
      committed,
      "Quantity input changed."
    );
  }

  fn mark_sent(&mut self) {
    self.unsent = false;
    if let Some(trailing) = &self.trailing_commit {
      trailing.cancel();
    }
  }

  /// Whether the local value is still waiting to reach the store.
  pub fn has_unsent_edit(&self) -> bool {
    self.unsent && self.trailing_commit.as_ref().map_or(true, |trailing| trailing.is_pending())
  }

  /// Commits a value the throttle dropped earlier, if the window has reopened.
  ///
  /// Returns `true` if a commit happened.
  pub fn commit_pending(&mut self) -> bool {
    if !self.has_unsent_edit() {
      return false;
    }
    let committed = self.throttled_commit.call(self.quantity_value);
    if committed {
      event!(Level::DEBUG, product_id = %self.product_id, quantity = self.quantity_value.get(), "Committed throttled quantity.");
      self.mark_sent();
    }
    committed
  }

  pub fn on_focus(&mut self) {
    self.is_focused = true;
  }

  /// Handles blur. If the local value never made it to the store (it fell
  /// inside a throttle window), it is committed now, unthrottled.
  ///
  /// Returns `true` if a commit happened.
  pub fn on_blur(&mut self) -> bool {
    self.is_focused = false;
    if self.throttled_commit.is_disposed() {
      return false;
    }
    self.mark_sent();
    match self.store.quantity_of(&self.product_id) {
      Some(committed) if committed != self.quantity_value => {
        event!(
          Level::DEBUG,
          product_id = %self.product_id,
          local = self.quantity_value.get(),
          committed = committed.get(),
          "Committing pending quantity on blur."
        );
        self
          .store
          .update_cart_item_quantity(&self.product_id, self.quantity_value.get() as i64)
          .is_applied()
      }
      _ => false,
    }
  }

  /// Accepts a new committed value from outside. Ignored while focused so the
  /// field never changes under the user's cursor, and while a local edit has
  /// not reached the store yet.
  ///
  /// Returns `true` if the displayed value was resynchronized.
  pub fn on_external_quantity(&mut self, quantity: Quantity) -> bool {
    if self.is_focused || self.has_unsent_edit() {
      return false;
    }
    self.unsent = false;
    self.quantity_value = quantity;
    true
  }

  /// `on_external_quantity` with the store's current value for this line.
  pub fn sync_from_store(&mut self) -> bool {
    match self.store.quantity_of(&self.product_id) {
      Some(quantity) => self.on_external_quantity(quantity),
      None => false,
    }
  }

  pub fn displayed(&self) -> Quantity {
    self.quantity_value
  }

  pub fn is_focused(&self) -> bool {
    self.is_focused
  }

  pub fn product_id(&self) -> &str {
    &self.product_id
  }

  /// Teardown: later changes update only the local echo, never the store.
  pub fn dispose(&self) {
    self.throttled_commit.dispose();
    if let Some(trailing) = &self.trailing_commit {
      trailing.dispose();
    }
  }

  pub fn is_disposed(&self) -> bool {
    self.throttled_commit.is_disposed()
  }
}

fn commit_fn(store: &CartStore, product_id: &str) -> CommitFn {
  let store = store.clone();
  let product_id = product_id.to_string();
  Box::new(move |quantity: Quantity| {
    store.update_cart_item_quantity(&product_id, quantity.get() as i64);
  })
}

impl Drop for QuantityInput {
  fn drop(&mut self) {
    self.dispose();
  }
}

impl std::fmt::Debug for QuantityInput {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("QuantityInput")
      .field("product_id", &self.product_id)
      .field("quantity_value", &self.quantity_value)
      .field("is_focused", &self.is_focused)
      .field("unsent", &self.unsent)
      .field("throttle", &self.throttled_commit)
      .field("trailing", &self.trailing_commit)
      .finish()
  }
}
