// martaba/src/cart/store.rs

//! The authoritative cart collection.

use super::event::{CartEvent, CartEventKind, Subscriber, SubscriptionId};
use super::item::{CartLineItem, Quantity};
use super::sidebar::cart_total;
use crate::error::{MartabaError, MartabaResult};
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Outcome of a cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
  /// The collection changed and subscribers were notified.
  Applied,
  /// Nothing changed (unknown product, or the value was already current).
  Unchanged,
}

impl CartChange {
  pub fn is_applied(self) -> bool {
    matches!(self, CartChange::Applied)
  }
}

#[derive(Debug, Default)]
struct CartState {
  // Insertion order is display order; at most one line per product_id.
  items: Vec<CartLineItem>,
  version: u64,
}

impl CartState {
  fn position(&self, product_id: &str) -> Option<usize> {
    self.items.iter().position(|item| item.product_id == product_id)
  }
}

#[derive(Default)]
struct Subscribers {
  next_id: u64,
  entries: Vec<(SubscriptionId, Subscriber)>,
}

/// The cart store: one per session, passed explicitly to every consumer.
///
/// Cloning yields another handle to the same cart. Mutations go through
/// `add_item`, `update_cart_item_quantity`, `remove_item_from_cart` and
/// `clear`; readers get ordered snapshots.
///
/// IMPORTANT: subscribers run after the store lock is released, so they may
/// read from (or write to) the store, but a subscriber that writes will see its
/// own notification re-enter.
#[derive(Clone, Default)]
pub struct CartStore {
  state: Arc<RwLock<CartState>>,
  subscribers: Arc<Mutex<Subscribers>>,
}

impl CartStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Seeds a store, merging duplicate products the same way `add_item` does.
  pub fn from_items(items: impl IntoIterator<Item = CartLineItem>) -> Self {
    let store = Self::new();
    for item in items {
      store.add_item(item);
    }
    store
  }

  /// Adds a product line.
  ///
  /// A product already in the cart keeps its line, position and display
  /// snapshot; its quantity grows by the added quantity, saturating at 99.
  /// Negative or non-finite prices are stored as `0`.
  #[instrument(name = "CartStore::add_item", skip_all, fields(product_id = %item.product_id, quantity = %item.quantity))]
  pub fn add_item(&self, item: CartLineItem) -> CartChange {
    let item = item.normalized();
    let notification = {
      let mut state = self.state.write();
      match state.position(&item.product_id) {
        Some(index) => {
          let current = state.items[index].quantity;
          let merged = current.saturating_add(item.quantity);
          if merged == current {
            event!(Level::DEBUG, "Line already at maximum quantity; add ignored.");
            None
          } else {
            state.items[index].quantity = merged;
            state.version += 1;
            Some(CartEvent {
              kind: CartEventKind::QuantityUpdated {
                product_id: item.product_id.clone(),
                quantity: merged.get(),
              },
              version: state.version,
            })
          }
        }
        None => {
          let product_id = item.product_id.clone();
          state.items.push(item);
          state.version += 1;
          Some(CartEvent {
            kind: CartEventKind::Added { product_id },
            version: state.version,
          })
        }
      }
    };
    self.publish(notification)
  }

  /// Sets a line's quantity, clamped to `[1, 99]`.
  ///
  /// Unknown products are ignored rather than reported.
  #[instrument(name = "CartStore::update_cart_item_quantity", skip(self))]
  pub fn update_cart_item_quantity(&self, product_id: &str, quantity: i64) -> CartChange {
    let quantity = Quantity::clamp(quantity);
    let notification = {
      let mut state = self.state.write();
      match state.position(product_id) {
        None => {
          event!(Level::DEBUG, "Quantity update for product not in cart; ignored.");
          None
        }
        Some(index) if state.items[index].quantity == quantity => None,
        Some(index) => {
          state.items[index].quantity = quantity;
          state.version += 1;
          Some(CartEvent {
            kind: CartEventKind::QuantityUpdated {
              product_id: product_id.to_string(),
              quantity: quantity.get(),
            },
            version: state.version,
          })
        }
      }
    };
    self.publish(notification)
  }

  /// Deletes a line. Unknown products are ignored.
  #[instrument(name = "CartStore::remove_item_from_cart", skip(self))]
  pub fn remove_item_from_cart(&self, product_id: &str) -> CartChange {
    let notification = {
      let mut state = self.state.write();
      match state.position(product_id) {
        None => {
          event!(Level::DEBUG, "Removal of product not in cart; ignored.");
          None
        }
        Some(index) => {
          // `remove`, not `swap_remove`: the remaining lines keep their order.
          state.items.remove(index);
          state.version += 1;
          Some(CartEvent {
            kind: CartEventKind::Removed {
              product_id: product_id.to_string(),
            },
            version: state.version,
          })
        }
      }
    };
    self.publish(notification)
  }

  /// Empties the cart, e.g. once an order has been placed.
  pub fn clear(&self) -> CartChange {
    let notification = {
      let mut state = self.state.write();
      if state.items.is_empty() {
        None
      } else {
        state.items.clear();
        state.version += 1;
        Some(CartEvent {
          kind: CartEventKind::Cleared,
          version: state.version,
        })
      }
    };
    self.publish(notification)
  }

  // --- Readers ---

  /// Ordered snapshot of every line.
  pub fn items(&self) -> Vec<CartLineItem> {
    self.state.read().items.clone()
  }

  /// Runs `f` against the live collection under a read lock.
  /// `f` must not call back into mutating store methods.
  pub fn with_items<R>(&self, f: impl FnOnce(&[CartLineItem]) -> R) -> R {
    let state: RwLockReadGuard<'_, CartState> = self.state.read();
    f(&state.items)
  }

  pub fn get(&self, product_id: &str) -> Option<CartLineItem> {
    let state = self.state.read();
    state.position(product_id).map(|index| state.items[index].clone())
  }

  pub fn quantity_of(&self, product_id: &str) -> Option<Quantity> {
    let state = self.state.read();
    state.position(product_id).map(|index| state.items[index].quantity)
  }

  /// Like `get`, but reports a missing product as an error.
  pub fn require(&self, product_id: &str) -> MartabaResult<CartLineItem> {
    self.get(product_id).ok_or_else(|| MartabaError::UnknownProduct {
      product_id: product_id.to_string(),
    })
  }

  pub fn contains(&self, product_id: &str) -> bool {
    self.state.read().position(product_id).is_some()
  }

  /// Number of distinct lines.
  pub fn len(&self) -> usize {
    self.state.read().items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.state.read().items.is_empty()
  }

  /// Sum of quantities across lines (the header badge number).
  pub fn item_count(&self) -> u32 {
    self.with_items(|items| items.iter().map(|item| item.quantity.get() as u32).sum())
  }

  /// Derived total; see `cart_total`.
  pub fn total(&self) -> f64 {
    self.with_items(cart_total)
  }

  /// Monotonic counter bumped on every applied change.
  pub fn version(&self) -> u64 {
    self.state.read().version
  }

  // --- Subscriptions ---

  pub fn subscribe<F>(&self, subscriber: F) -> SubscriptionId
  where
    F: Fn(&CartEvent) + Send + Sync + 'static,
  {
    let mut subscribers = self.subscribers.lock();
    subscribers.next_id += 1;
    let id = SubscriptionId(subscribers.next_id);
    subscribers.entries.push((id, Arc::new(subscriber)));
    event!(Level::DEBUG, subscription_id = id.0, "Cart subscriber registered.");
    id
  }

  pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
    let mut subscribers = self.subscribers.lock();
    let before = subscribers.entries.len();
    subscribers.entries.retain(|(entry_id, _)| *entry_id != id);
    before != subscribers.entries.len()
  }

  pub fn subscriber_count(&self) -> usize {
    self.subscribers.lock().entries.len()
  }

  fn publish(&self, notification: Option<CartEvent>) -> CartChange {
    let Some(cart_event) = notification else {
      return CartChange::Unchanged;
    };
    event!(Level::DEBUG, version = cart_event.version, kind = ?cart_event.kind, "Cart changed.");
    // Snapshot the list so subscribers can (un)subscribe while being notified.
    let subscribers: Vec<Subscriber> = self
      .subscribers
      .lock()
      .entries
      .iter()
      .map(|(_, subscriber)| Arc::clone(subscriber))
      .collect();
    for subscriber in subscribers {
      subscriber(&cart_event);
    }
    CartChange::Applied
  }
}

impl std::fmt::Debug for CartStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let state = self.state.read();
    f.debug_struct("CartStore")
      .field("items", &state.items)
      .field("version", &state.version)
      .field("subscribers", &self.subscribers.lock().entries.len())
      .finish()
  }
}
