// martaba/src/cart/event.rs

//! Change notifications emitted by the `CartStore`.

/// What happened to the cart collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEventKind {
  /// A new line was appended.
  Added { product_id: String },
  /// An existing line's quantity changed, by update or by a merged add.
  QuantityUpdated { product_id: String, quantity: u8 },
  Removed { product_id: String },
  Cleared,
}

/// A change notification. `version` is the store version after the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEvent {
  pub kind: CartEventKind,
  pub version: u64,
}

/// Handle returned by `CartStore::subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

pub(crate) type Subscriber = std::sync::Arc<dyn Fn(&CartEvent) + Send + Sync + 'static>;
