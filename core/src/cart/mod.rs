// martaba/src/cart/mod.rs

//! The cart subsystem: line items, the store that owns them, the controller
//! behind each quantity field and the sidebar that lists and totals them.

pub mod event;
pub mod item;
pub mod quantity;
pub mod sidebar;
pub mod store;

pub use event::{CartEvent, CartEventKind, SubscriptionId};
pub use item::{CartLineItem, Quantity};
pub use quantity::{QuantityInput, QUANTITY_THROTTLE_WINDOW};
pub use sidebar::{cart_total, CartLineView, CartSidebar, CartView};
pub use store::{CartChange, CartStore};
