// src/lib.rs

//! Martaba: the client-side cart engine of the Martaba storefront.
//!
//! The crate holds the pieces of the storefront that carry real state:
//!  - `Throttler` / `Debouncer`: per-call-site rate limiters over a callback.
//!  - `CartStore`: the authoritative, insertion-ordered cart collection with
//!    subscriber notification on every change.
//!  - `QuantityInput`: the controller behind one quantity field, buffering local
//!    edits and committing them to the store through a throttle.
//!  - `CartSidebar`: the cart listing, with totals derived on every render.

pub mod cart;
pub mod error;
pub mod rate_limit;

// --- Re-exports for the Public API ---

pub use crate::cart::item::{CartLineItem, Quantity};
pub use crate::cart::event::{CartEvent, CartEventKind, SubscriptionId};
pub use crate::cart::store::{CartChange, CartStore};
pub use crate::cart::quantity::{QuantityInput, QUANTITY_THROTTLE_WINDOW};
pub use crate::cart::sidebar::{cart_total, CartLineView, CartSidebar, CartView};

pub use crate::rate_limit::debounce::{debounce, Debouncer};
pub use crate::rate_limit::throttle::{throttle, Throttler};

pub use crate::error::{MartabaError, MartabaResult};

/*
    Typical wiring:
    1. Create one `CartStore` per session and hand clones of it to every consumer.
    2. Product cards call `store.add_item(...)`.
    3. The cart sidebar is a `CartSidebar::new(store.clone())`; each render returns
       a `CartView` with line totals and the cart total computed from the store.
    4. Quantity fields route keystrokes through `sidebar.input_mut(id)`:
       `on_focus()`, `on_change(raw)`, `on_blur()`.
    5. On teardown call `sidebar.dispose()` so no timer outlives its owner.
*/
