// martaba_storefront/src/models/mod.rs

//! Data structures exchanged with the REST backend.

pub mod order;
pub mod product;
pub mod subscription;
pub mod user;

pub use order::{Order, OrderLine, OrderStatus};
pub use product::{Dimension, Product, Size};
pub use subscription::Subscription;
pub use user::{NewUser, User, UserRole, UserUpdate};

use serde::Deserialize;

/// List endpoints answer either with a bare array or with `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListResponse<T> {
  Bare(Vec<T>),
  Wrapped { data: Vec<T> },
}

impl<T> ListResponse<T> {
  pub(crate) fn into_vec(self) -> Vec<T> {
    match self {
      ListResponse::Bare(items) => items,
      ListResponse::Wrapped { data } => data,
    }
  }
}
