// martaba/src/error.rs
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MartabaError {
  #[error("Quantity {value} is outside the allowed range [1, 99]")]
  QuantityOutOfRange { value: i64 },

  #[error("No tokio runtime is available to schedule the debounced call")]
  RuntimeUnavailable,

  #[error("Product not found in cart: {product_id}")]
  UnknownProduct { product_id: String },
}

pub type MartabaResult<T, E = MartabaError> = std::result::Result<T, E>;
