// martaba/src/cart/item.rs

//! Cart line items and the bounded `Quantity` they carry.

use crate::error::{MartabaError, MartabaResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An item quantity, always an integer in `[Quantity::MIN, Quantity::MAX]`.
///
/// There is no zero quantity: taking a product out of the cart is a removal,
/// not an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(u8);

impl Quantity {
  pub const MIN: Quantity = Quantity(1);
  pub const MAX: Quantity = Quantity(99);

  /// Constrains any integer to the allowed range.
  pub fn clamp(value: i64) -> Self {
    Quantity(value.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
  }

  /// Interprets raw text from an input field.
  ///
  /// Decimals truncate toward zero and numbers too large to represent clamp
  /// like any other out-of-range value. Anything that does not parse to a
  /// number (empty text, letters, NaN) resolves to `Quantity::MIN`.
  pub fn parse_lenient(raw: &str) -> Self {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
      return Self::clamp(value);
    }
    match trimmed.parse::<f64>() {
      Ok(value) if value.is_nan() => Self::MIN,
      // `as` saturates, so infinities land on i64::MAX / i64::MIN.
      Ok(value) => Self::clamp(value.trunc() as i64),
      Err(_) => Self::MIN,
    }
  }

  pub fn get(self) -> u8 {
    self.0
  }

  pub fn saturating_add(self, other: Quantity) -> Self {
    Self::clamp(self.0 as i64 + other.0 as i64)
  }

  pub fn increment(self) -> Self {
    Self::clamp(self.0 as i64 + 1)
  }

  pub fn decrement(self) -> Self {
    Self::clamp(self.0 as i64 - 1)
  }
}

impl Default for Quantity {
  fn default() -> Self {
    Self::MIN
  }
}

impl TryFrom<i64> for Quantity {
  type Error = MartabaError;

  fn try_from(value: i64) -> MartabaResult<Self> {
    if (Self::MIN.0 as i64..=Self::MAX.0 as i64).contains(&value) {
      Ok(Quantity(value as u8))
    } else {
      Err(MartabaError::QuantityOutOfRange { value })
    }
  }
}

impl From<Quantity> for i64 {
  fn from(quantity: Quantity) -> Self {
    quantity.0 as i64
  }
}

impl fmt::Display for Quantity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// One product entry in the cart, keyed by `product_id`.
///
/// Name, image and prices are a snapshot taken when the product was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
  pub product_id: String,
  pub name: String,
  pub image: String,
  pub original_price: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub final_price: Option<f64>,
  #[serde(default)]
  pub quantity: Quantity,
}

impl CartLineItem {
  pub fn new(
    product_id: impl Into<String>,
    name: impl Into<String>,
    image: impl Into<String>,
    original_price: f64,
  ) -> Self {
    Self {
      product_id: product_id.into(),
      name: name.into(),
      image: image.into(),
      original_price: non_negative(original_price),
      final_price: None,
      quantity: Quantity::MIN,
    }
  }

  pub fn with_final_price(mut self, final_price: f64) -> Self {
    self.final_price = Some(non_negative(final_price));
    self
  }

  pub fn with_quantity(mut self, quantity: Quantity) -> Self {
    self.quantity = quantity;
    self
  }

  /// Replaces negative or non-finite prices with `0`. Lines built with `new`
  /// are already normalized; deserialized ones may not be.
  pub fn normalized(mut self) -> Self {
    self.original_price = non_negative(self.original_price);
    self.final_price = self.final_price.map(non_negative);
    self
  }

  /// The price actually billed per unit.
  pub fn unit_price(&self) -> f64 {
    self.final_price.unwrap_or(self.original_price)
  }

  pub fn line_total(&self) -> f64 {
    self.unit_price() * self.quantity.get() as f64
  }
}

fn non_negative(price: f64) -> f64 {
  if price.is_finite() && price > 0.0 {
    price
  } else {
    0.0
  }
}
