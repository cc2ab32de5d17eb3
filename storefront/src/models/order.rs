// martaba_storefront/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  /// Orders can be withdrawn from the profile page until they ship.
  pub fn is_cancellable(self) -> bool {
    matches!(self, OrderStatus::Pending | OrderStatus::Processing)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
  #[serde(alias = "productId")]
  pub product: String,
  pub quantity: u32,
  #[serde(default)]
  pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  #[serde(rename = "_id")]
  pub id: String,
  pub created_at: DateTime<Utc>,
  pub status: OrderStatus,
  pub total_amount: f64,
  #[serde(default)]
  pub items: Vec<OrderLine>,
}
