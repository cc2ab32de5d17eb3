// martaba_storefront/src/models/product.rs

use chrono::{DateTime, Utc};
use martaba::{CartLineItem, Quantity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  #[serde(rename = "_id")]
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub description: String,
  pub price: f64,
  #[serde(default)]
  pub stock: u32,
  /// Discount in percent, `0..=100`.
  #[serde(default)]
  pub discount: f64,
  #[serde(default)]
  pub discount_end_date: Option<DateTime<Utc>>,
  #[serde(default)]
  pub categories: Vec<String>,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default)]
  pub dimensions: Vec<Dimension>,
  /// CDN public ids (or absolute URLs) of the product images.
  #[serde(default)]
  pub images: Vec<String>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

/// A purchasable size variant (e.g. 160x200).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
  pub size: Size,
  pub price: f64,
  #[serde(default)]
  pub stock: u32,
  #[serde(default = "default_available")]
  pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
  pub width: f64,
  pub height: f64,
  #[serde(default)]
  pub label: String,
}

fn default_available() -> bool {
  true
}

impl Product {
  /// Whether the discount applies at `now`.
  pub fn has_active_discount(&self, now: DateTime<Utc>) -> bool {
    self.discount > 0.0 && self.discount <= 100.0 && self.discount_end_date.map_or(true, |end| end > now)
  }

  /// Discounted unit price, rounded to two decimals, while a discount is active.
  pub fn final_price(&self, now: DateTime<Utc>) -> Option<f64> {
    if !self.has_active_discount(now) {
      return None;
    }
    let discounted = self.price * (1.0 - self.discount / 100.0);
    Some((discounted * 100.0).round() / 100.0)
  }

  pub fn is_in_stock(&self) -> bool {
    self.stock > 0 || self.dimensions.iter().any(|d| d.is_available && d.stock > 0)
  }

  pub fn primary_image(&self) -> Option<&str> {
    self.images.first().map(String::as_str)
  }

  /// Price snapshot used when the product goes into the cart.
  pub fn to_cart_line(&self, now: DateTime<Utc>, image_url: impl Into<String>, quantity: Quantity) -> CartLineItem {
    let line = CartLineItem::new(self.id.clone(), self.name.clone(), image_url, self.price).with_quantity(quantity);
    match self.final_price(now) {
      Some(final_price) => line.with_final_price(final_price),
      None => line,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  fn product(discount: f64, end: Option<DateTime<Utc>>) -> Product {
    Product {
      id: "p1".into(),
      name: "Hotel mattress".into(),
      description: String::new(),
      price: 200.0,
      stock: 3,
      discount,
      discount_end_date: end,
      categories: vec!["mattresses".into()],
      tags: vec![],
      dimensions: vec![],
      images: vec!["products/p1".into()],
      created_at: None,
    }
  }

  #[test]
  fn discount_applies_until_end_date() {
    let now = Utc::now();
    assert_eq!(product(15.0, Some(now + Duration::days(1))).final_price(now), Some(170.0));
    assert_eq!(product(15.0, None).final_price(now), Some(170.0));
    assert_eq!(product(15.0, Some(now - Duration::days(1))).final_price(now), None);
    assert_eq!(product(0.0, None).final_price(now), None);
  }

  #[test]
  fn cart_line_carries_price_snapshot() {
    let now = Utc::now();
    let line = product(10.0, None).to_cart_line(now, "https://cdn/p1.jpg", Quantity::clamp(2));
    assert_eq!(line.product_id, "p1");
    assert_eq!(line.original_price, 200.0);
    assert_eq!(line.final_price, Some(180.0));
    assert_eq!(line.line_total(), 360.0);
  }

  #[test]
  fn deserializes_backend_shape() {
    let json = serde_json::json!({
      "_id": "665f", "name": "Bed", "price": 1500, "stock": 0,
      "discountEndDate": "2030-01-01T00:00:00Z",
      "dimensions": [{ "size": { "width": 160, "height": 200, "label": "Queen" }, "price": 1600, "stock": 2 }]
    });
    let product: Product = serde_json::from_value(json).unwrap();
    assert_eq!(product.id, "665f");
    assert!(product.dimensions[0].is_available);
    assert!(product.is_in_stock());
    assert!(product.primary_image().is_none());
  }
}
