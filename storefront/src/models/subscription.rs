// martaba_storefront/src/models/subscription.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A newsletter subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
  #[serde(rename = "_id")]
  pub id: String,
  pub email: String,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}
