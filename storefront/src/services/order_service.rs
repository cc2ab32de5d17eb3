// martaba_storefront/src/services/order_service.rs

use super::api_client::ApiClient;
use super::transport::ApiRequest;
use crate::errors::{AppError, Result};
use crate::models::{ListResponse, Order};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Orders shown in the profile page's order tab.
#[derive(Debug, Clone)]
pub struct OrderService {
  api: Arc<ApiClient>,
}

impl OrderService {
  pub fn new(api: Arc<ApiClient>) -> Self {
    Self { api }
  }

  /// Newest first.
  #[instrument(name = "order_service::get_orders_by_user_id", skip(self), err(Display))]
  pub async fn get_orders_by_user_id(&self, user_id: &str) -> Result<Vec<Order>> {
    let mut orders = self
      .api
      .send_json::<ListResponse<Order>>(ApiRequest::get("/orders/user").with_segment(user_id))
      .await?
      .into_vec();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    info!(count = orders.len(), "Orders fetched.");
    Ok(orders)
  }

  #[instrument(name = "order_service::delete_order", skip(self), err(Display))]
  pub async fn delete_order(&self, order_id: &str) -> Result<()> {
    self.api.send_unit(ApiRequest::delete("/orders").with_segment(order_id)).await
  }

  /// Deletes an order only while its status still allows cancellation.
  #[instrument(name = "order_service::cancel_order", skip_all, fields(order_id = %order.id, status = ?order.status), err(Display))]
  pub async fn cancel_order(&self, order: &Order) -> Result<()> {
    if !order.status.is_cancellable() {
      warn!("Refusing to cancel an order that already left the warehouse.");
      return Err(AppError::Validation(format!(
        "Order {} can no longer be cancelled.",
        order.id
      )));
    }
    self.delete_order(&order.id).await
  }
}
