// martaba_storefront/src/services/subscription_service.rs

use super::api_client::ApiClient;
use super::transport::{ApiRequest, Method};
use crate::errors::{AppError, Result};
use crate::models::{ListResponse, Subscription};
use serde_json::json;
use std::sync::Arc;
use tracing::instrument;

/// Newsletter subscriptions (footer sign-up form, admin list).
#[derive(Debug, Clone)]
pub struct SubscriptionService {
  api: Arc<ApiClient>,
}

impl SubscriptionService {
  pub fn new(api: Arc<ApiClient>) -> Self {
    Self { api }
  }

  #[instrument(name = "subscription_service::subscribe", skip(self), err(Display))]
  pub async fn subscribe(&self, email: &str) -> Result<Subscription> {
    let email = email.trim();
    if !crate::forms::is_plausible_email(email) {
      return Err(AppError::Validation("Please enter a valid email address.".to_string()));
    }
    let request = ApiRequest::new(Method::Post, "/subscriptions").with_json(&json!({ "email": email }))?;
    self.api.send_json(request).await
  }

  #[instrument(name = "subscription_service::list_subscriptions", skip(self), err(Display))]
  pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
    Ok(
      self
        .api
        .send_json::<ListResponse<Subscription>>(ApiRequest::get("/subscriptions"))
        .await?
        .into_vec(),
    )
  }

  #[instrument(name = "subscription_service::unsubscribe", skip(self), err(Display))]
  pub async fn unsubscribe(&self, subscription_id: &str) -> Result<()> {
    self
      .api
      .send_unit(ApiRequest::delete("/subscriptions").with_segment(subscription_id))
      .await
  }
}
