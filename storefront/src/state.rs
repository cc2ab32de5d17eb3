// martaba_storefront/src/state.rs

use crate::cdn::Cdn;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::media::PreviewRegistry;
use crate::notify::Notifier;
use crate::services::{ApiClient, OrderService, ProductService, SubscriptionService, UserService};
use martaba::{CartSidebar, CartStore};
use std::sync::Arc;

/// Everything a storefront session shares. One per session, passed explicitly.
#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub api: Arc<ApiClient>,
  pub cart: CartStore,
  pub notifier: Notifier,
  pub previews: PreviewRegistry,
  pub cdn: Cdn,
}

impl AppState {
  pub fn new(config: AppConfig) -> Result<Self> {
    let api = Arc::new(ApiClient::from_config(&config)?);
    Ok(Self::with_api(config, api))
  }

  pub fn with_api(config: AppConfig, api: Arc<ApiClient>) -> Self {
    let cdn = Cdn::new(config.cdn_cloud_name.clone());
    Self {
      config: Arc::new(config),
      api,
      cart: CartStore::new(),
      notifier: Notifier::new(),
      previews: PreviewRegistry::new(),
      cdn,
    }
  }

  pub fn products(&self) -> ProductService {
    ProductService::new(Arc::clone(&self.api))
  }

  pub fn users(&self) -> UserService {
    UserService::new(Arc::clone(&self.api))
  }

  pub fn orders(&self) -> OrderService {
    OrderService::new(Arc::clone(&self.api))
  }

  pub fn subscriptions(&self) -> SubscriptionService {
    SubscriptionService::new(Arc::clone(&self.api))
  }

  /// A cart sidebar using the configured quantity throttle.
  pub fn cart_sidebar(&self) -> CartSidebar {
    CartSidebar::with_throttle_window(self.cart.clone(), self.config.quantity_throttle)
  }
}
