// martaba_storefront/src/services/product_service.rs

use super::api_client::ApiClient;
use super::transport::{ApiRequest, FormField, Method};
use crate::errors::Result;
use crate::models::{ListResponse, Product};
use std::sync::Arc;
use tracing::{info, instrument};

/// Filters for `GET /products`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
  pub category: Option<String>,
  pub search: Option<String>,
  pub page: Option<u32>,
  pub limit: Option<u32>,
}

impl ProductQuery {
  pub fn search(text: impl Into<String>) -> Self {
    Self {
      search: Some(text.into()),
      ..Self::default()
    }
  }

  fn apply(&self, mut request: ApiRequest) -> ApiRequest {
    if let Some(category) = &self.category {
      request = request.with_query("category", category);
    }
    if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
      request = request.with_query("search", search);
    }
    if let Some(page) = self.page {
      request = request.with_query("page", page);
    }
    if let Some(limit) = self.limit {
      request = request.with_query("limit", limit);
    }
    request
  }
}

#[derive(Debug, Clone)]
pub struct ProductService {
  api: Arc<ApiClient>,
}

impl ProductService {
  pub fn new(api: Arc<ApiClient>) -> Self {
    Self { api }
  }

  #[instrument(name = "product_service::list_products", skip(self), err(Display))]
  pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
    let request = query.apply(ApiRequest::get("/products"));
    let products = self.api.send_json::<ListResponse<Product>>(request).await?.into_vec();
    info!(count = products.len(), "Products fetched.");
    Ok(products)
  }

  #[instrument(name = "product_service::get_product", skip(self), err(Display))]
  pub async fn get_product(&self, product_id: &str) -> Result<Product> {
    self.api.send_json(ApiRequest::get("/products").with_segment(product_id)).await
  }

  /// `fields` is the multipart encoding produced by `ProductForm`.
  #[instrument(name = "product_service::create_product", skip_all, fields(parts = fields.len()), err(Display))]
  pub async fn create_product(&self, fields: Vec<FormField>) -> Result<Product> {
    let product: Product = self
      .api
      .send_json(ApiRequest::new(Method::Post, "/products").with_multipart(fields))
      .await?;
    info!(product_id = %product.id, "Product created.");
    Ok(product)
  }

  #[instrument(name = "product_service::update_product", skip(self, fields), fields(parts = fields.len()), err(Display))]
  pub async fn update_product(&self, product_id: &str, fields: Vec<FormField>) -> Result<Product> {
    let product: Product = self
      .api
      .send_json(ApiRequest::new(Method::Patch, "/products").with_segment(product_id).with_multipart(fields))
      .await?;
    info!(product_id = %product.id, "Product updated.");
    Ok(product)
  }

  #[instrument(name = "product_service::delete_product", skip(self), err(Display))]
  pub async fn delete_product(&self, product_id: &str) -> Result<()> {
    self.api.send_unit(ApiRequest::delete("/products").with_segment(product_id)).await?;
    info!("Product deleted.");
    Ok(())
  }
}
