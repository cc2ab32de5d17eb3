// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use martaba_storefront::services::{ApiClient, ApiResponse, FormField, HttpRequest, RequestBody, Transport};
use martaba_storefront::{AppConfig, Result};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::Level;

pub const BASE_URL: &str = "http://api.test/api";

// --- In-memory transport ---
/// Records every request and answers with queued responses (200 `null` when
/// the queue is empty).
#[derive(Default)]
pub struct MockTransport {
  requests: Mutex<Vec<HttpRequest>>,
  responses: Mutex<VecDeque<ApiResponse>>,
}

impl MockTransport {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn respond_json(&self, status: u16, body: Value) {
    self.responses.lock().push_back(ApiResponse {
      status,
      body: serde_json::to_vec(&body).unwrap(),
    });
  }

  pub fn respond_text(&self, status: u16, body: &str) {
    self.responses.lock().push_back(ApiResponse {
      status,
      body: body.as_bytes().to_vec(),
    });
  }

  pub fn requests(&self) -> Vec<HttpRequest> {
    self.requests.lock().clone()
  }

  pub fn last_request(&self) -> HttpRequest {
    self.requests.lock().last().cloned().expect("no request was sent")
  }
}

#[async_trait]
impl Transport for MockTransport {
  async fn send(&self, request: HttpRequest) -> Result<ApiResponse> {
    self.requests.lock().push(request);
    Ok(self.responses.lock().pop_front().unwrap_or(ApiResponse {
      status: 200,
      body: b"null".to_vec(),
    }))
  }
}

pub fn api_client(transport: &Arc<MockTransport>) -> Arc<ApiClient> {
  Arc::new(ApiClient::new(BASE_URL, transport.clone()))
}

pub fn test_config() -> AppConfig {
  AppConfig::from_lookup(|name| match name {
    "API_BASE_URL" => Some(BASE_URL.to_string()),
    "CDN_CLOUD_NAME" => Some("martaba".to_string()),
    _ => None,
  })
  .unwrap()
}

// --- Fixtures ---
pub fn product_json(id: &str, price: f64) -> Value {
  serde_json::json!({
    "_id": id,
    "name": format!("Mattress {id}"),
    "description": "Pocket springs",
    "price": price,
    "stock": 5,
    "categories": ["mattresses"],
    "images": [format!("products/{id}")]
  })
}

pub fn multipart_fields(request: &HttpRequest) -> Vec<FormField> {
  match &request.body {
    RequestBody::Multipart(fields) => fields.clone(),
    other => panic!("expected a multipart body, got {:?}", other),
  }
}

pub fn text_field<'a>(fields: &'a [FormField], name: &str) -> Option<&'a str> {
  fields.iter().find(|f| f.name == name).and_then(FormField::as_text)
}

pub fn text_fields<'a>(fields: &'a [FormField], name: &str) -> Vec<&'a str> {
  fields.iter().filter(|f| f.name == name).filter_map(FormField::as_text).collect()
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// Advances (paused) time and lets spawned timers run.
pub async fn settle(duration: std::time::Duration) {
  tokio::time::sleep(duration).await;
  tokio::task::yield_now().await;
}
