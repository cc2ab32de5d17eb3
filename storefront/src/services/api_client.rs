// martaba_storefront/src/services/api_client.rs

//! Resolves API paths against the configured base URL, attaches the session
//! token and maps non-2xx answers to `AppError::Api`.

use super::transport::{ApiRequest, ApiResponse, HttpRequest, ReqwestTransport, Transport};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ApiClient {
  base_url: String,
  token: Option<String>,
  transport: Arc<dyn Transport>,
}

#[derive(Deserialize)]
struct ErrorBody {
  message: Option<String>,
  error: Option<String>,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
    Self {
      base_url: base_url.into().trim_end_matches('/').to_string(),
      token: None,
      transport,
    }
  }

  /// Client backed by reqwest, configured from `AppConfig`.
  pub fn from_config(config: &AppConfig) -> Result<Self> {
    let transport = ReqwestTransport::new(config.api_timeout)?;
    let mut client = Self::new(config.api_base_url.clone(), Arc::new(transport));
    client.token = config.api_token.clone();
    Ok(client)
  }

  pub fn with_token(mut self, token: impl Into<String>) -> Self {
    self.token = Some(token.into());
    self
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn url_for(&self, path: &str, segments: &[String], query: &[(String, String)]) -> Result<Url> {
    let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
    let mut url = Url::parse(&joined).map_err(|e| AppError::Config(format!("Invalid API URL '{}': {}", joined, e)))?;
    if !segments.is_empty() {
      url
        .path_segments_mut()
        .map_err(|_| AppError::Config(format!("API URL '{}' cannot take path segments", joined)))?
        .pop_if_empty()
        .extend(segments.iter());
    }
    if !query.is_empty() {
      url.query_pairs_mut().extend_pairs(query.iter());
    }
    Ok(url)
  }

  /// Sends the request; any non-2xx status becomes `AppError::Api`.
  pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
    let url = self.url_for(&request.path, &request.segments, &request.query)?;
    debug!(method = ?request.method, %url, "Calling API.");
    let response = self
      .transport
      .send(HttpRequest {
        method: request.method,
        url,
        bearer_token: self.token.clone(),
        body: request.body,
      })
      .await?;

    if response.is_success() {
      Ok(response)
    } else {
      let message = error_message(&response);
      warn!(status = response.status, %message, path = %request.path, "API call failed.");
      Err(AppError::Api {
        status: response.status,
        message,
      })
    }
  }

  pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
    let response = self.send(request).await?;
    Ok(serde_json::from_slice(&response.body)?)
  }

  pub async fn send_unit(&self, request: ApiRequest) -> Result<()> {
    self.send(request).await.map(|_| ())
  }
}

impl std::fmt::Debug for ApiClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ApiClient")
      .field("base_url", &self.base_url)
      .field("has_token", &self.token.is_some())
      .finish()
  }
}

fn error_message(response: &ApiResponse) -> String {
  if let Ok(body) = serde_json::from_slice::<ErrorBody>(&response.body) {
    if let Some(message) = body.message.or(body.error) {
      return message;
    }
  }
  let text = String::from_utf8_lossy(&response.body).trim().to_string();
  if text.is_empty() {
    format!("Request failed with status {}", response.status)
  } else {
    text.chars().take(200).collect()
  }
}
