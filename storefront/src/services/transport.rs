// martaba_storefront/src/services/transport.rs

//! Request/response types and the `Transport` seam between the services and
//! the network.

use crate::errors::Result;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
  Get,
  Post,
  Patch,
  Delete,
}

impl Method {
  fn as_reqwest(self) -> reqwest::Method {
    match self {
      Method::Get => reqwest::Method::GET,
      Method::Post => reqwest::Method::POST,
      Method::Patch => reqwest::Method::PATCH,
      Method::Delete => reqwest::Method::DELETE,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
  Text(String),
  File {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
  },
}

/// One multipart part.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
  pub name: String,
  pub value: FormValue,
}

impl FormField {
  pub fn text(name: impl Into<String>, value: impl ToString) -> Self {
    Self {
      name: name.into(),
      value: FormValue::Text(value.to_string()),
    }
  }

  pub fn as_text(&self) -> Option<&str> {
    match &self.value {
      FormValue::Text(text) => Some(text),
      FormValue::File { .. } => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
  Empty,
  Json(serde_json::Value),
  Multipart(Vec<FormField>),
}

/// A request relative to the API base URL.
///
/// `path` is a fixed route (`/products`); caller-supplied ids go in
/// `segments`, which are percent-encoded when the URL is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
  pub method: Method,
  pub path: String,
  pub segments: Vec<String>,
  pub query: Vec<(String, String)>,
  pub body: RequestBody,
}

impl ApiRequest {
  pub fn new(method: Method, path: impl Into<String>) -> Self {
    Self {
      method,
      path: path.into(),
      segments: Vec::new(),
      query: Vec::new(),
      body: RequestBody::Empty,
    }
  }

  pub fn get(path: impl Into<String>) -> Self {
    Self::new(Method::Get, path)
  }

  pub fn delete(path: impl Into<String>) -> Self {
    Self::new(Method::Delete, path)
  }

  /// Appends one path segment; `/`, `?` and `#` inside it are escaped.
  pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
    self.segments.push(segment.into());
    self
  }

  pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
    self.query.push((key.into(), value.to_string()));
    self
  }

  pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self> {
    self.body = RequestBody::Json(serde_json::to_value(body)?);
    Ok(self)
  }

  pub fn with_multipart(mut self, fields: Vec<FormField>) -> Self {
    self.body = RequestBody::Multipart(fields);
    self
  }
}

/// A fully resolved request, as handed to a `Transport`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
  pub method: Method,
  pub url: Url,
  pub bearer_token: Option<String>,
  pub body: RequestBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
  pub status: u16,
  pub body: Vec<u8>,
}

impl ApiResponse {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

/// Executes resolved requests. `ReqwestTransport` talks to the network;
/// tests substitute an in-memory implementation.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
  async fn send(&self, request: HttpRequest) -> Result<ApiResponse>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
  client: reqwest::Client,
}

impl ReqwestTransport {
  pub fn new(timeout: Duration) -> Result<Self> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self { client })
  }
}

#[async_trait]
impl Transport for ReqwestTransport {
  #[instrument(name = "ReqwestTransport::send", skip_all, fields(method = ?request.method, url = %request.url), err(Display))]
  async fn send(&self, request: HttpRequest) -> Result<ApiResponse> {
    let mut builder = self.client.request(request.method.as_reqwest(), request.url);
    if let Some(token) = &request.bearer_token {
      builder = builder.bearer_auth(token);
    }
    builder = match request.body {
      RequestBody::Empty => builder,
      RequestBody::Json(value) => builder.json(&value),
      RequestBody::Multipart(fields) => builder.multipart(to_multipart_form(fields)?),
    };

    let response = builder.send().await?;
    let status = response.status().as_u16();
    let body = response.bytes().await?.to_vec();
    debug!(status, body_len = body.len(), "Response received.");
    Ok(ApiResponse { status, body })
  }
}

fn to_multipart_form(fields: Vec<FormField>) -> Result<Form> {
  let mut form = Form::new();
  for field in fields {
    form = match field.value {
      FormValue::Text(text) => form.text(field.name, text),
      FormValue::File {
        file_name,
        content_type,
        bytes,
      } => {
        let part = Part::bytes(bytes).file_name(file_name).mime_str(&content_type)?;
        form.part(field.name, part)
      }
    };
  }
  Ok(form)
}
