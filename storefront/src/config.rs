// martaba_storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
  /// Base URL of the REST backend, e.g. `https://api.martaba.shop/api`.
  pub api_base_url: String,
  /// Cloud name used to build image CDN URLs.
  pub cdn_cloud_name: String,
  pub api_timeout: Duration,
  /// Bearer token attached to API calls, if the session has one.
  pub api_token: Option<String>,

  pub quantity_throttle: Duration,
  pub search_debounce: Duration,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from any variable source.
  pub fn from_lookup<L>(lookup: L) -> Result<Self>
  where
    L: Fn(&str) -> Option<String>,
  {
    let required = |var_name: &str| {
      lookup(var_name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };
    let millis_or = |var_name: &str, default: u64| -> Result<Duration> {
      match lookup(var_name) {
        Some(raw) => raw
          .trim()
          .parse::<u64>()
          .map(Duration::from_millis)
          .map_err(|e| AppError::Config(format!("Invalid {}: {}", var_name, e))),
        None => Ok(Duration::from_millis(default)),
      }
    };

    let api_base_url = required("API_BASE_URL")?.trim_end_matches('/').to_string();
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
      return Err(AppError::Config(format!(
        "API_BASE_URL must be an http(s) URL, got '{}'",
        api_base_url
      )));
    }
    let cdn_cloud_name = required("CDN_CLOUD_NAME")?;

    let api_timeout = match lookup("API_TIMEOUT_SECS") {
      Some(raw) => Duration::from_secs(
        raw
          .trim()
          .parse::<u64>()
          .map_err(|e| AppError::Config(format!("Invalid API_TIMEOUT_SECS: {}", e)))?,
      ),
      None => Duration::from_secs(15),
    };
    let api_token = lookup("API_TOKEN").filter(|token| !token.is_empty());

    let quantity_throttle = millis_or("QUANTITY_THROTTLE_MS", 300)?;
    let search_debounce = millis_or("SEARCH_DEBOUNCE_MS", 400)?;

    tracing::info!("Application configuration loaded successfully.");
    // The API token is never logged.
    tracing::debug!(%api_base_url, %cdn_cloud_name, ?api_timeout, has_token = api_token.is_some(), "Loaded config details");

    Ok(Self {
      api_base_url,
      cdn_cloud_name,
      api_timeout,
      api_token,
      quantity_throttle,
      search_debounce,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| vars.get(name).cloned()
  }

  #[test]
  fn defaults_apply_when_optional_vars_are_missing() {
    let config = AppConfig::from_lookup(lookup_from(&[
      ("API_BASE_URL", "https://api.martaba.shop/api/"),
      ("CDN_CLOUD_NAME", "martaba"),
    ]))
    .unwrap();
    assert_eq!(config.api_base_url, "https://api.martaba.shop/api");
    assert_eq!(config.api_timeout, Duration::from_secs(15));
    assert_eq!(config.quantity_throttle, Duration::from_millis(300));
    assert_eq!(config.search_debounce, Duration::from_millis(400));
    assert!(config.api_token.is_none());
  }

  #[test]
  fn missing_or_invalid_values_are_config_errors() {
    let missing = AppConfig::from_lookup(lookup_from(&[("CDN_CLOUD_NAME", "martaba")]));
    assert!(matches!(missing, Err(AppError::Config(m)) if m.contains("API_BASE_URL")));

    let bad_scheme = AppConfig::from_lookup(lookup_from(&[
      ("API_BASE_URL", "ftp://nope"),
      ("CDN_CLOUD_NAME", "martaba"),
    ]));
    assert!(matches!(bad_scheme, Err(AppError::Config(_))));

    let bad_number = AppConfig::from_lookup(lookup_from(&[
      ("API_BASE_URL", "http://localhost:5000"),
      ("CDN_CLOUD_NAME", "martaba"),
      ("QUANTITY_THROTTLE_MS", "fast"),
    ]));
    assert!(matches!(bad_number, Err(AppError::Config(m)) if m.contains("QUANTITY_THROTTLE_MS")));
  }
}
