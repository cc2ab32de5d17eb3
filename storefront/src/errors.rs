// martaba_storefront/src/errors.rs

use martaba::MartabaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("HTTP Transport Error: {0}")]
  Http(#[from] reqwest::Error),

  // Non-2xx answer from the REST backend.
  #[error("API Error ({status}): {message}")]
  Api { status: u16, message: String },

  #[error("Serialization Error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("I/O Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Cart Error: {source}")]
  Cart {
    #[from]
    source: MartabaError,
  },

  #[error("Internal Error: {0}")]
  Internal(String), // For miscellaneous errors
}

impl AppError {
  /// Text suitable for a toast notification.
  ///
  /// Transport details stay in the logs; the user gets a short message.
  pub fn user_message(&self) -> String {
    match self {
      AppError::Validation(m) => m.clone(),
      AppError::Api { status: 401, .. } | AppError::Api { status: 403, .. } => {
        "Your session has expired. Please sign in again.".to_string()
      }
      AppError::Api { status: 404, message } => format!("Not found: {}", message),
      AppError::Api { status, message } if *status < 500 => message.clone(),
      AppError::Api { .. } => "The server is having trouble right now. Please try again later.".to_string(),
      AppError::Http(_) => "Could not reach the server. Check your connection and try again.".to_string(),
      AppError::Config(_) | AppError::Serialization(_) | AppError::Io(_) | AppError::Cart { .. } | AppError::Internal(_) => {
        "Something went wrong. Please try again.".to_string()
      }
    }
  }

  pub fn status(&self) -> Option<u16> {
    match self {
      AppError::Api { status, .. } => Some(*status),
      AppError::Http(e) => e.status().map(|s| s.as_u16()),
      _ => None,
    }
  }
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<AppError>() {
      Ok(app_err) => app_err,
      Err(err) => match err.downcast::<serde_json::Error>() {
        Ok(json_err) => AppError::Serialization(json_err),
        Err(err) => AppError::Internal(err.to_string()),
      },
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn user_messages_hide_server_details() {
    let server = AppError::Api {
      status: 500,
      message: "stack trace here".to_string(),
    };
    assert!(!server.user_message().contains("stack trace"));

    let conflict = AppError::Api {
      status: 409,
      message: "Username already taken".to_string(),
    };
    assert_eq!(conflict.user_message(), "Username already taken");
    assert_eq!(conflict.status(), Some(409));
  }

  #[test]
  fn anyhow_round_trip_keeps_variant() {
    let wrapped = anyhow::Error::new(AppError::Validation("price".to_string()));
    assert!(matches!(AppError::from(wrapped), AppError::Validation(m) if m == "price"));

    let other = anyhow::anyhow!("boom");
    assert!(matches!(AppError::from(other), AppError::Internal(m) if m == "boom"));
  }
}
