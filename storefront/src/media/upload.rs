// martaba_storefront/src/media/upload.rs

use crate::errors::{AppError, Result};
use crate::services::FormValue;
use std::path::Path;

/// Largest image the backend accepts.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// An image file selected for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
  pub file_name: String,
  pub content_type: String,
  pub bytes: Vec<u8>,
}

impl ImageUpload {
  /// Builds an upload, inferring the content type from the file extension.
  pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
    let file_name = file_name.into();
    let content_type = content_type_for(&file_name)
      .ok_or_else(|| AppError::Validation(format!("'{}' is not a supported image type.", file_name)))?;
    if bytes.is_empty() {
      return Err(AppError::Validation(format!("'{}' is empty.", file_name)));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
      return Err(AppError::Validation(format!("'{}' is larger than 5 MB.", file_name)));
    }
    Ok(Self {
      file_name,
      content_type: content_type.to_string(),
      bytes,
    })
  }

  pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
      .file_name()
      .and_then(|name| name.to_str())
      .ok_or_else(|| AppError::Validation(format!("Invalid image path '{}'.", path.display())))?;
    Self::new(file_name, bytes)
  }

  pub fn to_form_value(&self) -> FormValue {
    FormValue::File {
      file_name: self.file_name.clone(),
      content_type: self.content_type.clone(),
      bytes: self.bytes.clone(),
    }
  }
}

fn content_type_for(file_name: &str) -> Option<&'static str> {
  let extension = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
  match extension.as_str() {
    "jpg" | "jpeg" => Some("image/jpeg"),
    "png" => Some("image/png"),
    "webp" => Some("image/webp"),
    "gif" => Some("image/gif"),
    "avif" => Some("image/avif"),
    _ => None,
  }
}
