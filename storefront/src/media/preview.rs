// martaba_storefront/src/media/preview.rs

//! Object URLs for image previews.
//!
//! A preview URL is acquired when a file is selected and must be released when
//! the image is removed from the form or the form goes away. `PreviewHandle`
//! ties the release to ownership: dropping the handle revokes the URL.

use super::upload::ImageUpload;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};
use uuid::Uuid;

/// Issues and revokes `blob:` URLs and tracks the live ones.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
  live: Arc<Mutex<HashSet<String>>>,
}

impl PreviewRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn create_object_url(&self, upload: &ImageUpload) -> PreviewHandle {
    let url = format!("blob:martaba/{}", Uuid::new_v4());
    self.live.lock().insert(url.clone());
    trace!(%url, file = %upload.file_name, "Object URL created.");
    PreviewHandle {
      url,
      file_name: upload.file_name.clone(),
      registry: self.clone(),
    }
  }

  /// Returns `false` if the URL was not live (already revoked or unknown).
  pub fn revoke_object_url(&self, url: &str) -> bool {
    let revoked = self.live.lock().remove(url);
    if revoked {
      trace!(%url, "Object URL revoked.");
    }
    revoked
  }

  pub fn is_live(&self, url: &str) -> bool {
    self.live.lock().contains(url)
  }

  /// Number of URLs not yet revoked; a count that only grows is a leak.
  pub fn live_count(&self) -> usize {
    self.live.lock().len()
  }
}

/// Owns one live object URL.
#[derive(Debug)]
pub struct PreviewHandle {
  url: String,
  file_name: String,
  registry: PreviewRegistry,
}

impl PreviewHandle {
  pub fn url(&self) -> &str {
    &self.url
  }

  pub fn file_name(&self) -> &str {
    &self.file_name
  }

  /// Revokes the URL now instead of at drop.
  pub fn revoke(self) {
    drop(self);
  }
}

impl Drop for PreviewHandle {
  fn drop(&mut self) {
    self.registry.revoke_object_url(&self.url);
  }
}

/// The previews shown by one form, in selection order.
#[derive(Debug)]
pub struct ImagePreviews {
  registry: PreviewRegistry,
  handles: Vec<PreviewHandle>,
}

impl ImagePreviews {
  pub fn new(registry: PreviewRegistry) -> Self {
    Self {
      registry,
      handles: Vec::new(),
    }
  }

  /// Creates a preview per selected file and returns their URLs.
  pub fn select(&mut self, files: &[ImageUpload]) -> Vec<String> {
    let created: Vec<PreviewHandle> = files.iter().map(|file| self.registry.create_object_url(file)).collect();
    let urls = created.iter().map(|handle| handle.url().to_string()).collect();
    self.handles.extend(created);
    debug!(selected = files.len(), total = self.handles.len(), "Image previews created.");
    urls
  }

  /// Removes (and revokes) the preview at `index`.
  pub fn remove(&mut self, index: usize) -> bool {
    if index < self.handles.len() {
      self.handles.remove(index);
      true
    } else {
      false
    }
  }

  pub fn clear(&mut self) {
    self.handles.clear();
  }

  pub fn urls(&self) -> Vec<&str> {
    self.handles.iter().map(PreviewHandle::url).collect()
  }

  pub fn len(&self) -> usize {
    self.handles.len()
  }

  pub fn is_empty(&self) -> bool {
    self.handles.is_empty()
  }
}
