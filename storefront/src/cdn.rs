// martaba_storefront/src/cdn.rs

//! Image CDN URL templating:
//! `https://res.cloudinary.com/<cloud>/image/upload/<k>_<v>,.../<public_id>`.

use std::fmt;

pub const CDN_HOST: &str = "https://res.cloudinary.com";

/// Factory bound to one cloud name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cdn {
  cloud_name: String,
}

impl Cdn {
  pub fn new(cloud_name: impl Into<String>) -> Self {
    Self {
      cloud_name: cloud_name.into(),
    }
  }

  pub fn image(&self, public_id: impl Into<String>) -> CdnImage {
    CdnImage::new(self.cloud_name.clone(), public_id)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdnImage {
  cloud_name: String,
  public_id: String,
  params: Vec<(String, String)>,
}

impl CdnImage {
  pub fn new(cloud_name: impl Into<String>, public_id: impl Into<String>) -> Self {
    Self {
      cloud_name: cloud_name.into(),
      public_id: public_id.into(),
      params: Vec::new(),
    }
  }

  /// Adds a transformation parameter. Setting a key twice keeps its first
  /// position and the latest value.
  pub fn param(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
    let key = key.into();
    let value = value.to_string();
    match self.params.iter_mut().find(|(k, _)| *k == key) {
      Some(existing) => existing.1 = value,
      None => self.params.push((key, value)),
    }
    self
  }

  pub fn width(self, width: u32) -> Self {
    self.param("w", width)
  }

  pub fn height(self, height: u32) -> Self {
    self.param("h", height)
  }

  pub fn crop(self, mode: &str) -> Self {
    self.param("c", mode)
  }

  pub fn quality(self, quality: &str) -> Self {
    self.param("q", quality)
  }

  pub fn format(self, format: &str) -> Self {
    self.param("f", format)
  }

  pub fn thumbnail(self) -> Self {
    self.width(150).height(150).crop("fill").quality("auto")
  }

  pub fn card(self) -> Self {
    self.width(400).quality("auto").format("auto")
  }

  pub fn hero(self) -> Self {
    self.width(1600).quality("auto").format("auto")
  }

  /// The delivery URL. Public ids that already are absolute URLs (legacy
  /// images) are returned untouched.
  pub fn url(&self) -> String {
    if self.public_id.starts_with("http://") || self.public_id.starts_with("https://") {
      return self.public_id.clone();
    }
    let public_id = self.public_id.trim_start_matches('/');
    let base = format!("{}/{}/image/upload", CDN_HOST, self.cloud_name);
    if self.params.is_empty() {
      format!("{}/{}", base, public_id)
    } else {
      let transformation: Vec<String> = self.params.iter().map(|(k, v)| format!("{}_{}", k, v)).collect();
      format!("{}/{}/{}", base, transformation.join(","), public_id)
    }
  }
}

impl fmt::Display for CdnImage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.url())
  }
}
