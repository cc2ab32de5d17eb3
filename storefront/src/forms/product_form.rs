// martaba_storefront/src/forms/product_form.rs

//! Add/edit product form: raw field text, dynamic dimension/category/tag
//! sub-fields, selected images with previews, validation and the multipart
//! encoding the backend expects.

use crate::errors::{AppError, Result};
use crate::media::{ImagePreviews, ImageUpload, PreviewRegistry};
use crate::models::{Dimension, Product, Size};
use crate::services::{FormField, ProductService};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
  Create,
  Edit { product_id: String },
}

/// One row of the dimensions sub-form, as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionDraft {
  pub width: String,
  pub height: String,
  pub label: String,
  pub price: String,
  pub stock: String,
  pub is_available: bool,
}

impl Default for DimensionDraft {
  fn default() -> Self {
    Self {
      width: String::new(),
      height: String::new(),
      label: String::new(),
      price: String::new(),
      stock: String::new(),
      is_available: true,
    }
  }
}

/// Field path (`price`, `dimensions[1].width`, ...) → message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
  pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.entry(field.into()).or_insert_with(|| message.into());
  }

  pub fn get(&self, field: &str) -> Option<&str> {
    self.0.get(field).map(String::as_str)
  }

  pub fn contains(&self, field: &str) -> bool {
    self.0.contains_key(field)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }
}

impl fmt::Display for FormErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let joined: Vec<String> = self.0.iter().map(|(field, message)| format!("{}: {}", field, message)).collect();
    write!(f, "{}", joined.join("; "))
  }
}

impl From<FormErrors> for AppError {
  fn from(errors: FormErrors) -> Self {
    AppError::Validation(errors.to_string())
  }
}

/// Typed result of a successful validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
  pub name: String,
  pub description: String,
  pub price: f64,
  pub stock: u32,
  pub discount: f64,
  pub discount_end_date: Option<NaiveDate>,
  pub categories: Vec<String>,
  pub tags: Vec<String>,
  pub dimensions: Vec<Dimension>,
}

#[derive(Debug)]
pub struct ProductForm {
  pub mode: FormMode,
  pub name: String,
  pub description: String,
  pub price: String,
  pub stock: String,
  pub discount: String,
  /// `YYYY-MM-DD`, empty when there is no discount.
  pub discount_end_date: String,
  categories: Vec<String>,
  tags: Vec<String>,
  dimensions: Vec<DimensionDraft>,
  images: Vec<ImageUpload>,
  previews: ImagePreviews,
  existing_images: Vec<String>,
  // Discount and end date as loaded in edit mode.
  saved_discount: Option<(String, String)>,
}

impl ProductForm {
  pub fn new(registry: PreviewRegistry) -> Self {
    Self {
      mode: FormMode::Create,
      name: String::new(),
      description: String::new(),
      price: String::new(),
      stock: String::new(),
      discount: String::new(),
      discount_end_date: String::new(),
      categories: Vec::new(),
      tags: Vec::new(),
      dimensions: Vec::new(),
      images: Vec::new(),
      previews: ImagePreviews::new(registry),
      existing_images: Vec::new(),
      saved_discount: None,
    }
  }

  /// Pre-fills the form for editing `product`.
  pub fn from_product(product: &Product, registry: PreviewRegistry) -> Self {
    let mut form = Self::new(registry);
    form.mode = FormMode::Edit {
      product_id: product.id.clone(),
    };
    form.name = product.name.clone();
    form.description = product.description.clone();
    form.price = product.price.to_string();
    form.stock = product.stock.to_string();
    if product.discount > 0.0 {
      form.discount = product.discount.to_string();
      form.discount_end_date = product
        .discount_end_date
        .map(|end| end.date_naive().format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    }
    form.saved_discount = Some((form.discount.clone(), form.discount_end_date.clone()));
    form.categories = product.categories.clone();
    form.tags = product.tags.clone();
    form.dimensions = product
      .dimensions
      .iter()
      .map(|d| DimensionDraft {
        width: d.size.width.to_string(),
        height: d.size.height.to_string(),
        label: d.size.label.clone(),
        price: d.price.to_string(),
        stock: d.stock.to_string(),
        is_available: d.is_available,
      })
      .collect();
    form.existing_images = product.images.clone();
    form
  }

  // --- Dimensions ---

  /// Appends an empty row and returns its index.
  pub fn add_dimension(&mut self) -> usize {
    self.dimensions.push(DimensionDraft::default());
    self.dimensions.len() - 1
  }

  pub fn remove_dimension(&mut self, index: usize) -> bool {
    if index < self.dimensions.len() {
      self.dimensions.remove(index);
      true
    } else {
      false
    }
  }

  pub fn update_dimension<F>(&mut self, index: usize, edit: F) -> bool
  where
    F: FnOnce(&mut DimensionDraft),
  {
    match self.dimensions.get_mut(index) {
      Some(draft) => {
        edit(draft);
        true
      }
      None => false,
    }
  }

  pub fn dimensions(&self) -> &[DimensionDraft] {
    &self.dimensions
  }

  // --- Categories / tags ---

  pub fn add_category(&mut self, category: &str) -> bool {
    push_unique(&mut self.categories, category)
  }

  pub fn remove_category(&mut self, category: &str) -> bool {
    remove_value(&mut self.categories, category)
  }

  pub fn categories(&self) -> &[String] {
    &self.categories
  }

  pub fn add_tag(&mut self, tag: &str) -> bool {
    push_unique(&mut self.tags, tag)
  }

  pub fn remove_tag(&mut self, tag: &str) -> bool {
    remove_value(&mut self.tags, tag)
  }

  pub fn tags(&self) -> &[String] {
    &self.tags
  }

  // --- Images ---

  /// Adds newly selected files and returns their preview URLs.
  pub fn add_images(&mut self, files: Vec<ImageUpload>) -> Vec<String> {
    let urls = self.previews.select(&files);
    self.images.extend(files);
    urls
  }

  /// Drops a newly selected file and revokes its preview.
  pub fn remove_image(&mut self, index: usize) -> bool {
    if index < self.images.len() {
      self.images.remove(index);
      self.previews.remove(index);
      true
    } else {
      false
    }
  }

  /// Drops an image the product already had (edit mode).
  pub fn remove_existing_image(&mut self, image: &str) -> bool {
    remove_value(&mut self.existing_images, image)
  }

  pub fn preview_urls(&self) -> Vec<&str> {
    self.previews.urls()
  }

  pub fn images(&self) -> &[ImageUpload] {
    &self.images
  }

  pub fn existing_images(&self) -> &[String] {
    &self.existing_images
  }

  /// Resets the form after a successful create; previews are revoked.
  pub fn reset(&mut self) {
    self.mode = FormMode::Create;
    for text in [
      &mut self.name,
      &mut self.description,
      &mut self.price,
      &mut self.stock,
      &mut self.discount,
      &mut self.discount_end_date,
    ] {
      text.clear();
    }
    self.categories.clear();
    self.tags.clear();
    self.dimensions.clear();
    self.images.clear();
    self.previews.clear();
    self.existing_images.clear();
    self.saved_discount = None;
  }

  // --- Validation / encoding ---

  /// Edit mode with discount and end date exactly as loaded. An already
  /// expired discount may then be saved back untouched.
  fn discount_unchanged(&self) -> bool {
    match &self.saved_discount {
      Some((discount, end)) => discount == &self.discount && end == &self.discount_end_date,
      None => false,
    }
  }

  pub fn validate(&self, now: DateTime<Utc>) -> std::result::Result<ProductDraft, FormErrors> {
    let mut errors = FormErrors::default();

    let name = self.name.trim().to_string();
    if name.is_empty() {
      errors.insert("name", "Name is required.");
    }

    let price = match parse_number(&self.price) {
      Some(price) if price > 0.0 => price,
      Some(_) => {
        errors.insert("price", "Price must be greater than zero.");
        0.0
      }
      None => {
        errors.insert("price", "Price must be a number.");
        0.0
      }
    };

    let stock = parse_count(&self.stock).unwrap_or_else(|| {
      errors.insert("stock", "Stock must be a whole number of zero or more.");
      0
    });

    let discount = if self.discount.trim().is_empty() {
      0.0
    } else {
      match parse_number(&self.discount) {
        Some(discount) if (0.0..=100.0).contains(&discount) => discount,
        _ => {
          errors.insert("discount", "Discount must be between 0 and 100.");
          0.0
        }
      }
    };

    // Without a discount the end date is meaningless and never sent.
    let discount_end_date = if discount <= 0.0 {
      None
    } else if self.discount_end_date.trim().is_empty() {
      errors.insert("discountEndDate", "A discount needs an end date.");
      None
    } else {
      match NaiveDate::parse_from_str(self.discount_end_date.trim(), "%Y-%m-%d") {
        Ok(date) if date > now.date_naive() || self.discount_unchanged() => Some(date),
        Ok(_) => {
          errors.insert("discountEndDate", "The discount end date must be in the future.");
          None
        }
        Err(_) => {
          errors.insert("discountEndDate", "Use the YYYY-MM-DD format.");
          None
        }
      }
    };

    if self.categories.is_empty() {
      errors.insert("categories", "Pick at least one category.");
    }

    let mut dimensions = Vec::with_capacity(self.dimensions.len());
    let mut seen_labels: Vec<String> = Vec::new();
    for (i, draft) in self.dimensions.iter().enumerate() {
      let field = |name: &str| format!("dimensions[{}].{}", i, name);
      let width = positive(&draft.width).unwrap_or_else(|| {
        errors.insert(field("width"), "Width must be greater than zero.");
        0.0
      });
      let height = positive(&draft.height).unwrap_or_else(|| {
        errors.insert(field("height"), "Height must be greater than zero.");
        0.0
      });
      let dimension_price = positive(&draft.price).unwrap_or_else(|| {
        errors.insert(field("price"), "Price must be greater than zero.");
        0.0
      });
      let dimension_stock = parse_count(&draft.stock).unwrap_or_else(|| {
        errors.insert(field("stock"), "Stock must be a whole number of zero or more.");
        0
      });
      let label = draft.label.trim().to_string();
      let label_key = if label.is_empty() {
        format!("{}x{}", width, height)
      } else {
        label.to_lowercase()
      };
      if seen_labels.contains(&label_key) {
        errors.insert(field("label"), "Each dimension must be unique.");
      }
      seen_labels.push(label_key);

      dimensions.push(Dimension {
        size: Size { width, height, label },
        price: dimension_price,
        stock: dimension_stock,
        is_available: draft.is_available,
      });
    }

    let image_count = match self.mode {
      FormMode::Create => self.images.len(),
      FormMode::Edit { .. } => self.images.len() + self.existing_images.len(),
    };
    if image_count == 0 {
      errors.insert("images", "Add at least one image.");
    }

    if !errors.is_empty() {
      debug!(error_count = errors.len(), "Product form validation failed.");
      return Err(errors);
    }

    Ok(ProductDraft {
      name,
      description: self.description.trim().to_string(),
      price,
      stock,
      discount,
      discount_end_date,
      categories: self.categories.clone(),
      tags: self.tags.clone(),
      dimensions,
    })
  }

  /// Validates, then encodes the form the way `POST/PATCH /products` expect.
  pub fn to_multipart(&self, now: DateTime<Utc>) -> std::result::Result<Vec<FormField>, FormErrors> {
    let draft = self.validate(now)?;
    let mut fields = vec![
      FormField::text("name", &draft.name),
      FormField::text("description", &draft.description),
      FormField::text("price", draft.price),
      FormField::text("stock", draft.stock),
      FormField::text("discount", draft.discount),
    ];
    if let Some(end) = draft.discount_end_date {
      fields.push(FormField::text("discountEndDate", end.format("%Y-%m-%d")));
    }
    fields.extend(draft.categories.iter().map(|c| FormField::text("categories[]", c)));
    fields.extend(draft.tags.iter().map(|t| FormField::text("tags[]", t)));

    for (i, dimension) in draft.dimensions.iter().enumerate() {
      let key = |suffix: &str| format!("dimensions[{}]{}", i, suffix);
      fields.push(FormField::text(key("[size][width]"), dimension.size.width));
      fields.push(FormField::text(key("[size][height]"), dimension.size.height));
      fields.push(FormField::text(key("[size][label]"), &dimension.size.label));
      fields.push(FormField::text(key("[price]"), dimension.price));
      fields.push(FormField::text(key("[stock]"), dimension.stock));
      fields.push(FormField::text(key("[isAvailable]"), dimension.is_available));
    }

    if let FormMode::Edit { .. } = self.mode {
      fields.extend(self.existing_images.iter().map(|url| FormField::text("existingImages[]", url)));
    }
    fields.extend(self.images.iter().map(|image| FormField {
      name: "images".to_string(),
      value: image.to_form_value(),
    }));
    Ok(fields)
  }

  /// Validates and sends the form; create or update depending on the mode.
  #[instrument(name = "ProductForm::submit", skip_all, fields(mode = ?self.mode), err(Display))]
  pub async fn submit(&self, service: &ProductService, now: DateTime<Utc>) -> Result<Product> {
    let fields = self.to_multipart(now)?;
    match &self.mode {
      FormMode::Create => service.create_product(fields).await,
      FormMode::Edit { product_id } => service.update_product(product_id, fields).await,
    }
  }
}

fn parse_number(raw: &str) -> Option<f64> {
  raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn positive(raw: &str) -> Option<f64> {
  parse_number(raw).filter(|n| *n > 0.0)
}

fn parse_count(raw: &str) -> Option<u32> {
  raw.trim().parse::<u32>().ok()
}

fn push_unique(values: &mut Vec<String>, value: &str) -> bool {
  let value = value.trim();
  if value.is_empty() || values.iter().any(|v| v.eq_ignore_ascii_case(value)) {
    return false;
  }
  values.push(value.to_string());
  true
}

fn remove_value(values: &mut Vec<String>, value: &str) -> bool {
  let before = values.len();
  values.retain(|v| v != value);
  before != values.len()
}
