// martaba_storefront/src/forms/mod.rs

//! Client-side form state and validation.

pub mod product_form;

pub use product_form::{DimensionDraft, FormErrors, FormMode, ProductDraft, ProductForm};

/// Cheap shape check run before an email ever reaches the backend.
pub fn is_plausible_email(email: &str) -> bool {
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.starts_with('.')
    && !domain.ends_with('.')
    && domain.contains('.')
    && !email.chars().any(char::is_whitespace)
    && !domain.contains('@')
}
