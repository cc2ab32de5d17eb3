// martaba_storefront/src/media/mod.rs

//! Image files picked in forms and the preview URLs shown for them.

pub mod preview;
pub mod upload;

pub use preview::{ImagePreviews, PreviewHandle, PreviewRegistry};
pub use upload::ImageUpload;
