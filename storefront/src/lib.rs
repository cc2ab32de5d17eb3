// martaba_storefront/src/lib.rs

//! The Martaba storefront client: configuration, REST services, models, the
//! product form and the session state that ties them to the cart engine.

pub mod cdn;
pub mod config;
pub mod errors;
pub mod forms;
pub mod media;
pub mod models;
pub mod notify;
pub mod search;
pub mod services;
pub mod state;

pub use crate::config::AppConfig;
pub use crate::errors::{AppError, Result};
pub use crate::state::AppState;
