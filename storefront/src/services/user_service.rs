// martaba_storefront/src/services/user_service.rs

use super::api_client::ApiClient;
use super::transport::{ApiRequest, FormField, FormValue, Method};
use crate::errors::{AppError, Result};
use crate::media::ImageUpload;
use crate::models::{ListResponse, NewUser, User, UserUpdate};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Answer of `GET /users/verify-token`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenVerification {
  #[serde(default = "default_valid")]
  pub valid: bool,
  #[serde(default)]
  pub user: Option<User>,
}

fn default_valid() -> bool {
  true
}

#[derive(Deserialize)]
struct Availability {
  #[serde(alias = "isAvailable")]
  available: bool,
}

#[derive(Debug, Clone)]
pub struct UserService {
  api: Arc<ApiClient>,
}

impl UserService {
  pub fn new(api: Arc<ApiClient>) -> Self {
    Self { api }
  }

  #[instrument(name = "user_service::list_users", skip(self), err(Display))]
  pub async fn list_users(&self) -> Result<Vec<User>> {
    Ok(self.api.send_json::<ListResponse<User>>(ApiRequest::get("/users")).await?.into_vec())
  }

  #[instrument(name = "user_service::create_user", skip_all, fields(username = %new_user.username), err(Display))]
  pub async fn create_user(&self, new_user: &NewUser) -> Result<User> {
    let user: User = self
      .api
      .send_json(ApiRequest::new(Method::Post, "/users").with_json(new_user)?)
      .await?;
    info!(user_id = %user.id, "User created.");
    Ok(user)
  }

  #[instrument(name = "user_service::update_user", skip(self), err(Display))]
  pub async fn update_user(&self, update: &UserUpdate) -> Result<User> {
    if update == &UserUpdate::default() {
      return Err(AppError::Validation("Nothing to update.".to_string()));
    }
    self
      .api
      .send_json(ApiRequest::new(Method::Patch, "/users").with_json(update)?)
      .await
  }

  #[instrument(name = "user_service::delete_user", skip(self), err(Display))]
  pub async fn delete_user(&self, user_id: &str) -> Result<()> {
    self.api.send_unit(ApiRequest::delete("/users").with_segment(user_id)).await
  }

  /// Uploads a new profile picture together with the profile fields being saved.
  #[instrument(name = "user_service::upload_profile_picture", skip_all, fields(file = %image.file_name), err(Display))]
  pub async fn upload_profile_picture(&self, image: &ImageUpload, updated_user: &UserUpdate) -> Result<User> {
    let fields = vec![
      FormField {
        name: "image".to_string(),
        value: image.to_form_value(),
      },
      FormField {
        name: "updatedUser".to_string(),
        value: FormValue::Text(serde_json::to_string(updated_user)?),
      },
    ];
    self
      .api
      .send_json(ApiRequest::new(Method::Post, "/users/profile-picture").with_multipart(fields))
      .await
  }

  #[instrument(name = "user_service::check_username", skip(self), err(Display))]
  pub async fn check_username(&self, username: &str) -> Result<bool> {
    let request = ApiRequest::new(Method::Post, "/users/check-username").with_json(&json!({ "username": username }))?;
    let availability: Availability = self.api.send_json(request).await?;
    debug!(available = availability.available, "Username availability checked.");
    Ok(availability.available)
  }

  #[instrument(name = "user_service::check_email", skip(self), err(Display))]
  pub async fn check_email(&self, email: &str) -> Result<bool> {
    let request = ApiRequest::new(Method::Post, "/users/check-email").with_json(&json!({ "email": email }))?;
    let availability: Availability = self.api.send_json(request).await?;
    Ok(availability.available)
  }

  /// A 401 answer means the stored token is no longer valid; that is reported
  /// as `valid: false`, not as an error.
  #[instrument(name = "user_service::verify_token", skip(self), err(Display))]
  pub async fn verify_token(&self) -> Result<TokenVerification> {
    match self.api.send_json::<TokenVerification>(ApiRequest::get("/users/verify-token")).await {
      Ok(verification) => Ok(verification),
      Err(AppError::Api { status: 401, .. }) => Ok(TokenVerification { valid: false, user: None }),
      Err(e) => Err(e),
    }
  }
}
