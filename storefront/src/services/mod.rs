// martaba_storefront/src/services/mod.rs

//! Thin wrappers over the REST backend, one service per resource.

pub mod api_client;
pub mod order_service;
pub mod product_service;
pub mod subscription_service;
pub mod transport;
pub mod user_service;

pub use api_client::ApiClient;
pub use order_service::OrderService;
pub use product_service::{ProductQuery, ProductService};
pub use subscription_service::SubscriptionService;
pub use transport::{ApiRequest, ApiResponse, FormField, FormValue, HttpRequest, Method, RequestBody, ReqwestTransport, Transport};
pub use user_service::{TokenVerification, UserService};
