// tests/services_tests.rs
mod common;

use common::*;
use martaba_storefront::media::ImageUpload;
use martaba_storefront::models::{NewUser, Order, OrderStatus, UserUpdate};
use martaba_storefront::services::{
  FormValue, Method, OrderService, ProductQuery, ProductService, RequestBody, SubscriptionService, UserService,
};
use martaba_storefront::AppError;
use serde_json::json;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn list_products_builds_query_and_accepts_wrapped_lists() {
  setup_tracing();
  let transport = MockTransport::new();
  transport.respond_json(200, json!({ "data": [product_json("p1", 120.0), product_json("p2", 95.5)] }));
  let service = ProductService::new(api_client(&transport));

  let query = ProductQuery {
    category: Some("mattresses".into()),
    search: Some("  foam ".into()),
    page: Some(2),
    limit: None,
  };
  let products = service.list_products(&query).await.unwrap();

  assert_eq!(products.len(), 2);
  assert_eq!(products[1].price, 95.5);
  let request = transport.last_request();
  assert_eq!(request.method, Method::Get);
  assert_eq!(request.url.path(), "/api/products");
  let pairs: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
  assert_eq!(
    pairs,
    vec![
      ("category".to_string(), "mattresses".to_string()),
      ("search".to_string(), "foam".to_string()),
      ("page".to_string(), "2".to_string()),
    ]
  );
}

#[tokio::test]
#[serial]
async fn blank_search_is_not_sent() {
  setup_tracing();
  let transport = MockTransport::new();
  transport.respond_json(200, json!([product_json("p1", 120.0)]));
  let service = ProductService::new(api_client(&transport));

  let products = service.list_products(&ProductQuery::search("   ")).await.unwrap();

  assert_eq!(products.len(), 1);
  assert_eq!(transport.last_request().url.query(), None);
}

#[tokio::test]
#[serial]
async fn non_success_status_maps_to_api_error_with_backend_message() {
  setup_tracing();
  let transport = MockTransport::new();
  transport.respond_json(404, json!({ "message": "Product not found" }));
  transport.respond_text(500, "upstream exploded");
  transport.respond_text(503, "");
  let service = ProductService::new(api_client(&transport));

  match service.get_product("missing").await {
    Err(AppError::Api { status, message }) => {
      assert_eq!(status, 404);
      assert_eq!(message, "Product not found");
    }
    other => panic!("expected an API error, got {:?}", other),
  }
  match service.delete_product("p1").await {
    Err(AppError::Api { status, message }) => {
      assert_eq!(status, 500);
      assert_eq!(message, "upstream exploded");
    }
    other => panic!("expected an API error, got {:?}", other),
  }
  match service.delete_product("p1").await {
    Err(err) => {
      assert_eq!(err.status(), Some(503));
      assert!(err.to_string().contains("503"));
    }
    Ok(()) => panic!("503 must fail"),
  }
  assert_eq!(transport.last_request().method, Method::Delete);
  assert_eq!(transport.last_request().url.path(), "/api/products/p1");
}

#[tokio::test]
#[serial]
async fn malformed_body_is_a_serialization_error() {
  setup_tracing();
  let transport = MockTransport::new();
  transport.respond_text(200, "<html>not json</html>");
  let service = ProductService::new(api_client(&transport));

  assert!(matches!(service.get_product("p1").await, Err(AppError::Serialization(_))));
}

#[tokio::test]
#[serial]
async fn token_is_sent_as_bearer() {
  setup_tracing();
  let transport = MockTransport::new();
  let api = std::sync::Arc::new(martaba_storefront::services::ApiClient::new(BASE_URL, transport.clone()).with_token("s3cret"));
  let service = SubscriptionService::new(api);

  service.unsubscribe("sub-1").await.unwrap();

  let request = transport.last_request();
  assert_eq!(request.bearer_token.as_deref(), Some("s3cret"));
  assert_eq!(request.url.path(), "/api/subscriptions/sub-1");
}

#[tokio::test]
#[serial]
async fn orders_are_returned_newest_first() {
  setup_tracing();
  let transport = MockTransport::new();
  transport.respond_json(
    200,
    json!([
      { "_id": "o1", "createdAt": "2026-09-01T08:00:00Z", "status": "delivered", "totalAmount": 120 },
      { "_id": "o2", "createdAt": "2026-10-02T08:00:00Z", "status": "pending", "totalAmount": 230 },
      { "_id": "o3", "createdAt": "2026-09-15T08:00:00Z", "status": "shipped", "totalAmount": 95.5 }
    ]),
  );
  let service = OrderService::new(api_client(&transport));

  let orders = service.get_orders_by_user_id("u1").await.unwrap();

  let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
  assert_eq!(ids, vec!["o2", "o3", "o1"]);
  assert_eq!(transport.last_request().url.path(), "/api/orders/user/u1");
}

#[tokio::test]
#[serial]
async fn shipped_orders_cannot_be_cancelled() {
  setup_tracing();
  let transport = MockTransport::new();
  let service = OrderService::new(api_client(&transport));
  let order: Order = serde_json::from_value(json!({
    "_id": "o9", "createdAt": "2026-10-02T08:00:00Z", "status": "shipped", "totalAmount": 230
  }))
  .unwrap();

  assert!(matches!(service.cancel_order(&order).await, Err(AppError::Validation(_))));
  assert!(transport.requests().is_empty(), "nothing may be sent for a refused cancellation");

  let pending = Order {
    status: OrderStatus::Pending,
    ..order
  };
  service.cancel_order(&pending).await.unwrap();
  let request = transport.last_request();
  assert_eq!(request.method, Method::Delete);
  assert_eq!(request.url.path(), "/api/orders/o9");
}

#[tokio::test]
#[serial]
async fn subscribe_validates_email_before_sending() {
  setup_tracing();
  let transport = MockTransport::new();
  transport.respond_json(200, json!({ "_id": "s1", "email": "reader@example.com" }));
  let service = SubscriptionService::new(api_client(&transport));

  assert!(matches!(service.subscribe("not-an-email").await, Err(AppError::Validation(_))));
  assert!(transport.requests().is_empty());

  let subscription = service.subscribe("  reader@example.com ").await.unwrap();
  assert_eq!(subscription.id, "s1");
  let request = transport.last_request();
  assert_eq!(request.method, Method::Post);
  assert_eq!(request.body, RequestBody::Json(json!({ "email": "reader@example.com" })));
}

#[tokio::test]
#[serial]
async fn create_user_posts_json_without_empty_fields() {
  setup_tracing();
  let transport = MockTransport::new();
  transport.respond_json(200, json!({ "_id": "u1", "username": "salma", "email": "salma@example.com" }));
  let service = UserService::new(api_client(&transport));

  let user = service
    .create_user(&NewUser {
      username: "salma".into(),
      email: "salma@example.com".into(),
      password: "hunter22".into(),
      phone: None,
    })
    .await
    .unwrap();

  assert_eq!(user.id, "u1");
  assert!(!user.is_admin());
  assert_eq!(
    transport.last_request().body,
    RequestBody::Json(json!({ "username": "salma", "email": "salma@example.com", "password": "hunter22" }))
  );
}

#[tokio::test]
#[serial]
async fn empty_user_update_is_rejected_locally() {
  setup_tracing();
  let transport = MockTransport::new();
  let service = UserService::new(api_client(&transport));

  assert!(matches!(
    service.update_user(&UserUpdate::default()).await,
    Err(AppError::Validation(_))
  ));
  assert!(transport.requests().is_empty());
}

#[tokio::test]
#[serial]
async fn profile_picture_is_sent_with_the_updated_profile() {
  setup_tracing();
  let transport = MockTransport::new();
  transport.respond_json(
    200,
    json!({ "_id": "u1", "username": "salma", "email": "salma@example.com", "profilePicture": "users/u1" }),
  );
  let service = UserService::new(api_client(&transport));
  let image = ImageUpload::new("me.png", vec![7, 7, 7]).unwrap();
  let update = UserUpdate {
    phone: Some("0500000000".into()),
    ..UserUpdate::default()
  };

  let user = service.upload_profile_picture(&image, &update).await.unwrap();

  assert_eq!(user.profile_picture.as_deref(), Some("users/u1"));
  let request = transport.last_request();
  assert_eq!(request.url.path(), "/api/users/profile-picture");
  let fields = multipart_fields(&request);
  assert_eq!(fields.len(), 2);
  assert_eq!(fields[0].name, "image");
  assert!(matches!(&fields[0].value, FormValue::File { file_name, content_type, .. }
    if file_name == "me.png" && content_type == "image/png"));
  assert_eq!(text_field(&fields, "updatedUser"), Some(r#"{"phone":"0500000000"}"#));
}

#[tokio::test]
#[serial]
async fn availability_checks_accept_both_answer_shapes() {
  setup_tracing();
  let transport = MockTransport::new();
  transport.respond_json(200, json!({ "available": false }));
  transport.respond_json(200, json!({ "isAvailable": true }));
  let service = UserService::new(api_client(&transport));

  assert!(!service.check_username("salma").await.unwrap());
  assert!(service.check_email("new@example.com").await.unwrap());
  let requests = transport.requests();
  assert_eq!(requests[0].url.path(), "/api/users/check-username");
  assert_eq!(requests[1].body, RequestBody::Json(json!({ "email": "new@example.com" })));
}

#[tokio::test]
#[serial]
async fn expired_token_verifies_as_invalid() {
  setup_tracing();
  let transport = MockTransport::new();
  transport.respond_json(200, json!({ "valid": true, "user": { "_id": "u1", "username": "salma", "email": "s@example.com", "role": "admin" } }));
  transport.respond_json(401, json!({ "message": "jwt expired" }));
  transport.respond_json(500, json!({ "error": "db down" }));
  let service = UserService::new(api_client(&transport));

  let verified = service.verify_token().await.unwrap();
  assert!(verified.valid);
  assert!(verified.user.unwrap().is_admin());

  let expired = service.verify_token().await.unwrap();
  assert!(!expired.valid);
  assert!(expired.user.is_none());

  match service.verify_token().await {
    Err(AppError::Api { status: 500, message }) => assert_eq!(message, "db down"),
    other => panic!("expected a 500 API error, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn ids_are_escaped_as_single_path_segments() {
  setup_tracing();
  let transport = MockTransport::new();
  transport.respond_json(200, product_json("p1", 120.0));
  let products = ProductService::new(api_client(&transport));
  let users = UserService::new(api_client(&transport));

  products.get_product("a/b?x=1#y").await.unwrap();
  let request = transport.last_request();
  assert_eq!(request.url.path(), "/api/products/a%2Fb%3Fx=1%23y");
  assert_eq!(request.url.query(), None);
  assert_eq!(request.url.fragment(), None);

  users.delete_user("../orders").await.unwrap();
  assert_eq!(transport.last_request().url.path(), "/api/users/..%2Forders");
}
