//! End-to-end checks that bootstrap the backend the way `serve` does:
//! configuration, database, seeder, then the router.

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use marketplace_config::AppConfig;
use marketplace_gateway::{create_router, GatewayState};
use marketplace_runtime::BackendServices;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    config: AppConfig,
    _db_dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let db_dir = TempDir::new().expect("create temp dir");
        let db_path = db_dir.path().join("marketplace-test.db");

        let mut config = AppConfig::default();
        config.database.url = format!("sqlite://{}", db_path.to_string_lossy());
        config.database.max_connections = 5;

        let services = BackendServices::initialise(&config)
            .await
            .expect("initialise backend services");

        Self {
            router: create_router(GatewayState::new(services.db_pool.clone())),
            config,
            _db_dir: db_dir,
        }
    }

    async fn restart(&mut self) {
        let services = BackendServices::initialise(&self.config)
            .await
            .expect("reinitialise backend services");
        self.router = create_router(GatewayState::new(services.db_pool.clone()));
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = match body {
            Some(json_body) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json_body).expect("serialize request body"))
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("router response");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn list(&self, uri: &str) -> Vec<Value> {
        let (status, body) = self.request(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "GET {uri}: {body}");
        body.as_array().cloned().expect("list response")
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn startup_seeds_one_college_three_products_and_one_seller() {
    let app = TestApp::new().await;

    let colleges = app.list("/api/colleges").await;
    assert_eq!(colleges.len(), 1);
    assert_eq!(colleges[0]["name"], "Default University");
    assert_eq!(colleges[0]["domain"], "default.edu");

    let users = app.list("/api/users").await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "seller@default.edu");

    let products = app.list("/api/products").await;
    assert_eq!(products.len(), 3);
    for product in &products {
        assert_eq!(product["seller_id"], users[0]["id"]);
        assert_eq!(product["college_id"], colleges[0]["id"]);
        assert_eq!(product["status"], "available");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn restarting_does_not_duplicate_seed_data() {
    let mut app = TestApp::new().await;

    app.restart().await;

    assert_eq!(app.list("/api/colleges").await.len(), 1);
    assert_eq!(app.list("/api/users").await.len(), 1);
    assert_eq!(app.list("/api/products").await.len(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn marketplace_flow_from_signup_to_accepted_request() {
    let app = TestApp::new().await;

    let (status, buyer) = app
        .request(
            Method::POST,
            "/api/users",
            Some(json!({ "name": "Sam", "email": "sam@default.edu", "year": "2026" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(buyer["college"]["domain"], "default.edu");
    let buyer_id = buyer["id"].as_str().unwrap().to_string();

    let products = app.list("/api/products").await;
    let product = &products[0];
    let product_id = product["id"].as_str().unwrap().to_string();
    let seller_id = product["seller_id"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/favorites/{product_id}"),
            Some(json!({ "user_id": buyer_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, chat) = app
        .request(
            Method::POST,
            "/api/chats",
            Some(json!({ "product_id": product_id, "participants": [buyer_id, seller_id] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let chat_id = chat["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/chats/{chat_id}/messages"),
            Some(json!({ "from_id": buyer_id, "text": "Is this still available?" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, request) = app
        .request(
            Method::POST,
            "/api/requests",
            Some(json!({ "product_id": product_id, "buyer_id": buyer_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request["seller_id"], seller_id.as_str());
    let request_id = request["id"].as_str().unwrap().to_string();

    let (status, accepted) = app
        .request(
            Method::PUT,
            &format!("/api/requests/{request_id}"),
            Some(json!({ "status": "accepted" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["status"], "accepted");

    let mut sold = product.clone();
    sold["status"] = json!("sold");
    let (status, updated) = app
        .request(Method::PUT, &format!("/api/products/{product_id}"), Some(sold))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "sold");

    let available = app.list("/api/products?status=available").await;
    assert_eq!(available.len(), 2);

    let inbox = app.list(&format!("/api/chats?user_id={seller_id}")).await;
    assert_eq!(inbox.len(), 1);

    let (status, detail) = app
        .request(Method::GET, &format!("/api/chats/{chat_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["messages"][0]["text"], "Is this still available?");
}

#[tokio::test(flavor = "multi_thread")]
async fn health_endpoint_is_served_outside_api_prefix() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _) = app.request(Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
