#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use evendiona_api::auth::credentials::AdminCredentials;
use evendiona_api::auth::jwt::JwtConfig;
use evendiona_api::config::ServerConfig;
use evendiona_api::router::build_app_router;
use evendiona_api::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret-long-enough";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct-pw";

/// Build a test `ServerConfig` with the fixed admin pair `admin/correct-pw`.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig::new(TEST_SECRET).expect("test secret is non-empty"),
        admin: AdminCredentials::new(ADMIN_USERNAME, ADMIN_PASSWORD)
            .expect("test credentials are non-empty"),
    }
}

/// Build the full application router, middleware included.
pub fn build_test_app() -> Router {
    build_app_router(AppState::new(test_config())).expect("test router should build")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_with_header(app: Router, uri: &str, value: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(AUTHORIZATION, value)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: String) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
