//! Shared harness for HTTP-level integration tests.
//!
//! Uses Axum's `tower::ServiceExt` to send requests directly to the
//! router without an actual TCP listener. The router is built through the
//! same [`build_app_router`] the production binary uses, so tests
//! exercise the full middleware stack.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use khelo_api::auth::jwt::JwtConfig;
use khelo_api::config::ServerConfig;
use khelo_api::router::build_app_router;
use khelo_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: std::env::temp_dir()
            .join("khelo-test-uploads")
            .to_string_lossy()
            .into_owned(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            token_expiry_hours: 24,
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool. Email notifications are disabled.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: None,
    };
    build_app_router(state, &config)
}

/// Send a request, optionally with a bearer token and JSON body.
async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, "GET", uri, token, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    send(app, "POST", uri, token, Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    send(app, "PUT", uri, token, Some(body)).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    send(app, "PATCH", uri, token, Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, "DELETE", uri, token, None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user through the API, returning their id and bearer token.
pub async fn register_user(pool: &PgPool, email: &str, role: &str) -> (i64, String) {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/users/register",
        serde_json::json!({
            "name": format!("Test {role}"),
            "email": email,
            "password": "hunter2-long-enough",
            "role": role,
        }),
        None,
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = body_json(response).await;
    (
        json["user"]["id"].as_i64().unwrap(),
        json["token"].as_str().unwrap().to_string(),
    )
}

/// Create a project through the API, returning its id.
pub async fn create_project(pool: &PgPool, token: &str, name: &str, budget: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/projects",
        serde_json::json!({ "name": name, "budget": budget }),
        Some(token),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
