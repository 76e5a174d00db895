//! HTTP-level integration tests for registration, login, and profile.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, register_user};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_returns_token_and_user(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/users/register",
        serde_json::json!({
            "name": "Asha Rao",
            "email": "asha@example.com",
            "password": "a-strong-password",
        }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["user"]["email"], "asha@example.com");
    // Role defaults to Team Member.
    assert_eq!(json["user"]["role"], "Team Member");
    assert!(json["token"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_email_conflicts(pool: PgPool) {
    register_user(&pool, "dup@example.com", "Team Member").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/users/register",
        serde_json::json!({
            "name": "Dup",
            "email": "dup@example.com",
            "password": "another-password",
        }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_rejects_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/users/register",
        serde_json::json!({
            "name": "Shorty",
            "email": "short@example.com",
            "password": "abc",
        }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_rejects_unknown_role(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/users/register",
        serde_json::json!({
            "name": "Rolf",
            "email": "rolf@example.com",
            "password": "long-enough-password",
            "role": "Superuser",
        }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_succeeds_with_correct_credentials(pool: PgPool) {
    register_user(&pool, "login@example.com", "Manager").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/users/login",
        serde_json::json!({
            "email": "login@example.com",
            "password": "hunter2-long-enough",
        }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["role"], "Manager");
    assert!(json["token"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_rejects_wrong_password(pool: PgPool) {
    register_user(&pool, "wrongpw@example.com", "Team Member").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/users/login",
        serde_json::json!({
            "email": "wrongpw@example.com",
            "password": "not-the-password",
        }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_profile_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/users/profile", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_profile_returns_current_user(pool: PgPool) {
    let (user_id, token) = register_user(&pool, "me@example.com", "Team Member").await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/users/profile", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["user"]["id"].as_i64().unwrap(), user_id);
    assert_eq!(json["user"]["email"], "me@example.com");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_garbage_token_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/users/profile", Some("not-a-jwt")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
