//! HTTP-level integration tests for project CRUD.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_project, delete, get, post_json, put_json, register_user};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_project_classifies_initial_budget_status(pool: PgPool) {
    let (_, token) = register_user(&pool, "pm@example.com", "Manager").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/projects",
        serde_json::json!({
            "name": "Inter-school Tournament",
            "budget": "5000",
            "tags": ["cricket", "u19"],
        }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "Planning");
    assert_eq!(json["priority"], "Medium");
    assert_eq!(json["budget_status"], "Under Budget");
    assert_eq!(json["progress"].as_i64(), Some(0));

    // A zero-budget project starts exactly on budget.
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/projects",
        serde_json::json!({ "name": "Zero Budget" }),
        Some(&token),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["budget_status"], "On Budget");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_project_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/projects", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_and_list_projects(pool: PgPool) {
    let (_, token) = register_user(&pool, "list@example.com", "Team Member").await;
    let id = create_project(&pool, &token, "Visible", "0").await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/projects/{id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "Visible");

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/projects", Some(&token)).await;
    let json = body_json(response).await;
    let listed = json.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    // Listings carry the creator's display name.
    assert_eq!(listed[0]["created_by_name"], "Test Team Member");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_nonexistent_project_returns_404(pool: PgPool) {
    let (_, token) = register_user(&pool, "none@example.com", "Team Member").await;
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/projects/999999", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_project_and_validate_status(pool: PgPool) {
    let (_, token) = register_user(&pool, "upd@example.com", "Manager").await;
    let id = create_project(&pool, &token, "Original", "0").await;

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/projects/{id}"),
        serde_json::json!({ "name": "Renamed", "status": "Active" }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Renamed");
    assert_eq!(json["status"], "Active");

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/projects/{id}"),
        serde_json::json!({ "status": "Archived" }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_raising_budget_reclassifies_budget_status(pool: PgPool) {
    let (_, token) = register_user(&pool, "budget-upd@example.com", "Manager").await;
    let id = create_project(&pool, &token, "Reclass", "100").await;

    // Spend past the ceiling.
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/budget/expenses",
        serde_json::json!({
            "project_id": id,
            "description": "Nets",
            "amount": "150",
            "category": "Equipment",
            "expense_date": "2026-03-15",
        }),
        Some(&token),
    )
    .await;

    // Raising the ceiling above the spend flips the status back.
    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/projects/{id}"),
        serde_json::json!({ "budget": "200" }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["budget_status"], "Under Budget");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_requires_creator_or_management(pool: PgPool) {
    let (_, creator) = register_user(&pool, "creator@example.com", "Team Member").await;
    let (_, other) = register_user(&pool, "other@example.com", "Team Member").await;
    let (_, manager) = register_user(&pool, "mgr@example.com", "Manager").await;

    let id = create_project(&pool, &creator, "Guarded", "0").await;

    // Another team member cannot delete it.
    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/projects/{id}"), Some(&other)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A manager can.
    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/projects/{id}"), Some(&manager)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/projects/{id}"), Some(&creator)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
