//! HTTP-level integration tests for milestones, tasks, and progress
//! recomputation.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_project, delete, get, post_json, put_json, register_user};
use sqlx::PgPool;

/// Create a task through the API, returning its id.
async fn create_task(pool: &PgPool, token: &str, project_id: i64, name: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/timeline/tasks",
        serde_json::json!({ "project_id": project_id, "name": name }),
        Some(token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Mark a task completed through the API.
async fn complete_task(pool: &PgPool, token: &str, task_id: i64, name: &str) {
    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/timeline/tasks/{task_id}"),
        serde_json::json!({
            "name": name,
            "status": "Completed",
            "priority": "Medium",
            "order_index": 0,
        }),
        Some(token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Fetch a project's stored progress through the API.
async fn project_progress(pool: &PgPool, token: &str, project_id: i64) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/projects/{project_id}"), Some(token)).await;
    body_json(response).await["progress"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_progress_tracks_task_completion(pool: PgPool) {
    let (_, token) = register_user(&pool, "progress@example.com", "Manager").await;
    let project_id = create_project(&pool, &token, "Progress", "0").await;

    // No tasks: progress is 0.
    assert_eq!(project_progress(&pool, &token, project_id).await, 0);

    let t1 = create_task(&pool, &token, project_id, "Book ground").await;
    let t2 = create_task(&pool, &token, project_id, "Order kits").await;
    let t3 = create_task(&pool, &token, project_id, "Hire referee").await;
    create_task(&pool, &token, project_id, "Print fixtures").await;

    // Task writes keep progress current without an explicit recompute.
    complete_task(&pool, &token, t1, "Book ground").await;
    complete_task(&pool, &token, t2, "Order kits").await;
    complete_task(&pool, &token, t3, "Hire referee").await;
    assert_eq!(project_progress(&pool, &token, project_id).await, 75);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_explicit_update_progress_returns_snapshot(pool: PgPool) {
    let (_, token) = register_user(&pool, "snapshot@example.com", "Manager").await;
    let project_id = create_project(&pool, &token, "Snapshot", "0").await;

    let t1 = create_task(&pool, &token, project_id, "One").await;
    create_task(&pool, &token, project_id, "Two").await;
    complete_task(&pool, &token, t1, "One").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/timeline/projects/{project_id}/update-progress"),
        serde_json::json!({}),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["progress"].as_i64(), Some(50));
    assert_eq!(json["total_tasks"].as_i64(), Some(2));
    assert_eq!(json["completed_tasks"].as_i64(), Some(1));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_progress_on_unknown_project_is_404(pool: PgPool) {
    let (_, token) = register_user(&pool, "missing@example.com", "Manager").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/timeline/projects/999999/update-progress",
        serde_json::json!({}),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_deleting_a_task_refreshes_progress(pool: PgPool) {
    let (_, token) = register_user(&pool, "taskdel@example.com", "Manager").await;
    let project_id = create_project(&pool, &token, "Task Delete", "0").await;

    let t1 = create_task(&pool, &token, project_id, "Done one").await;
    let t2 = create_task(&pool, &token, project_id, "Open one").await;
    complete_task(&pool, &token, t1, "Done one").await;
    assert_eq!(project_progress(&pool, &token, project_id).await, 50);

    // Removing the open task leaves 1/1 completed.
    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/timeline/tasks/{t2}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(project_progress(&pool, &token, project_id).await, 100);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_task_rejects_non_canonical_status(pool: PgPool) {
    let (_, token) = register_user(&pool, "canon@example.com", "Manager").await;
    let project_id = create_project(&pool, &token, "Canonical", "0").await;
    let task = create_task(&pool, &token, project_id, "Status check").await;

    // Legacy vocabulary is not accepted on writes.
    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/timeline/tasks/{task}"),
        serde_json::json!({
            "name": "Status check",
            "status": "Done",
            "priority": "Medium",
            "order_index": 0,
        }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_milestone_crud_and_timeline_grouping(pool: PgPool) {
    let (_, token) = register_user(&pool, "timeline@example.com", "Manager").await;
    let project_id = create_project(&pool, &token, "Season Plan", "0").await;

    // Milestone with one attached task and one loose task.
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/timeline/milestones",
        serde_json::json!({
            "project_id": project_id,
            "name": "Pre-season",
            "due_date": "2026-04-01",
        }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let milestone_id = body_json(response).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/timeline/tasks",
        serde_json::json!({
            "project_id": project_id,
            "milestone_id": milestone_id,
            "name": "Fitness tests",
        }),
        Some(&token),
    )
    .await;
    create_task(&pool, &token, project_id, "Loose end").await;

    let app = common::build_test_app(pool.clone());
    let response = get(
        app,
        &format!("/api/v1/timeline/projects/{project_id}"),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let milestones = json["milestones"].as_array().unwrap();
    assert_eq!(milestones.len(), 1);
    assert_eq!(milestones[0]["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(json["unassigned_tasks"].as_array().unwrap().len(), 1);

    // Milestone update with an unknown status is rejected.
    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/timeline/milestones/{milestone_id}"),
        serde_json::json!({
            "name": "Pre-season",
            "due_date": "2026-04-01",
            "status": "Started",
            "order_index": 0,
        }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_task_dependencies_add_and_remove(pool: PgPool) {
    let (_, token) = register_user(&pool, "deps@example.com", "Manager").await;
    let project_id = create_project(&pool, &token, "Deps", "0").await;
    let first = create_task(&pool, &token, project_id, "First").await;
    let second = create_task(&pool, &token, project_id, "Second").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/timeline/tasks/{second}/dependencies"),
        serde_json::json!({ "depends_on_task_id": first }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["dependency_type"], "Finish-to-Start");
    let dependency_id = json["id"].as_i64().unwrap();

    // The same pair again violates the unique constraint.
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/timeline/tasks/{second}/dependencies"),
        serde_json::json!({ "depends_on_task_id": first }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let app = common::build_test_app(pool.clone());
    let response = delete(
        app,
        &format!("/api/v1/timeline/tasks/{second}/dependencies/{dependency_id}"),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
