//! HTTP-level integration tests for the allocation capacity guard.
//!
//! The capacity rule is cross-project: a user's allocation percentages
//! are summed over every project, and no successful call may push the
//! total past 100.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_project, delete, post_json, put_json, register_user};
use sqlx::PgPool;

/// Allocate through the API, returning the raw response.
async fn allocate(
    pool: &PgPool,
    token: &str,
    project_id: i64,
    user_id: i64,
    percentage: i64,
) -> axum::response::Response {
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/resources/projects/allocations",
        serde_json::json!({
            "project_id": project_id,
            "user_id": user_id,
            "role": "Coach",
            "allocation_percentage": percentage,
            "start_date": "2026-03-01",
            "end_date": "2026-06-30",
        }),
        Some(token),
    )
    .await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_capacity_ceiling_rejects_then_accepts_exact_fill(pool: PgPool) {
    let (_, manager) = register_user(&pool, "alloc-mgr@example.com", "Manager").await;
    let (user_id, _) = register_user(&pool, "coach@example.com", "Team Member").await;
    let project_a = create_project(&pool, &manager, "Project A", "0").await;
    let project_b = create_project(&pool, &manager, "Project B", "0").await;

    // 60% on project A.
    let response = allocate(&pool, &manager, project_a, user_id, 60).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // 50% more would total 110% -> rejected, no state change.
    let response = allocate(&pool, &manager, project_b, user_id, 50).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CAPACITY_EXCEEDED");
    assert!(json["error"].as_str().unwrap().contains("Current: 60%"));

    // 40% lands exactly on the ceiling.
    let response = allocate(&pool, &manager, project_b, user_id, 40).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_allocation_for_project_and_user_conflicts(pool: PgPool) {
    let (_, manager) = register_user(&pool, "dup-mgr@example.com", "Manager").await;
    let (user_id, _) = register_user(&pool, "dup-coach@example.com", "Team Member").await;
    let project = create_project(&pool, &manager, "Dup", "0").await;

    let response = allocate(&pool, &manager, project, user_id, 30).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = allocate(&pool, &manager, project, user_id, 10).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_deallocate_frees_capacity_exactly(pool: PgPool) {
    let (_, manager) = register_user(&pool, "free-mgr@example.com", "Manager").await;
    let (user_id, _) = register_user(&pool, "free-coach@example.com", "Team Member").await;
    let project_a = create_project(&pool, &manager, "Free A", "0").await;
    let project_b = create_project(&pool, &manager, "Free B", "0").await;

    let response = allocate(&pool, &manager, project_a, user_id, 60).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let allocation_id = body_json(response).await["id"].as_i64().unwrap();

    let response = allocate(&pool, &manager, project_b, user_id, 60).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Remove the first allocation; the same 60% is allocatable again.
    let app = common::build_test_app(pool.clone());
    let response = delete(
        app,
        &format!("/api/v1/resources/projects/allocations/{allocation_id}"),
        Some(&manager),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = allocate(&pool, &manager, project_b, user_id, 60).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_reallocate_excludes_own_row_from_the_total(pool: PgPool) {
    let (_, manager) = register_user(&pool, "re-mgr@example.com", "Manager").await;
    let (user_id, _) = register_user(&pool, "re-coach@example.com", "Team Member").await;
    let project_a = create_project(&pool, &manager, "Re A", "0").await;
    let project_b = create_project(&pool, &manager, "Re B", "0").await;

    let response = allocate(&pool, &manager, project_a, user_id, 60).await;
    let allocation_a = body_json(response).await["id"].as_i64().unwrap();
    allocate(&pool, &manager, project_b, user_id, 40).await;

    // Raising A to 70 would make 40 + 70 = 110 -> rejected.
    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/resources/projects/allocations/{allocation_a}"),
        serde_json::json!({
            "role": "Coach",
            "allocation_percentage": 70,
            "start_date": "2026-03-01",
            "end_date": "2026-06-30",
        }),
        Some(&manager),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Lowering A to 50 is fine (40 + 50 = 90); its own 60 is excluded.
    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/resources/projects/allocations/{allocation_a}"),
        serde_json::json!({
            "role": "Coach",
            "allocation_percentage": 50,
            "start_date": "2026-03-01",
            "end_date": "2026-06-30",
        }),
        Some(&manager),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["allocation_percentage"].as_i64(), Some(50));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_percentage_out_of_range_is_rejected(pool: PgPool) {
    let (_, manager) = register_user(&pool, "range-mgr@example.com", "Manager").await;
    let (user_id, _) = register_user(&pool, "range-coach@example.com", "Team Member").await;
    let project = create_project(&pool, &manager, "Range", "0").await;

    let response = allocate(&pool, &manager, project, user_id, 101).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = allocate(&pool, &manager, project, user_id, -1).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_deallocate_unknown_allocation_is_404(pool: PgPool) {
    let (_, manager) = register_user(&pool, "404-mgr@example.com", "Manager").await;

    let app = common::build_test_app(pool);
    let response = delete(
        app,
        "/api/v1/resources/projects/allocations/999999",
        Some(&manager),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_capacity_report_tracks_availability(pool: PgPool) {
    let (_, manager) = register_user(&pool, "cap-mgr@example.com", "Manager").await;
    let (user_id, _) = register_user(&pool, "cap-coach@example.com", "Team Member").await;
    let project = create_project(&pool, &manager, "Cap", "0").await;
    allocate(&pool, &manager, project, user_id, 75).await;

    let app = common::build_test_app(pool.clone());
    let response = common::get(app, "/api/v1/resources/capacity", Some(&manager)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let availability = json["resource_availability"].as_array().unwrap();
    let coach = availability
        .iter()
        .find(|row| row["id"].as_i64() == Some(user_id))
        .expect("allocated user should appear in the availability report");
    assert_eq!(coach["total_allocation"].as_i64(), Some(75));
    assert_eq!(coach["available_capacity"].as_i64(), Some(25));
}
