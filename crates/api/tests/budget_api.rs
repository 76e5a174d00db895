//! HTTP-level integration tests for the expense ledger.
//!
//! Covers the derived-state invariants: `actual_cost` always equals the
//! sum of current expense amounts, and `budget_status` always matches the
//! budget/actual comparison after every mutation.

mod common;

use std::str::FromStr;

use axum::http::StatusCode;
use common::{body_json, create_project, delete, get, patch_json, post_json, put_json, register_user};
use rust_decimal::Decimal;
use sqlx::PgPool;

/// Fetch a project's (actual_cost, budget_status) through the API.
async fn ledger_state(pool: &PgPool, token: &str, project_id: i64) -> (Decimal, String) {
    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/projects/{project_id}"), Some(token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let actual = Decimal::from_str(json["actual_cost"].as_str().unwrap()).unwrap();
    let status = json["budget_status"].as_str().unwrap().to_string();
    (actual, status)
}

/// Record an expense through the API, returning its id.
async fn record_expense(pool: &PgPool, token: &str, project_id: i64, amount: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/budget/expenses",
        serde_json::json!({
            "project_id": project_id,
            "description": "Match day logistics",
            "amount": amount,
            "category": "Travel",
            "expense_date": "2026-03-15",
        }),
        Some(token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_record_remove_walks_budget_status_through_all_three_states(pool: PgPool) {
    let (_, token) = register_user(&pool, "ledger@example.com", "Manager").await;
    let project_id = create_project(&pool, &token, "Stadium Upgrade", "1000").await;

    // Fresh project with a positive budget starts under it.
    let (actual, status) = ledger_state(&pool, &token, project_id).await;
    assert_eq!(actual, Decimal::ZERO);
    assert_eq!(status, "Under Budget");

    // Spend exactly the budget.
    record_expense(&pool, &token, project_id, "1000").await;
    let (actual, status) = ledger_state(&pool, &token, project_id).await;
    assert_eq!(actual, Decimal::from(1000));
    assert_eq!(status, "On Budget");

    // One more unit tips it over.
    let second = record_expense(&pool, &token, project_id, "1").await;
    let (actual, status) = ledger_state(&pool, &token, project_id).await;
    assert_eq!(actual, Decimal::from(1001));
    assert_eq!(status, "Over Budget");

    // Removing the second expense restores the exact-fill state.
    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/budget/expenses/{second}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let (actual, status) = ledger_state(&pool, &token, project_id).await;
    assert_eq!(actual, Decimal::from(1000));
    assert_eq!(status, "On Budget");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_revise_applies_delta_not_absolute_amount(pool: PgPool) {
    let (_, token) = register_user(&pool, "revise@example.com", "Manager").await;
    let project_id = create_project(&pool, &token, "Training Camp", "2000").await;

    let first = record_expense(&pool, &token, project_id, "200").await;
    record_expense(&pool, &token, project_id, "300").await;
    let (actual, _) = ledger_state(&pool, &token, project_id).await;
    assert_eq!(actual, Decimal::from(500));

    // 200 -> 50 is a -150 delta; actual_cost must land on 350, not 50.
    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/budget/expenses/{first}"),
        serde_json::json!({
            "description": "Match day logistics",
            "amount": "50",
            "category": "Travel",
            "expense_date": "2026-03-15",
        }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let (actual, status) = ledger_state(&pool, &token, project_id).await;
    assert_eq!(actual, Decimal::from(350));
    assert_eq!(status, "Under Budget");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_expense_validation_rejects_bad_input(pool: PgPool) {
    let (_, token) = register_user(&pool, "validate@example.com", "Team Member").await;
    let project_id = create_project(&pool, &token, "Validation", "100").await;

    // Non-positive amount.
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/budget/expenses",
        serde_json::json!({
            "project_id": project_id,
            "description": "Free kit",
            "amount": "0",
            "category": "Equipment",
            "expense_date": "2026-03-15",
        }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Blank description.
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/budget/expenses",
        serde_json::json!({
            "project_id": project_id,
            "description": "",
            "amount": "10",
            "category": "Equipment",
            "expense_date": "2026-03-15",
        }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Rejected submissions must not touch the ledger.
    let (actual, _) = ledger_state(&pool, &token, project_id).await;
    assert_eq!(actual, Decimal::ZERO);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_expense_against_unknown_project_is_404(pool: PgPool) {
    let (_, token) = register_user(&pool, "ghost@example.com", "Team Member").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/budget/expenses",
        serde_json::json!({
            "project_id": 999_999,
            "description": "Phantom",
            "amount": "10",
            "category": "Other",
            "expense_date": "2026-03-15",
        }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_revise_unknown_expense_is_404(pool: PgPool) {
    let (_, token) = register_user(&pool, "revise404@example.com", "Team Member").await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        "/api/v1/budget/expenses/424242",
        serde_json::json!({
            "description": "Nothing",
            "amount": "10",
            "category": "Other",
            "expense_date": "2026-03-15",
        }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_approval_is_a_flag_only_and_manager_gated(pool: PgPool) {
    let (_, manager) = register_user(&pool, "boss@example.com", "Manager").await;
    let (_, member) = register_user(&pool, "member@example.com", "Team Member").await;
    let project_id = create_project(&pool, &manager, "Approvals", "1000").await;
    let expense = record_expense(&pool, &member, project_id, "250").await;

    // Team members cannot approve.
    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/v1/budget/expenses/{expense}/approve"),
        serde_json::json!({ "approved": true }),
        Some(&member),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Managers can.
    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/v1/budget/expenses/{expense}/approve"),
        serde_json::json!({ "approved": true }),
        Some(&manager),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["approved"], true);
    assert!(json["approved_by"].is_number());
    assert!(json["approved_at"].is_string());

    // Approval never moves the ledger.
    let (actual, _) = ledger_state(&pool, &manager, project_id).await;
    assert_eq!(actual, Decimal::from(250));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_actual_cost_equals_sum_of_current_expenses(pool: PgPool) {
    let (_, token) = register_user(&pool, "sum@example.com", "Manager").await;
    let project_id = create_project(&pool, &token, "Sum Invariant", "10000").await;

    let a = record_expense(&pool, &token, project_id, "100.50").await;
    record_expense(&pool, &token, project_id, "200.25").await;
    let c = record_expense(&pool, &token, project_id, "49.25").await;

    let (actual, _) = ledger_state(&pool, &token, project_id).await;
    assert_eq!(actual, Decimal::from_str("350.00").unwrap());

    // Revise one, remove another; the sum must track exactly.
    let app = common::build_test_app(pool.clone());
    put_json(
        app,
        &format!("/api/v1/budget/expenses/{a}"),
        serde_json::json!({
            "description": "Match day logistics",
            "amount": "120.50",
            "category": "Travel",
            "expense_date": "2026-03-15",
        }),
        Some(&token),
    )
    .await;
    let app = common::build_test_app(pool.clone());
    delete(app, &format!("/api/v1/budget/expenses/{c}"), Some(&token)).await;

    let (actual, _) = ledger_state(&pool, &token, project_id).await;
    assert_eq!(actual, Decimal::from_str("320.75").unwrap());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_overview_reports_remaining_budget_and_splits(pool: PgPool) {
    let (_, token) = register_user(&pool, "overview@example.com", "Manager").await;
    let project_id = create_project(&pool, &token, "Overview", "1000").await;
    let expense = record_expense(&pool, &token, project_id, "400").await;
    record_expense(&pool, &token, project_id, "100").await;

    let app = common::build_test_app(pool.clone());
    patch_json(
        app,
        &format!("/api/v1/budget/expenses/{expense}/approve"),
        serde_json::json!({ "approved": true }),
        Some(&token),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = get(
        app,
        &format!("/api/v1/budget/projects/{project_id}"),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let remaining =
        Decimal::from_str(json["project"]["remaining_budget"].as_str().unwrap()).unwrap();
    assert_eq!(remaining, Decimal::from(500));
    assert_eq!(json["budget_comparison"]["total_expenses"].as_i64(), Some(2));
    assert_eq!(json["budget_comparison"]["approved_count"].as_i64(), Some(1));
    assert_eq!(json["recent_expenses"].as_array().unwrap().len(), 2);
}
