//! Health endpoint integration test.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_health_reports_ok_and_database_connected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"], "connected");
}
