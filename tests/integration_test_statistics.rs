mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

async fn set_status(app: &TestApp, admin: &str, demand_id: &str, status: &str) {
    let response = app
        .request(
            "PATCH",
            &format!("/api/admin/demands/{}/status", demand_id),
            Some(admin),
            Some(json!({ "status": status })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_user_statistics_totals_match() {
    let app = TestApp::new().await;
    let (token, _) = app.register_and_login("Alice", "alice@example.com").await;
    let admin = app.admin_token().await;

    let d1 = app.create_demand(&token, "One", "first").await;
    let d2 = app.create_demand(&token, "Two", "second").await;
    app.create_demand(&token, "Three", "third").await;

    set_status(&app, &admin, d1["id"].as_str().unwrap(), "terminee").await;
    set_status(&app, &admin, d2["id"].as_str().unwrap(), "annulee").await;

    let response = app.request("GET", "/api/statistics", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = parse_body(response).await;

    assert_eq!(stats["total"], 3);
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["inProgress"], 0);
    assert_eq!(stats["completed"], 1);
    assert_eq!(stats["cancelled"], 1);

    let sum = stats["pending"].as_i64().unwrap()
        + stats["inProgress"].as_i64().unwrap()
        + stats["completed"].as_i64().unwrap()
        + stats["cancelled"].as_i64().unwrap();
    assert_eq!(stats["total"].as_i64().unwrap(), sum);
}

#[tokio::test]
async fn test_user_statistics_are_scoped_to_caller() {
    let app = TestApp::new().await;
    let (token_a, _) = app.register_and_login("Alice", "alice@example.com").await;
    let (token_b, _) = app.register_and_login("Bob", "bob@example.com").await;

    app.create_demand(&token_a, "Alice 1", "x").await;
    app.create_demand(&token_a, "Alice 2", "x").await;
    app.create_demand(&token_b, "Bob 1", "x").await;

    let response = app.request("GET", "/api/statistics", Some(&token_a), None).await;
    assert_eq!(parse_body(response).await["total"], 2);

    let response = app.request("GET", "/api/statistics", Some(&token_b), None).await;
    assert_eq!(parse_body(response).await["total"], 1);
}

#[tokio::test]
async fn test_empty_statistics_are_zero() {
    let app = TestApp::new().await;
    let (token, _) = app.register_and_login("Alice", "alice@example.com").await;

    let response = app.request("GET", "/api/statistics", Some(&token), None).await;
    let stats = parse_body(response).await;
    assert_eq!(stats["total"], 0);
    assert_eq!(stats["pending"], 0);
}

#[tokio::test]
async fn test_admin_statistics_cover_all_users() {
    let app = TestApp::new().await;
    let (token_a, _) = app.register_and_login("Alice", "alice@example.com").await;
    let (token_b, _) = app.register_and_login("Bob", "bob@example.com").await;
    let admin = app.admin_token().await;

    let d1 = app.create_demand(&token_a, "One", "x").await;
    app.create_demand(&token_a, "Two", "x").await;
    app.create_demand(&token_b, "Three", "x").await;

    set_status(&app, &admin, d1["id"].as_str().unwrap(), "en-cours").await;

    let response = app
        .request("GET", "/api/admin/statistics", Some(&admin), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = parse_body(response).await;

    assert_eq!(stats["totalDemands"], 3);
    // the bootstrap admin does not count as a user
    assert_eq!(stats["totalUsers"], 2);
    assert_eq!(stats["pendingDemands"], 2);
    assert_eq!(stats["inProgressDemands"], 1);
    assert_eq!(stats["completedDemands"], 0);
    assert_eq!(stats["cancelledDemands"], 0);
    // everything was created just now, inside the 7-day window
    assert_eq!(stats["recentDemands"], 3);
}
