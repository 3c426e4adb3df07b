mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_create_and_fetch_round_trip() {
    let app = TestApp::new().await;
    let (token, user) = app.register_and_login("Alice", "alice@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/demands",
            Some(&token),
            Some(json!({
                "title": "Site web",
                "category": "web",
                "description": "Besoin d'un site",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = parse_body(response).await;
    assert_eq!(created["msg"], "Demand created successfully");
    let id = created["demand"]["id"].as_str().unwrap();

    let response = app
        .request("GET", &format!("/api/demands/{}", id), Some(&token), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let demand = parse_body(response).await;

    assert_eq!(demand["status"], "en-attente");
    assert_eq!(demand["title"], "Site web");
    assert_eq!(demand["category"], "web");
    assert_eq!(demand["description"], "Besoin d'un site");
    assert_eq!(demand["userId"], user["id"]);
    assert_eq!(demand["contactPreference"], "email");
    assert_eq!(demand["createdAt"], demand["updatedAt"]);
}

#[tokio::test]
async fn test_create_rejects_missing_fields() {
    let app = TestApp::new().await;
    let (token, _) = app.register_and_login("Alice", "alice@example.com").await;

    for payload in [
        json!({ "category": "web", "description": "d" }),
        json!({ "title": "t", "description": "d" }),
        json!({ "title": "t", "category": "web" }),
        json!({ "title": "", "category": "web", "description": "d" }),
    ] {
        let response = app
            .request("POST", "/api/demands", Some(&token), Some(payload))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_list_is_own_demands_newest_first() {
    let app = TestApp::new().await;
    let (token_a, _) = app.register_and_login("Alice", "alice@example.com").await;
    let (token_b, _) = app.register_and_login("Bob", "bob@example.com").await;

    app.create_demand(&token_a, "First", "older").await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    app.create_demand(&token_a, "Second", "newer").await;
    app.create_demand(&token_b, "Bobs", "not alice's").await;

    let response = app.request("GET", "/api/demands", Some(&token_a), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = parse_body(response).await;
    let items = list.as_array().unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "Second");
    assert_eq!(items[1]["title"], "First");
}

#[tokio::test]
async fn test_demands_are_invisible_across_owners() {
    let app = TestApp::new().await;
    let (token_a, _) = app.register_and_login("Alice", "alice@example.com").await;
    let (token_b, _) = app.register_and_login("Bob", "bob@example.com").await;

    let demand = app.create_demand(&token_b, "Bobs demand", "private").await;
    let id = demand["id"].as_str().unwrap();

    // read: not found, never forbidden
    let response = app
        .request("GET", &format!("/api/demands/{}", id), Some(&token_a), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // delete: same
    let response = app
        .request("DELETE", &format!("/api/demands/{}", id), Some(&token_a), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // the demand survived the foreign delete attempt
    let response = app
        .request("GET", &format!("/api/demands/{}", id), Some(&token_b), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_own_demand() {
    let app = TestApp::new().await;
    let (token, _) = app.register_and_login("Alice", "alice@example.com").await;

    let demand = app.create_demand(&token, "Site web", "Besoin d'un site").await;
    let id = demand["id"].as_str().unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    let response = app
        .request(
            "PUT",
            &format!("/api/demands/{}", id),
            Some(&token),
            Some(json!({ "title": "Site web v2", "budget": "1500" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = parse_body(response).await;

    assert_eq!(updated["demand"]["title"], "Site web v2");
    assert_eq!(updated["demand"]["budget"], "1500");
    // untouched fields survive
    assert_eq!(updated["demand"]["description"], "Besoin d'un site");
    assert_eq!(updated["demand"]["createdAt"], demand["createdAt"]);
    assert_ne!(updated["demand"]["updatedAt"], demand["updatedAt"]);
}

#[tokio::test]
async fn test_update_cannot_blank_required_or_touch_status() {
    let app = TestApp::new().await;
    let (token, _) = app.register_and_login("Alice", "alice@example.com").await;

    let demand = app.create_demand(&token, "Site web", "Besoin d'un site").await;
    let id = demand["id"].as_str().unwrap();

    let response = app
        .request(
            "PUT",
            &format!("/api/demands/{}", id),
            Some(&token),
            Some(json!({ "title": "   " })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // a status field in the body is ignored, not applied
    let response = app
        .request(
            "PUT",
            &format!("/api/demands/{}", id),
            Some(&token),
            Some(json!({ "status": "terminee", "budget": "100" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = parse_body(response).await;
    assert_eq!(updated["demand"]["status"], "en-attente");
}

#[tokio::test]
async fn test_update_missing_demand_is_not_found() {
    let app = TestApp::new().await;
    let (token, _) = app.register_and_login("Alice", "alice@example.com").await;

    let response = app
        .request(
            "PUT",
            "/api/demands/no-such-id",
            Some(&token),
            Some(json!({ "title": "x" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_own_demand() {
    let app = TestApp::new().await;
    let (token, _) = app.register_and_login("Alice", "alice@example.com").await;

    let demand = app.create_demand(&token, "Temporary", "delete me").await;
    let id = demand["id"].as_str().unwrap();

    let response = app
        .request("DELETE", &format!("/api/demands/{}", id), Some(&token), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["msg"], "Demand deleted successfully");

    let response = app
        .request("GET", &format!("/api/demands/{}", id), Some(&token), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_files_and_optional_fields_round_trip() {
    let app = TestApp::new().await;
    let (token, _) = app.register_and_login("Alice", "alice@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/demands",
            Some(&token),
            Some(json!({
                "title": "Flyer",
                "category": "print",
                "description": "Un flyer A5",
                "budget": "200",
                "deadline": "2026-09-01",
                "contactPreference": "phone",
                "files": ["brief.pdf", "logo.svg"],
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let demand = parse_body(response).await["demand"].clone();

    assert_eq!(demand["budget"], "200");
    assert_eq!(demand["deadline"], "2026-09-01");
    assert_eq!(demand["contactPreference"], "phone");
    assert_eq!(demand["files"], json!(["brief.pdf", "logo.svg"]));
}
