// Shared across the integration test binaries; not every helper is used by
// every binary.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use demandhub::{
    api::{auth::ensure_admin_user, create_router},
    config::Config,
    db,
    AppState,
};

pub const ADMIN_EMAIL: &str = "admin@test.local";
pub const ADMIN_PASSWORD: &str = "admin-secret";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    db_filename: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let pool = db::init_with_url(&db_url)
            .await
            .expect("Failed to init test db");

        let mut config = Config::default();
        config.auth.jwt_secret = "test-secret".to_string();
        config.auth.admin_email = ADMIN_EMAIL.to_string();
        config.auth.admin_password = ADMIN_PASSWORD.to_string();
        config.auth.admin_name = "Admin".to_string();

        ensure_admin_user(&pool, "Admin", ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .expect("Failed to create bootstrap admin");

        let state = Arc::new(AppState::new(config, pool));
        let router = create_router(state.clone());

        Self {
            router,
            state,
            db_filename,
        }
    }

    /// Fire a request against the router. `token` attaches a bearer header,
    /// `body` is sent as JSON.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Register a user account, panicking on failure.
    pub async fn register(&self, name: &str, email: &str, password: &str) {
        let response = self
            .request(
                "POST",
                "/api/register",
                None,
                Some(serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": password,
                })),
            )
            .await;
        if !response.status().is_success() {
            panic!("Registration failed in test helper: {}", response.status());
        }
    }

    /// Log in and return the session token plus the user snapshot.
    pub async fn login(&self, email: &str, password: &str) -> (String, Value) {
        let response = self
            .request(
                "POST",
                "/api/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        if !response.status().is_success() {
            panic!("Login failed in test helper: {}", response.status());
        }
        let body = parse_body(response).await;
        let token = body["token"].as_str().expect("No token in body").to_string();
        (token, body["user"].clone())
    }

    /// Register a fresh user and return their token plus snapshot.
    pub async fn register_and_login(&self, name: &str, email: &str) -> (String, Value) {
        self.register(name, email, "password123").await;
        self.login(email, "password123").await
    }

    /// Token for the bootstrap admin.
    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.0
    }

    /// Create a demand for the given token and return its JSON.
    pub async fn create_demand(&self, token: &str, title: &str, description: &str) -> Value {
        let response = self
            .request(
                "POST",
                "/api/demands",
                Some(token),
                Some(serde_json::json!({
                    "title": title,
                    "category": "web",
                    "description": description,
                })),
            )
            .await;
        if !response.status().is_success() {
            panic!("Demand creation failed in test helper: {}", response.status());
        }
        parse_body(response).await["demand"].clone()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        // WAL mode leaves sidecar files next to the database
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
