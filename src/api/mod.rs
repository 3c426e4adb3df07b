mod admin;
pub mod auth;
mod demands;
pub mod error;
mod statistics;
mod validation;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Routes for any authenticated user (auth enforced by extractors)
    let user_routes = Router::new()
        .route("/profile", get(auth::profile))
        .route("/demands", post(demands::create_demand))
        .route("/demands", get(demands::list_demands))
        .route("/demands/:id", get(demands::get_demand))
        .route("/demands/:id", put(demands::update_demand))
        .route("/demands/:id", delete(demands::delete_demand))
        .route("/statistics", get(statistics::user_statistics));

    // Admin-only routes
    let admin_routes = Router::new()
        .route("/demands", get(admin::list_all_demands))
        .route("/demands/:id", get(admin::get_any_demand))
        .route("/demands/:id/status", patch(admin::update_demand_status))
        .route("/users", get(admin::list_users))
        .route("/statistics", get(statistics::admin_statistics));

    let api_routes = public_routes
        .merge(user_routes)
        .nest("/admin", admin_routes);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
