//! User-scoped demand endpoints.
//!
//! Every operation here is bound to the calling user: reads and writes
//! filter on ownership, so somebody else's demand id behaves exactly like
//! a missing one.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::db::{self, CreateDemandRequest, DemandResponse, UpdateDemandRequest};
use crate::AppState;

use super::auth::{AuthUser, MessageResponse};
use super::error::ApiError;
use super::validation::require_field;

/// Mutation response carrying the affected demand
#[derive(Debug, Serialize)]
pub struct DemandMessageResponse {
    pub msg: String,
    pub demand: DemandResponse,
}

/// Submit a new demand.
///
/// POST /api/demands
pub async fn create_demand(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(request): Json<CreateDemandRequest>,
) -> Result<Json<DemandMessageResponse>, ApiError> {
    let title = require_field(request.title.as_deref(), "title").map_err(ApiError::validation)?;
    let category =
        require_field(request.category.as_deref(), "category").map_err(ApiError::validation)?;
    let description = require_field(request.description.as_deref(), "description")
        .map_err(ApiError::validation)?;

    let contact_preference = request.contact_preference.as_deref().unwrap_or("email");
    let files = request.files.unwrap_or_default();

    let demand = db::insert_demand(
        &state.db,
        &claims.id,
        title,
        category,
        description,
        request.budget.as_deref(),
        request.deadline.as_deref(),
        contact_preference,
        &files,
    )
    .await?;

    tracing::info!(demand_id = %demand.id, user_id = %claims.id, "Demand created");

    Ok(Json(DemandMessageResponse {
        msg: "Demand created successfully".to_string(),
        demand: demand.into(),
    }))
}

/// The caller's demands, newest first.
///
/// GET /api/demands
pub async fn list_demands(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<DemandResponse>>, ApiError> {
    let demands = db::list_demands_for_owner(&state.db, &claims.id).await?;
    Ok(Json(demands.into_iter().map(DemandResponse::from).collect()))
}

/// A single demand, only if owned by the caller.
///
/// GET /api/demands/:id
pub async fn get_demand(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DemandResponse>, ApiError> {
    let demand = db::find_demand_owned(&state.db, &id, &claims.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Demand not found"))?;

    Ok(Json(demand.into()))
}

/// Partial update of an owned demand. Owner, status and timestamps are not
/// touchable through this route.
///
/// PUT /api/demands/:id
pub async fn update_demand(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateDemandRequest>,
) -> Result<Json<DemandMessageResponse>, ApiError> {
    let mut demand = db::find_demand_owned(&state.db, &id, &claims.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Demand not found"))?;

    // Required fields may be replaced but not blanked out
    if let Some(title) = request.title.as_deref() {
        demand.title = require_field(Some(title), "title")
            .map_err(ApiError::validation)?
            .to_string();
    }
    if let Some(category) = request.category.as_deref() {
        demand.category = require_field(Some(category), "category")
            .map_err(ApiError::validation)?
            .to_string();
    }
    if let Some(description) = request.description.as_deref() {
        demand.description = require_field(Some(description), "description")
            .map_err(ApiError::validation)?
            .to_string();
    }
    if let Some(budget) = request.budget {
        demand.budget = Some(budget);
    }
    if let Some(deadline) = request.deadline {
        demand.deadline = Some(deadline);
    }
    if let Some(contact_preference) = request.contact_preference {
        demand.contact_preference = contact_preference;
    }
    if let Some(files) = request.files {
        demand.files = serde_json::to_string(&files).unwrap_or_else(|_| "[]".to_string());
    }

    demand.updated_at = db::save_demand_fields(&state.db, &demand).await?;

    Ok(Json(DemandMessageResponse {
        msg: "Demand updated successfully".to_string(),
        demand: demand.into(),
    }))
}

/// Delete an owned demand.
///
/// DELETE /api/demands/:id
pub async fn delete_demand(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = db::delete_demand_owned(&state.db, &id, &claims.id).await?;
    if !deleted {
        return Err(ApiError::not_found("Demand not found"));
    }

    tracing::info!(demand_id = %id, user_id = %claims.id, "Demand deleted");

    Ok(Json(MessageResponse::new("Demand deleted successfully")))
}
