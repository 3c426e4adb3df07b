//! Admin-only endpoints: triage across all demands and user oversight.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::db::{
    self, DemandListResponse, DemandQuery, DemandStatus, DemandWithOwner, UserResponse,
};
use crate::AppState;

use super::auth::AdminUser;
use super::error::ApiError;

/// Status-change response carrying the updated demand
#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub msg: String,
    pub demand: DemandWithOwner,
}

/// List demands across all users with filtering, search and pagination.
///
/// Query parameters:
/// - status: exact status filter ("all" disables it)
/// - search: case-insensitive substring over title/description
/// - page: page number (1-indexed, defaults to 1)
/// - limit: items per page (defaults to 20, max 100)
///
/// GET /api/admin/demands
pub async fn list_all_demands(
    State(state): State<Arc<AppState>>,
    AdminUser(_claims): AdminUser,
    Query(query): Query<DemandQuery>,
) -> Result<Json<DemandListResponse>, ApiError> {
    let result = db::list_demands_admin(&state.db, &query).await?;
    Ok(Json(result))
}

/// Any demand by id, with owner identity expanded.
///
/// GET /api/admin/demands/:id
pub async fn get_any_demand(
    State(state): State<Arc<AppState>>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<DemandWithOwner>, ApiError> {
    let row = db::find_demand_with_owner(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Demand not found"))?;

    Ok(Json(row.into()))
}

/// Move a demand through its status lifecycle, optionally recording an
/// admin response note.
///
/// PATCH /api/admin/demands/:id/status
pub async fn update_demand_status(
    State(state): State<Arc<AppState>>,
    AdminUser(claims): AdminUser,
    Path(id): Path<String>,
    Json(request): Json<db::UpdateStatusRequest>,
) -> Result<Json<StatusUpdateResponse>, ApiError> {
    let next: DemandStatus = request
        .status
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| ApiError::validation("Invalid status"))?;

    let current = db::find_demand_with_owner(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Demand not found"))?;

    if !current.status.can_transition_to(next) {
        return Err(ApiError::invalid_transition(format!(
            "Cannot move a demand from {} to {}",
            current.status, next
        )));
    }

    db::update_demand_status(&state.db, &id, next, request.admin_response.as_deref()).await?;

    // Re-read so the response reflects the stored timestamps
    let updated = db::find_demand_with_owner(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Demand not found"))?;

    tracing::info!(
        demand_id = %id,
        admin_id = %claims.id,
        status = %next,
        "Demand status updated"
    );

    Ok(Json(StatusUpdateResponse {
        msg: "Status updated successfully".to_string(),
        demand: updated.into(),
    }))
}

/// All regular user accounts, newest first, without password hashes.
///
/// GET /api/admin/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AdminUser(_claims): AdminUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = db::list_regular_users(&state.db).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
