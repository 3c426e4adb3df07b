//! Statistics endpoints for both dashboards.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::db::{self, AdminStatistics, UserStatistics};
use crate::AppState;

use super::auth::{AdminUser, AuthUser};
use super::error::ApiError;

/// Demand counts by status for the calling user.
///
/// GET /api/statistics
pub async fn user_statistics(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserStatistics>, ApiError> {
    let stats = db::statistics_for_user(&state.db, &claims.id).await?;
    Ok(Json(stats))
}

/// System-wide counts for the admin dashboard.
///
/// GET /api/admin/statistics
pub async fn admin_statistics(
    State(state): State<Arc<AppState>>,
    AdminUser(_claims): AdminUser,
) -> Result<Json<AdminStatistics>, ApiError> {
    let stats = db::statistics_for_admin(&state.db).await?;
    Ok(Json(stats))
}
