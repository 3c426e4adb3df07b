//! Statistics aggregation over demands and users.
//!
//! Pure read-side counts, recomputed on every call. Nothing here is
//! cached or persisted.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::demand::DemandStatus;

/// Window for the "recent demands" figure on the admin dashboard.
const RECENT_WINDOW_DAYS: i64 = 7;

/// Per-user demand counts by status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub cancelled: i64,
}

/// System-wide counts for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatistics {
    pub total_demands: i64,
    pub total_users: i64,
    pub pending_demands: i64,
    pub in_progress_demands: i64,
    pub completed_demands: i64,
    pub cancelled_demands: i64,
    pub recent_demands: i64,
}

#[derive(Debug, Default)]
struct StatusCounts {
    pending: i64,
    in_progress: i64,
    completed: i64,
    cancelled: i64,
}

impl StatusCounts {
    fn total(&self) -> i64 {
        self.pending + self.in_progress + self.completed + self.cancelled
    }

    fn from_rows(rows: Vec<(DemandStatus, i64)>) -> Self {
        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            match status {
                DemandStatus::EnAttente => counts.pending = count,
                DemandStatus::EnCours => counts.in_progress = count,
                DemandStatus::Terminee => counts.completed = count,
                DemandStatus::Annulee => counts.cancelled = count,
            }
        }
        counts
    }
}

/// Demand counts by status for a single owner.
pub async fn statistics_for_user(
    db: &SqlitePool,
    user_id: &str,
) -> Result<UserStatistics, sqlx::Error> {
    let rows: Vec<(DemandStatus, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM demands WHERE user_id = ? GROUP BY status")
            .bind(user_id)
            .fetch_all(db)
            .await?;

    let counts = StatusCounts::from_rows(rows);
    Ok(UserStatistics {
        total: counts.total(),
        pending: counts.pending,
        in_progress: counts.in_progress,
        completed: counts.completed,
        cancelled: counts.cancelled,
    })
}

/// System-wide counts: demands by status, user accounts, and demands
/// created within the last seven days.
pub async fn statistics_for_admin(db: &SqlitePool) -> Result<AdminStatistics, sqlx::Error> {
    let rows: Vec<(DemandStatus, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM demands GROUP BY status")
            .fetch_all(db)
            .await?;
    let counts = StatusCounts::from_rows(rows);

    let total_users = super::user::count_regular_users(db).await?;

    let cutoff = (chrono::Utc::now() - chrono::Duration::days(RECENT_WINDOW_DAYS)).to_rfc3339();
    let recent_demands: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM demands WHERE created_at >= ?")
            .bind(&cutoff)
            .fetch_one(db)
            .await?;

    Ok(AdminStatistics {
        total_demands: counts.total(),
        total_users,
        pending_demands: counts.pending,
        in_progress_demands: counts.in_progress,
        completed_demands: counts.completed,
        cancelled_demands: counts.cancelled,
        recent_demands,
    })
}
