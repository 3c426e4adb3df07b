//! Demand (service request) models, status lifecycle and queries.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Lifecycle status of a demand.
///
/// `en-attente` is the initial state. Work moves forward to `en-cours`,
/// then ends in one of the terminal states `terminee` or `annulee`; both
/// terminals are also reachable directly from `en-attente`. Terminal states
/// accept no outgoing transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum DemandStatus {
    EnAttente,
    EnCours,
    Terminee,
    Annulee,
}

impl DemandStatus {
    pub const ALL: [DemandStatus; 4] = [
        DemandStatus::EnAttente,
        DemandStatus::EnCours,
        DemandStatus::Terminee,
        DemandStatus::Annulee,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, DemandStatus::Terminee | DemandStatus::Annulee)
    }

    /// Transition table. Re-asserting the current status is an allowed
    /// no-op so an admin retry stays idempotent.
    pub fn can_transition_to(self, next: DemandStatus) -> bool {
        if self == next {
            return true;
        }
        match self {
            DemandStatus::EnAttente => true,
            DemandStatus::EnCours => {
                matches!(next, DemandStatus::Terminee | DemandStatus::Annulee)
            }
            DemandStatus::Terminee | DemandStatus::Annulee => false,
        }
    }
}

impl std::fmt::Display for DemandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemandStatus::EnAttente => write!(f, "en-attente"),
            DemandStatus::EnCours => write!(f, "en-cours"),
            DemandStatus::Terminee => write!(f, "terminee"),
            DemandStatus::Annulee => write!(f, "annulee"),
        }
    }
}

impl std::str::FromStr for DemandStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en-attente" => Ok(DemandStatus::EnAttente),
            "en-cours" => Ok(DemandStatus::EnCours),
            "terminee" => Ok(DemandStatus::Terminee),
            "annulee" => Ok(DemandStatus::Annulee),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Demand {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub budget: Option<String>,
    pub deadline: Option<String>,
    pub contact_preference: String,
    pub status: DemandStatus,
    /// JSON array of opaque file references
    pub files: String,
    pub admin_response: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Demand {
    /// Parse file references from their JSON string form.
    pub fn file_refs(&self) -> Vec<String> {
        serde_json::from_str(&self.files).unwrap_or_default()
    }
}

/// Wire representation of a demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub budget: Option<String>,
    pub deadline: Option<String>,
    pub contact_preference: String,
    pub status: DemandStatus,
    pub files: Vec<String>,
    pub admin_response: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Demand> for DemandResponse {
    fn from(demand: Demand) -> Self {
        let files = demand.file_refs();
        Self {
            id: demand.id,
            user_id: demand.user_id,
            title: demand.title,
            category: demand.category,
            description: demand.description,
            budget: demand.budget,
            deadline: demand.deadline,
            contact_preference: demand.contact_preference,
            status: demand.status,
            files,
            admin_response: demand.admin_response,
            created_at: demand.created_at,
            updated_at: demand.updated_at,
        }
    }
}

/// Owner identity attached to a demand in admin views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Demand joined with its owner, for admin listings and detail views.
#[derive(Debug, Clone, FromRow)]
pub struct DemandOwnerRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub budget: Option<String>,
    pub deadline: Option<String>,
    pub contact_preference: String,
    pub status: DemandStatus,
    pub files: String,
    pub admin_response: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandWithOwner {
    #[serde(flatten)]
    pub demand: DemandResponse,
    pub owner: OwnerInfo,
}

impl From<DemandOwnerRow> for DemandWithOwner {
    fn from(row: DemandOwnerRow) -> Self {
        let owner = OwnerInfo {
            id: row.user_id.clone(),
            name: row.owner_name,
            email: row.owner_email,
            phone: row.owner_phone,
        };
        let files: Vec<String> = serde_json::from_str(&row.files).unwrap_or_default();
        Self {
            demand: DemandResponse {
                id: row.id,
                user_id: row.user_id,
                title: row.title,
                category: row.category,
                description: row.description,
                budget: row.budget,
                deadline: row.deadline,
                contact_preference: row.contact_preference,
                status: row.status,
                files,
                admin_response: row.admin_response,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            owner,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDemandRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub budget: Option<String>,
    pub deadline: Option<String>,
    pub contact_preference: Option<String>,
    pub files: Option<Vec<String>>,
}

/// Partial update of an owned demand. Owner, status and timestamps are not
/// assignable through this path.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDemandRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub budget: Option<String>,
    pub deadline: Option<String>,
    pub contact_preference: Option<String>,
    pub files: Option<Vec<String>>,
}

/// Admin status change. The status arrives as a raw string so an unknown
/// value surfaces as a validation failure instead of a deserialize reject.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
    pub admin_response: Option<String>,
}

/// Query parameters for the admin demand listing.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DemandQuery {
    /// Exact status filter; "all" (or absent) disables it
    pub status: Option<String>,
    /// Case-insensitive substring match over title and description
    pub search: Option<String>,
    /// Page number (1-indexed, defaults to 1)
    pub page: Option<i64>,
    /// Items per page (defaults to 20, max 100)
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandListResponse {
    pub demands: Vec<DemandWithOwner>,
    pub total: i64,
    pub total_pages: i64,
    pub current_page: i64,
}

const DEMAND_OWNER_SELECT: &str = "SELECT d.*, u.name AS owner_name, u.email AS owner_email, \
     u.phone AS owner_phone FROM demands d JOIN users u ON u.id = d.user_id";

pub async fn insert_demand(
    db: &SqlitePool,
    user_id: &str,
    title: &str,
    category: &str,
    description: &str,
    budget: Option<&str>,
    deadline: Option<&str>,
    contact_preference: &str,
    files: &[String],
) -> Result<Demand, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let files_json = serde_json::to_string(files).unwrap_or_else(|_| "[]".to_string());

    sqlx::query(
        "INSERT INTO demands (id, user_id, title, category, description, budget, deadline, \
         contact_preference, status, files, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(title)
    .bind(category)
    .bind(description)
    .bind(budget)
    .bind(deadline)
    .bind(contact_preference)
    .bind(DemandStatus::EnAttente)
    .bind(&files_json)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Demand {
        id,
        user_id: user_id.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        budget: budget.map(|s| s.to_string()),
        deadline: deadline.map(|s| s.to_string()),
        contact_preference: contact_preference.to_string(),
        status: DemandStatus::EnAttente,
        files: files_json,
        admin_response: None,
        created_at: now.clone(),
        updated_at: now,
    })
}

/// The caller's own demands, newest first.
pub async fn list_demands_for_owner(
    db: &SqlitePool,
    user_id: &str,
) -> Result<Vec<Demand>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM demands WHERE user_id = ? ORDER BY created_at DESC")
        .bind(user_id)
        .fetch_all(db)
        .await
}

/// Fetch a demand only when it belongs to the given owner. A non-owned id
/// is indistinguishable from an absent one.
pub async fn find_demand_owned(
    db: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<Option<Demand>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM demands WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
}

pub async fn find_demand_with_owner(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<DemandOwnerRow>, sqlx::Error> {
    let sql = format!("{} WHERE d.id = ?", DEMAND_OWNER_SELECT);
    sqlx::query_as(&sql).bind(id).fetch_optional(db).await
}

/// Escape LIKE wildcards in a user-supplied search term.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// List demands across all users with filtering and pagination.
pub async fn list_demands_admin(
    db: &SqlitePool,
    query: &DemandQuery,
) -> Result<DemandListResponse, sqlx::Error> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * limit;

    // Build dynamic WHERE clause
    let mut conditions = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    if let Some(status) = query.status.as_deref() {
        if status != "all" {
            conditions.push("d.status = ?".to_string());
            bindings.push(status.to_string());
        }
    }

    if let Some(search) = query.search.as_deref() {
        if !search.is_empty() {
            conditions.push(
                "(LOWER(d.title) LIKE '%' || ? || '%' ESCAPE '\\' \
                 OR LOWER(d.description) LIKE '%' || ? || '%' ESCAPE '\\')"
                    .to_string(),
            );
            let needle = escape_like(&search.to_lowercase());
            bindings.push(needle.clone());
            bindings.push(needle);
        }
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!(
        "SELECT COUNT(*) FROM demands d {}",
        where_clause
    );
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for binding in &bindings {
        count_query = count_query.bind(binding);
    }
    let total = count_query.fetch_one(db).await?;

    let sql = format!(
        "{} {} ORDER BY d.created_at DESC LIMIT ? OFFSET ?",
        DEMAND_OWNER_SELECT, where_clause
    );
    let mut rows_query = sqlx::query_as::<_, DemandOwnerRow>(&sql);
    for binding in &bindings {
        rows_query = rows_query.bind(binding);
    }
    rows_query = rows_query.bind(limit).bind(offset);
    let rows = rows_query.fetch_all(db).await?;

    let total_pages = (total as f64 / limit as f64).ceil() as i64;

    Ok(DemandListResponse {
        demands: rows.into_iter().map(DemandWithOwner::from).collect(),
        total,
        total_pages,
        current_page: page,
    })
}

/// Persist the owner-editable columns of a demand and bump `updated_at`.
pub async fn save_demand_fields(db: &SqlitePool, demand: &Demand) -> Result<String, sqlx::Error> {
    let now = chrono::Utc::now().to_rfc3339();
    sqlx::query(
        "UPDATE demands SET title = ?, category = ?, description = ?, budget = ?, deadline = ?, \
         contact_preference = ?, files = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&demand.title)
    .bind(&demand.category)
    .bind(&demand.description)
    .bind(&demand.budget)
    .bind(&demand.deadline)
    .bind(&demand.contact_preference)
    .bind(&demand.files)
    .bind(&now)
    .bind(&demand.id)
    .execute(db)
    .await?;
    Ok(now)
}

/// Set a demand's status (and optionally the admin response note), bumping
/// `updated_at`. Transition legality is the caller's responsibility.
pub async fn update_demand_status(
    db: &SqlitePool,
    id: &str,
    status: DemandStatus,
    admin_response: Option<&str>,
) -> Result<(), sqlx::Error> {
    let now = chrono::Utc::now().to_rfc3339();
    match admin_response {
        Some(note) => {
            sqlx::query(
                "UPDATE demands SET status = ?, admin_response = ?, updated_at = ? WHERE id = ?",
            )
            .bind(status)
            .bind(note)
            .bind(&now)
            .bind(id)
            .execute(db)
            .await?;
        }
        None => {
            sqlx::query("UPDATE demands SET status = ?, updated_at = ? WHERE id = ?")
                .bind(status)
                .bind(&now)
                .bind(id)
                .execute(db)
                .await?;
        }
    }
    Ok(())
}

/// Delete a demand if (and only if) the given user owns it.
pub async fn delete_demand_owned(
    db: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM demands WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
