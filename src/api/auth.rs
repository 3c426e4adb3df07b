//! Registration, login, profile and the bearer-token extractors.

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::request::Parts,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{self, Claims};
use crate::db::{self, LoginRequest, LoginResponse, RegisterRequest, Role, UserResponse};
use crate::AppState;

use super::error::ApiError;
use super::validation::{require_field, validate_email};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// Verified claims of the calling user. Extracting this rejects requests
/// with a missing (401) or invalid/expired (403) bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

/// Verified claims of a calling administrator. Extraction fails with 403
/// for any authenticated non-admin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

/// Extract the bearer token from the Authorization header
fn extract_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or_else(ApiError::unauthenticated)?;
        let claims = auth::verify_token(&state.config.auth.jwt_secret, token)?;
        Ok(AuthUser(claims))
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !claims.role.is_admin() {
            return Err(ApiError::forbidden("Admin access required"));
        }
        Ok(AdminUser(claims))
    }
}

/// Create a new user account with the default role.
///
/// POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let name = require_field(request.name.as_deref(), "name").map_err(ApiError::validation)?;
    let email = require_field(request.email.as_deref(), "email").map_err(ApiError::validation)?;
    let password =
        require_field(request.password.as_deref(), "password").map_err(ApiError::validation)?;
    validate_email(email).map_err(ApiError::validation)?;

    if db::find_user_by_email(&state.db, email).await?.is_some() {
        return Err(ApiError::duplicate_email());
    }

    let password_hash = auth::hash_password(password)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    let user = db::insert_user(
        &state.db,
        name,
        email,
        &password_hash,
        Role::User,
        request.phone.as_deref(),
    )
    .await?;

    tracing::info!(user_id = %user.id, email = %user.email, "User registered");

    Ok(Json(MessageResponse::new("Registration successful")))
}

/// Verify credentials and issue a session token.
///
/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = require_field(request.email.as_deref(), "email")
        .map_err(|_| ApiError::validation("Email and password are required"))?;
    let password = require_field(request.password.as_deref(), "password")
        .map_err(|_| ApiError::validation("Email and password are required"))?;

    let user = db::find_user_by_email(&state.db, email)
        .await?
        .ok_or_else(|| ApiError::invalid_credentials("User not found"))?;

    if !auth::verify_password(password, &user.password_hash) {
        return Err(ApiError::invalid_credentials("Invalid password"));
    }

    let token = auth::issue_token(&state.config.auth.jwt_secret, &user)
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {}", e)))?;

    tracing::info!(user_id = %user.id, role = %user.role(), "User logged in");

    Ok(Json(LoginResponse {
        msg: "Login successful".to_string(),
        token,
        user: UserResponse::from(user),
    }))
}

/// Current user's public snapshot.
///
/// GET /api/profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = db::find_user_by_id(&state.db, &claims.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}

/// Create the configured administrator account when it does not exist yet.
/// This is the only path that produces an admin; no API route assigns roles.
pub async fn ensure_admin_user(
    db: &db::DbPool,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    if db::find_user_by_email(db, email).await?.is_some() {
        return Ok(());
    }

    let password_hash = auth::hash_password(password)
        .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {}", e))?;
    let user = db::insert_user(db, name, email, &password_hash, Role::Admin, None).await?;

    tracing::info!(email = %user.email, "Created admin user during startup");
    Ok(())
}
