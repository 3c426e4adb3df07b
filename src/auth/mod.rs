//! Session token issuance and verification, plus password hashing.
//!
//! Tokens are stateless HS256 JWTs carrying the user's identity and role.
//! There is no revocation list: validity is signature + expiry only, so a
//! role change or account deletion does not invalidate tokens already in
//! the wild before they expire.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{Role, User};

/// Token lifetime. Matches the session length shown in the dashboard.
const TOKEN_TTL_DAYS: i64 = 1;

/// Decoded, verified contents of a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user id
    pub id: String,
    pub email: String,
    pub role: Role,
    pub name: String,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Malformed or improperly signed token")]
    InvalidToken,
    #[error("Token has expired")]
    ExpiredToken,
}

/// Issue a signed session token for a user.
///
/// The role claim is normalized through [`Role`], so a stored record with a
/// missing or unknown role yields a plain user token, never an admin one.
pub fn issue_token(secret: &str, user: &User) -> anyhow::Result<String> {
    let exp = Utc::now() + Duration::days(TOKEN_TTL_DAYS);

    let claims = Claims {
        id: user.id.clone(),
        email: user.email.clone(),
        role: user.role(),
        name: user.name.clone(),
        exp: exp.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify a session token and return its claims.
///
/// Does not consult the credential store: a token stays structurally valid
/// until its expiry even if the underlying user record has changed.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
