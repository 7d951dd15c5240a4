use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::FolioError;

/// Issuer stamped into and required from every token.
pub const ISSUER: &str = "folio";

/// JWT claims payload.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Claims {
    /// Subject (admin ID)
    pub sub: String,
    /// Admin login name
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Not before (Unix timestamp)
    pub nbf: usize,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    pub iss: String,
}

/// Create a signed HS256 token for the admin.
pub fn create_token(
    admin_id: &str,
    email: &str,
    secret: &str,
    expiry_minutes: u64,
) -> Result<String, FolioError> {
    let now = Utc::now();
    let expires = i64::try_from(expiry_minutes)
        .ok()
        .and_then(Duration::try_minutes)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| FolioError::Internal("Token lifetime is out of range".to_string()))?;

    let claims = Claims {
        sub: admin_id.to_string(),
        email: email.to_string(),
        iat: now.timestamp() as usize,
        nbf: now.timestamp() as usize,
        exp: expires.timestamp() as usize,
        iss: ISSUER.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| FolioError::Internal(format!("Failed to create token: {}", e)))
}

/// Validate a token and return its claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, FolioError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[ISSUER]);
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| FolioError::Unauthorized(format!("Invalid token: {}", e)))?;

    Ok(token_data.claims)
}
