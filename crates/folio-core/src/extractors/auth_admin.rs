use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{self, Claims, middleware::bearer_token};
use crate::config::Config;
use crate::error::FolioError;

/// Extractor for the authenticated admin's token claims.
///
/// Reuses the claims left by [`admin_required`](crate::auth::admin_required)
/// when the route sits behind it, and validates the bearer token otherwise.
///
/// ```rust,ignore
/// async fn profile(AuthAdmin(claims): AuthAdmin) -> impl IntoResponse {
///     // claims.sub is the admin ID
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthAdmin(pub Claims);

impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = FolioError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(AuthAdmin(claims.clone()));
        }

        let token = bearer_token(&parts.headers)?;

        let config = parts
            .extensions
            .get::<Arc<Config>>()
            .ok_or_else(|| FolioError::Internal("Config not found in request".to_string()))?;

        let claims = auth::validate_token(token, &config.jwt_secret)?;
        Ok(AuthAdmin(claims))
    }
}
