//! Route-level access control for the admin API.
//!
//! ```rust,ignore
//! Router::new()
//!     .route("/messages", get(list_messages))
//!     .route_layer(axum::middleware::from_fn(admin_required))
//! ```

use std::sync::Arc;

use axum::{extract::Request, middleware::Next, response::Response};

use crate::auth;
use crate::config::Config;
use crate::error::FolioError;

/// Reject the request unless it carries a valid admin bearer token.
///
/// The validated [`Claims`](crate::auth::Claims) are inserted into the
/// request extensions for downstream handlers.
pub async fn admin_required(mut req: Request, next: Next) -> Result<Response, FolioError> {
    let token = bearer_token(req.headers())?;

    let config = req
        .extensions()
        .get::<Arc<Config>>()
        .ok_or_else(|| FolioError::Internal("Config not found in request".to_string()))?;

    let claims = auth::validate_token(token, &config.jwt_secret)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &axum::http::HeaderMap) -> Result<&str, FolioError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| FolioError::Unauthorized("Missing Authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| FolioError::Unauthorized("Invalid Authorization header format".to_string()))
}
