use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::FolioError;

/// JSON extractor that reports failures in the standard error envelope.
///
/// Malformed bodies, wrong field types and bad `YYYY-MM-DD` dates all come
/// back as `422 VALIDATION_ERROR` instead of axum's plain-text rejection.
///
/// ```rust,ignore
/// async fn create_skill(Json(payload): Json<SkillPayload>) -> impl IntoResponse {
///     // payload is deserialized from request body
/// }
/// ```
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = FolioError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // `Bytes` honours the router's `DefaultBodyLimit`.
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| FolioError::BadRequest(format!("Failed to read body: {}", e)))?;

        let value: T = serde_json::from_slice(&bytes)
            .map_err(|e| FolioError::Validation(format!("Invalid JSON: {}", e)))?;

        Ok(Json(value))
    }
}
