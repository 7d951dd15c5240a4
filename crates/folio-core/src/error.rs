use axum::http::{HeaderValue, StatusCode, header};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::response::ApiResponse;

/// Standard error type for Folio handlers.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation errors")]
    ValidationErrors(Vec<FieldError>),

    /// Temporarily throttled; the client may retry after `retry_after_secs`.
    #[error("{message}")]
    TooManyRequests {
        message: String,
        retry_after_secs: Option<u64>,
    },

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl FolioError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            FolioError::NotFound(_) => StatusCode::NOT_FOUND,
            FolioError::BadRequest(_) => StatusCode::BAD_REQUEST,
            FolioError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            FolioError::Conflict(_) => StatusCode::CONFLICT,
            FolioError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FolioError::ValidationErrors(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FolioError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            FolioError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FolioError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            FolioError::NotFound(_) => "NOT_FOUND",
            FolioError::BadRequest(_) => "BAD_REQUEST",
            FolioError::Unauthorized(_) => "UNAUTHORIZED",
            FolioError::Conflict(_) => "CONFLICT",
            FolioError::Validation(_) => "VALIDATION_ERROR",
            FolioError::ValidationErrors(_) => "VALIDATION_ERROR",
            FolioError::TooManyRequests { .. } => "TOO_MANY_REQUESTS",
            FolioError::Internal(_) => "INTERNAL_ERROR",
            FolioError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Create a throttling error carrying a retry hint in seconds.
    pub fn throttled(message: impl Into<String>, retry_after_secs: u64) -> Self {
        FolioError::TooManyRequests {
            message: message.into(),
            retry_after_secs: Some(retry_after_secs),
        }
    }
}

impl From<validator::ValidationErrors> for FolioError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value for {}", field));
                    FieldError::with_code(field.to_string(), message, e.code.to_string())
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        FolioError::ValidationErrors(fields)
    }
}

/// Error detail for API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

/// Field-level validation error.
///
/// ```json
/// {
///   "field": "email",
///   "message": "must be a valid email address",
///   "code": "email"
/// }
/// ```
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl FieldError {
    /// Create a new field error with a code.
    pub fn with_code(
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
            code: Some(code.into()),
        }
    }
}

impl axum::response::IntoResponse for FolioError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        if let FolioError::Database(ref err) = self {
            tracing::error!(error = %err, "database error");
        }

        let fields = match &self {
            FolioError::ValidationErrors(errs) => Some(errs.clone()),
            _ => None,
        };
        let retry_after_secs = match &self {
            FolioError::TooManyRequests {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        };
        let message = match &self {
            FolioError::ValidationErrors(errs) => errs
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join("; "),
            // Storage internals stay in the logs.
            FolioError::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };
        let body: ApiResponse<()> = ApiResponse {
            success: false,
            data: None,
            error: Some(ErrorDetail {
                code: self.error_code().to_string(),
                message,
                fields,
                retry_after_secs,
            }),
        };

        let mut response = (status, axum::Json(body)).into_response();
        if let Some(secs) = retry_after_secs {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}
