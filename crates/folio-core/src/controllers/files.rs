use axum::{
    Router,
    extract::{Multipart, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::FolioError;
use crate::response::ApiResponse;
use crate::storage::{StoredFile, read_upload_field, validate_extension};

use super::AppState;

const RESUME_LANGUAGES: [&str; 2] = ["en", "fr"];
const PICTURE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];
const PICTURE_STEM: &str = "profile_picture";

#[derive(Debug, Deserialize, IntoParams)]
pub struct ResumeQuery {
    /// `en` or `fr`
    pub lang: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/resume", get(get_resume))
        .route("/profile-picture", get(get_profile_picture))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/resume", post(upload_resume))
        .route("/profile-picture", post(upload_profile_picture))
}

// ── Resume ──

/// Download the resume PDF. `lang` defaults to `en`.
#[utoipa::path(
    get,
    path = "/api/public/resume",
    params(ResumeQuery),
    responses(
        (status = 200, description = "Resume PDF", content_type = "application/pdf"),
        (status = 400, description = "Unsupported language"),
        (status = 404, description = "Resume not found")
    ),
    tag = "public"
)]
pub async fn get_resume(
    State(state): State<AppState>,
    Query(query): Query<ResumeQuery>,
) -> Result<Response, FolioError> {
    let requested = query.lang.as_deref().filter(|l| !l.is_empty());
    let lang = resume_language(requested.or(Some("en")))?;

    let file = state
        .storage
        .get(&resume_name(lang))
        .await?
        .ok_or_else(|| FolioError::NotFound("Resume not found".to_string()))?;

    Ok(serve(file))
}

/// Upload the resume for one language, replacing the previous one.
#[utoipa::path(
    post,
    path = "/api/admin/resume",
    params(ResumeQuery),
    request_body(content_type = "multipart/form-data", description = "PDF in the `resume` field"),
    responses(
        (status = 200, description = "Resume stored", body = ApiResponse<UploadResponse>),
        (status = 400, description = "Missing file, wrong type or unsupported language")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn upload_resume(
    State(state): State<AppState>,
    Query(query): Query<ResumeQuery>,
    multipart: Multipart,
) -> Result<ApiResponse<UploadResponse>, FolioError> {
    let lang = resume_language(query.lang.as_deref())?;

    let upload = read_upload_field(multipart, "resume", state.config.max_upload_size).await?;
    validate_extension(&upload.filename, &["pdf"])?;

    let name = resume_name(lang);
    state.storage.put(&name, &upload.data).await?;

    tracing::info!(lang, bytes = upload.data.len(), "resume uploaded");
    Ok(ApiResponse::success(UploadResponse {
        message: "Resume uploaded successfully".to_string(),
        filename: name,
        lang: Some(lang.to_string()),
    }))
}

// ── Profile picture ──

#[utoipa::path(
    get,
    path = "/api/public/profile-picture",
    responses(
        (status = 200, description = "Profile picture", content_type = "image/*"),
        (status = 404, description = "Profile picture not found")
    ),
    tag = "public"
)]
pub async fn get_profile_picture(State(state): State<AppState>) -> Result<Response, FolioError> {
    for ext in PICTURE_EXTENSIONS {
        if let Some(file) = state.storage.get(&picture_name(ext)).await? {
            return Ok(serve(file));
        }
    }
    Err(FolioError::NotFound("Profile picture not found".to_string()))
}

/// Upload a new profile picture. Earlier pictures are removed whatever
/// their format.
#[utoipa::path(
    post,
    path = "/api/admin/profile-picture",
    request_body(content_type = "multipart/form-data", description = "Image in the `profile_picture` field"),
    responses(
        (status = 200, description = "Profile picture stored", body = ApiResponse<UploadResponse>),
        (status = 400, description = "Missing file or wrong type")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn upload_profile_picture(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<ApiResponse<UploadResponse>, FolioError> {
    let upload =
        read_upload_field(multipart, "profile_picture", state.config.max_upload_size).await?;
    validate_extension(&upload.filename, &PICTURE_EXTENSIONS)?;

    for ext in PICTURE_EXTENSIONS {
        state.storage.delete(&picture_name(ext)).await?;
    }

    let name = picture_name(&upload.extension);
    state.storage.put(&name, &upload.data).await?;

    tracing::info!(file = %name, bytes = upload.data.len(), "profile picture uploaded");
    Ok(ApiResponse::success(UploadResponse {
        message: "Profile picture uploaded successfully".to_string(),
        filename: name,
        lang: None,
    }))
}

// ── Helpers ──

fn resume_language(lang: Option<&str>) -> Result<&'static str, FolioError> {
    lang.and_then(|l| RESUME_LANGUAGES.iter().copied().find(|known| *known == l))
        .ok_or_else(|| FolioError::BadRequest("Invalid language. Must be 'en' or 'fr'".to_string()))
}

fn resume_name(lang: &str) -> String {
    format!("resume_{}.pdf", lang)
}

fn picture_name(ext: &str) -> String {
    format!("{}.{}", PICTURE_STEM, ext)
}

fn serve(file: StoredFile) -> Response {
    let disposition = format!("inline; filename=\"{}\"", file.name);
    (
        [
            (header::CONTENT_TYPE, file.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.data,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resume_language_accepts_known_codes() {
        assert_eq!(resume_language(Some("en")).ok(), Some("en"));
        assert_eq!(resume_language(Some("fr")).ok(), Some("fr"));
    }

    #[test]
    fn resume_language_rejects_missing_and_unknown() {
        assert!(resume_language(None).is_err());
        assert!(resume_language(Some("de")).is_err());
        assert!(resume_language(Some("EN")).is_err());
    }

    #[test]
    fn stored_names_are_fixed() {
        assert_eq!(resume_name("fr"), "resume_fr.pdf");
        assert_eq!(picture_name("webp"), "profile_picture.webp");
    }
}
