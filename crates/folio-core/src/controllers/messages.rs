use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::error::FolioError;
use crate::extractors::{ClientIp, Json};
use crate::guard::SubmissionRejection;
use crate::models::message::{self, CreateMessageRequest, Entity as Message, NewMessage};
use crate::response::{ApiResponse, MessageResponse};
use crate::store::StoreError;

use super::portfolio::delete_by_id;
use super::{AppState, validated};

/// Acknowledgement for stored and silently dropped messages alike.
const RECEIVED: &str = "Message received";

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/contact", post(contact))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/messages", get(list_messages))
        .route("/messages/{id}/read", put(mark_read))
        .route("/messages/{id}", delete(remove))
}

/// Leave a message through the contact form.
///
/// Submissions are screened before anything is stored: honeypot, timing,
/// per-client rate limit, CAPTCHA, then duplicate detection in the store.
/// When spam masking is on, honeypot and timing rejections get the same
/// `201` as an accepted message.
#[utoipa::path(
    post,
    path = "/api/public/contact",
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message received", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Rejected as spam or CAPTCHA failed"),
        (status = 409, description = "Same message already sent recently"),
        (status = 422, description = "Validation error"),
        (status = 429, description = "Too many messages from this client")
    ),
    tag = "public"
)]
pub async fn contact(
    State(state): State<AppState>,
    client: ClientIp,
    Json(payload): Json<CreateMessageRequest>,
) -> Result<(StatusCode, ApiResponse<MessageResponse>), FolioError> {
    let payload = validated(payload)?;

    let fingerprint = match state
        .guard
        .screen_submission(&payload.submission(), client.as_str())
        .await
    {
        Ok(fingerprint) => fingerprint,
        Err(rejection)
            if rejection.is_maskable() && state.config.guard.mask_spam_rejections =>
        {
            return Ok(ApiResponse::created(MessageResponse::new(RECEIVED)));
        }
        Err(rejection) => return Err(rejection.into()),
    };

    let stored = state
        .messages
        .create_message(
            NewMessage::from(payload),
            &fingerprint,
            state.guard.duplicate_window(),
            state.guard.now(),
        )
        .await
        .map_err(|e| match e {
            StoreError::Duplicate => {
                tracing::info!(identity = client.as_str(), "duplicate contact message");
                FolioError::from(SubmissionRejection::Duplicate)
            }
            StoreError::Database(err) => FolioError::Database(err),
        })?;

    tracing::info!(id = %stored.id, "contact message stored");
    Ok(ApiResponse::created(MessageResponse::new(RECEIVED)))
}

/// All messages, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/messages",
    responses((status = 200, description = "All messages", body = ApiResponse<Vec<message::Model>>)),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<message::Model>>, FolioError> {
    let messages = Message::find()
        .order_by_desc(message::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(ApiResponse::success(messages))
}

#[utoipa::path(
    put,
    path = "/api/admin/messages/{id}/read",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message marked as read", body = ApiResponse<message::Model>),
        (status = 404, description = "Message not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<message::Model>, FolioError> {
    let existing = Message::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| FolioError::NotFound("Message not found".to_string()))?;

    let mut active: message::ActiveModel = existing.into();
    active.is_read = Set(true);

    Ok(ApiResponse::success(active.update(&state.db).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/messages/{id}",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message deleted", body = ApiResponse<MessageResponse>),
        (status = 404, description = "Message not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<MessageResponse>, FolioError> {
    delete_by_id::<Message>(&state.db, id, "Message").await
}
