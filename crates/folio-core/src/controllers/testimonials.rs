use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::error::FolioError;
use crate::extractors::Json;
use crate::models::testimonial::{self, Entity as Testimonial, SubmitTestimonial, TestimonialStatus};
use crate::response::{ApiResponse, MessageResponse};

use super::portfolio::delete_by_id;
use super::{AppState, validated};

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/testimonials", get(list_approved).post(submit))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/testimonials", get(list_all))
        .route("/testimonials/{id}/approve", put(approve))
        .route("/testimonials/{id}/reject", put(reject))
        .route("/testimonials/{id}", delete(remove))
}

/// Approved testimonials, newest first.
#[utoipa::path(
    get,
    path = "/api/public/testimonials",
    responses((status = 200, description = "Approved testimonials", body = ApiResponse<Vec<testimonial::Model>>)),
    tag = "public"
)]
pub async fn list_approved(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<testimonial::Model>>, FolioError> {
    let testimonials = Testimonial::find()
        .filter(testimonial::Column::Status.eq(TestimonialStatus::Approved))
        .order_by_desc(testimonial::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(ApiResponse::success(testimonials))
}

/// Submit a testimonial. It stays hidden until an admin approves it.
#[utoipa::path(
    post,
    path = "/api/public/testimonials",
    request_body = SubmitTestimonial,
    responses(
        (status = 201, description = "Testimonial submitted for review", body = ApiResponse<testimonial::Model>),
        (status = 422, description = "Validation error")
    ),
    tag = "public"
)]
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<SubmitTestimonial>,
) -> Result<(StatusCode, ApiResponse<testimonial::Model>), FolioError> {
    let payload = validated(payload)?;

    let created = payload
        .into_active_model(state.now())
        .insert(&state.db)
        .await?;

    tracing::info!(id = %created.id, "testimonial submitted");
    Ok(ApiResponse::created(created))
}

#[utoipa::path(
    get,
    path = "/api/admin/testimonials",
    responses((status = 200, description = "All testimonials", body = ApiResponse<Vec<testimonial::Model>>)),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_all(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<testimonial::Model>>, FolioError> {
    let testimonials = Testimonial::find()
        .order_by_desc(testimonial::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(ApiResponse::success(testimonials))
}

#[utoipa::path(
    put,
    path = "/api/admin/testimonials/{id}/approve",
    params(("id" = Uuid, Path, description = "Testimonial ID")),
    responses(
        (status = 200, description = "Testimonial approved", body = ApiResponse<testimonial::Model>),
        (status = 404, description = "Testimonial not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<testimonial::Model>, FolioError> {
    set_status(&state, id, TestimonialStatus::Approved).await
}

#[utoipa::path(
    put,
    path = "/api/admin/testimonials/{id}/reject",
    params(("id" = Uuid, Path, description = "Testimonial ID")),
    responses(
        (status = 200, description = "Testimonial rejected", body = ApiResponse<testimonial::Model>),
        (status = 404, description = "Testimonial not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<testimonial::Model>, FolioError> {
    set_status(&state, id, TestimonialStatus::Rejected).await
}

#[utoipa::path(
    delete,
    path = "/api/admin/testimonials/{id}",
    params(("id" = Uuid, Path, description = "Testimonial ID")),
    responses(
        (status = 200, description = "Testimonial deleted", body = ApiResponse<MessageResponse>),
        (status = 404, description = "Testimonial not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<MessageResponse>, FolioError> {
    delete_by_id::<Testimonial>(&state.db, id, "Testimonial").await
}

async fn set_status(
    state: &AppState,
    id: Uuid,
    status: TestimonialStatus,
) -> Result<ApiResponse<testimonial::Model>, FolioError> {
    let existing = Testimonial::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| FolioError::NotFound("Testimonial not found".to_string()))?;

    let mut active: testimonial::ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(state.now());

    let updated = active.update(&state.db).await?;
    tracing::info!(%id, ?status, "testimonial moderated");
    Ok(ApiResponse::success(updated))
}
