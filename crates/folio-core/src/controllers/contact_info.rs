use axum::{Router, extract::State, routing::get};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use crate::error::FolioError;
use crate::extractors::Json;
use crate::models::contact_info::{self, ContactInfoPayload, Entity as ContactInfo};
use crate::response::ApiResponse;

use super::{AppState, validated};

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/contact-info", get(get_contact_info))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route(
        "/contact-info",
        get(get_contact_info_admin).put(update_contact_info),
    )
}

/// Public contact details. Empty fields until the admin fills them in.
#[utoipa::path(
    get,
    path = "/api/public/contact-info",
    responses((status = 200, description = "Contact details", body = ApiResponse<ContactInfoPayload>)),
    tag = "public"
)]
pub async fn get_contact_info(
    State(state): State<AppState>,
) -> Result<ApiResponse<ContactInfoPayload>, FolioError> {
    Ok(ApiResponse::success(current(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/contact-info",
    responses((status = 200, description = "Contact details", body = ApiResponse<ContactInfoPayload>)),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn get_contact_info_admin(
    State(state): State<AppState>,
) -> Result<ApiResponse<ContactInfoPayload>, FolioError> {
    Ok(ApiResponse::success(current(&state.db).await?))
}

/// Replace the contact details, creating the row on first save.
#[utoipa::path(
    put,
    path = "/api/admin/contact-info",
    request_body = ContactInfoPayload,
    responses(
        (status = 200, description = "Contact details saved", body = ApiResponse<ContactInfoPayload>),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_contact_info(
    State(state): State<AppState>,
    Json(payload): Json<ContactInfoPayload>,
) -> Result<ApiResponse<ContactInfoPayload>, FolioError> {
    let payload = validated(payload)?;
    let now = state.now();

    let saved = match ContactInfo::find().one(&state.db).await? {
        Some(existing) => {
            let mut active: contact_info::ActiveModel = existing.into();
            payload.apply(&mut active);
            active.updated_at = Set(now);
            active.update(&state.db).await?
        }
        None => {
            let mut active = contact_info::ActiveModel {
                id: Set(Uuid::new_v4()),
                updated_at: Set(now),
                ..Default::default()
            };
            payload.apply(&mut active);
            active.insert(&state.db).await?
        }
    };

    tracing::info!("contact info updated");
    Ok(ApiResponse::success(saved.into()))
}

async fn current(db: &DatabaseConnection) -> Result<ContactInfoPayload, FolioError> {
    Ok(ContactInfo::find()
        .one(db)
        .await?
        .map(ContactInfoPayload::from)
        .unwrap_or_default())
}
