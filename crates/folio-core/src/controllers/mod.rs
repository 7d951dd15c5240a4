use std::sync::Arc;

use axum::routing::get;
use axum::{Router, middleware};
use chrono::{NaiveDateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{AdminCredentials, admin_required};
use crate::config::Config;
use crate::error::FolioError;
use crate::guard::AbuseGuard;
use crate::response::ApiResponse;
use crate::storage::StorageBackend;
use crate::store::MessageStore;

pub mod auth;
pub mod contact_info;
pub mod files;
pub mod messages;
pub mod portfolio;
pub mod testimonials;

/// Shared application state available in all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub guard: Arc<AbuseGuard>,
    pub messages: Arc<dyn MessageStore>,
    pub storage: Arc<dyn StorageBackend>,
    pub admin: Arc<AdminCredentials>,
}

impl AppState {
    /// Current time from the guard's clock, as stored in the database.
    pub fn now(&self) -> NaiveDateTime {
        self.guard.now().naive_utc()
    }
}

/// Every API route.
///
/// `/api/admin/*` except `/api/admin/login` sits behind
/// [`admin_required`].
pub fn routes() -> Router<AppState> {
    let public = Router::new()
        .merge(portfolio::public_routes())
        .merge(testimonials::public_routes())
        .merge(messages::public_routes())
        .merge(contact_info::public_routes())
        .merge(files::public_routes());

    let protected = Router::new()
        .merge(auth::admin_routes())
        .merge(portfolio::admin_routes())
        .merge(testimonials::admin_routes())
        .merge(messages::admin_routes())
        .merge(contact_info::admin_routes())
        .merge(files::admin_routes())
        .route_layer(middleware::from_fn(admin_required));

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/public", public)
        .nest("/api/admin", auth::routes().merge(protected))
}

/// Run `validator` rules on a payload.
pub(crate) fn validated<T: Validate>(payload: T) -> Result<T, FolioError> {
    payload.validate()?;
    Ok(payload)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: i64,
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = ApiResponse<HealthStatus>)),
    tag = "health"
)]
pub async fn health() -> ApiResponse<HealthStatus> {
    ApiResponse::success(HealthStatus {
        status: "ok",
        timestamp: Utc::now().timestamp(),
    })
}
