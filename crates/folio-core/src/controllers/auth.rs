use axum::{Router, extract::State, routing::get, routing::post};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{ADMIN_ID, ADMIN_NAME, create_token};
use crate::error::FolioError;
use crate::extractors::{AuthAdmin, ClientIp, Json};
use crate::response::ApiResponse;

use super::{AppState, validated};

// ── Request / Response types ──

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminProfile {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub admin: AdminProfile,
}

// ── Routes ──

/// Unauthenticated admin routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/profile", get(profile))
}

// ── Handlers ──

/// Log in as the admin.
///
/// Blocked clients are turned away before the credentials are looked at.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many failed attempts; see Retry-After")
    ),
    tag = "admin"
)]
pub async fn login(
    State(state): State<AppState>,
    client: ClientIp,
    Json(payload): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, FolioError> {
    let payload = validated(payload)?;
    let identity = client.as_str();

    if let Some(remaining) = state.guard.login_blocked(identity) {
        return Err(login_throttled(remaining));
    }

    if state.admin.verify(&payload.email, &payload.password)? {
        state.guard.login_succeeded(identity);

        let token = create_token(
            ADMIN_ID,
            state.admin.user(),
            &state.config.jwt_secret,
            state.config.jwt_expiry_minutes,
        )?;
        tracing::info!(identity, "admin logged in");

        return Ok(ApiResponse::success(LoginResponse {
            token,
            admin: AdminProfile {
                id: ADMIN_ID.to_string(),
                email: state.admin.user().to_string(),
                name: ADMIN_NAME.to_string(),
            },
        }));
    }

    if let Some(blocked_for) = state.guard.login_failed(identity) {
        return Err(login_throttled(blocked_for));
    }

    Err(FolioError::Unauthorized("Invalid credentials".to_string()))
}

/// The logged-in admin.
#[utoipa::path(
    get,
    path = "/api/admin/profile",
    responses(
        (status = 200, description = "Admin profile", body = ApiResponse<AdminProfile>),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "admin"
)]
pub async fn profile(AuthAdmin(claims): AuthAdmin) -> ApiResponse<AdminProfile> {
    ApiResponse::success(AdminProfile {
        id: claims.sub,
        email: claims.email,
        name: ADMIN_NAME.to_string(),
    })
}

fn login_throttled(remaining: chrono::Duration) -> FolioError {
    let secs = remaining.num_seconds().max(1) as u64;
    FolioError::throttled(
        format!(
            "Too many failed login attempts. Try again in {} seconds.",
            secs
        ),
        secs,
    )
}
