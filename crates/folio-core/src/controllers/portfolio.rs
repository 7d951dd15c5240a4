use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PrimaryKeyTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::FolioError;
use crate::extractors::Json;
use crate::models::education::{self, EducationPayload, Entity as Education};
use crate::models::experience::{self, Entity as Experience, ExperiencePayload};
use crate::models::hobby::{self, Entity as Hobby, HobbyPayload};
use crate::models::project::{self, Entity as Project, ProjectPayload};
use crate::models::skill::{self, Entity as Skill, SkillPayload};
use crate::models::testimonial::{self, Entity as Testimonial, TestimonialStatus};
use crate::response::{ApiResponse, MessageResponse};

use super::{AppState, validated};

// ═══════════════════════════════════════════════════════════════
// Response types
// ═══════════════════════════════════════════════════════════════

/// Everything the public site renders, in one response.
#[derive(Debug, Serialize, ToSchema)]
pub struct PortfolioData {
    /// Only skills with `showInPortfolio` set
    pub skills: Vec<skill::Model>,
    pub projects: Vec<project::Model>,
    pub experience: Vec<experience::Model>,
    pub education: Vec<education::Model>,
    pub hobbies: Vec<hobby::Model>,
    /// Approved testimonials, newest first
    pub testimonials: Vec<testimonial::Model>,
}

// ═══════════════════════════════════════════════════════════════
// Routes
// ═══════════════════════════════════════════════════════════════

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/portfolio", get(portfolio))
        .route("/skills", get(list_skills))
        .route("/projects", get(list_projects))
        .route("/experience", get(list_experience))
        .route("/education", get(list_education))
        .route("/hobbies", get(list_hobbies))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/skills", post(create_skill))
        .route("/skills/{id}", put(update_skill).delete(delete_skill))
        .route("/projects", post(create_project))
        .route("/projects/{id}", put(update_project).delete(delete_project))
        .route("/experience", post(create_experience))
        .route(
            "/experience/{id}",
            put(update_experience).delete(delete_experience),
        )
        .route("/education", post(create_education))
        .route(
            "/education/{id}",
            put(update_education).delete(delete_education),
        )
        .route("/hobbies", post(create_hobby))
        .route("/hobbies/{id}", put(update_hobby).delete(delete_hobby))
}

// ═══════════════════════════════════════════════════════════════
// Aggregate
// ═══════════════════════════════════════════════════════════════

#[utoipa::path(
    get,
    path = "/api/public/portfolio",
    responses((status = 200, description = "All public portfolio sections", body = ApiResponse<PortfolioData>)),
    tag = "public"
)]
pub async fn portfolio(
    State(state): State<AppState>,
) -> Result<ApiResponse<PortfolioData>, FolioError> {
    let db = &state.db;

    let skills = Skill::find()
        .filter(skill::Column::ShowInPortfolio.eq(true))
        .order_by_asc(skill::Column::SortOrder)
        .all(db)
        .await?;

    let testimonials = Testimonial::find()
        .filter(testimonial::Column::Status.eq(TestimonialStatus::Approved))
        .order_by_desc(testimonial::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(ApiResponse::success(PortfolioData {
        skills,
        projects: all_projects(db).await?,
        experience: all_experience(db).await?,
        education: all_education(db).await?,
        hobbies: all_hobbies(db).await?,
        testimonials,
    }))
}

// ═══════════════════════════════════════════════════════════════
// Skills
// ═══════════════════════════════════════════════════════════════

#[utoipa::path(
    get,
    path = "/api/public/skills",
    responses((status = 200, description = "All skills", body = ApiResponse<Vec<skill::Model>>)),
    tag = "public"
)]
pub async fn list_skills(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<skill::Model>>, FolioError> {
    let skills = Skill::find()
        .order_by_asc(skill::Column::SortOrder)
        .all(&state.db)
        .await?;
    Ok(ApiResponse::success(skills))
}

#[utoipa::path(
    post,
    path = "/api/admin/skills",
    request_body = SkillPayload,
    responses(
        (status = 201, description = "Skill created", body = ApiResponse<skill::Model>),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn create_skill(
    State(state): State<AppState>,
    Json(payload): Json<SkillPayload>,
) -> Result<(StatusCode, ApiResponse<skill::Model>), FolioError> {
    let payload = validated(payload)?;
    let now = state.now();

    let mut active = skill::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    payload.apply(&mut active);

    let created = active.insert(&state.db).await?;
    Ok(ApiResponse::created(created))
}

#[utoipa::path(
    put,
    path = "/api/admin/skills/{id}",
    params(("id" = Uuid, Path, description = "Skill ID")),
    request_body = SkillPayload,
    responses(
        (status = 200, description = "Skill replaced", body = ApiResponse<skill::Model>),
        (status = 404, description = "Skill not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SkillPayload>,
) -> Result<ApiResponse<skill::Model>, FolioError> {
    let payload = validated(payload)?;

    let existing = Skill::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| FolioError::NotFound("Skill not found".to_string()))?;

    let mut active: skill::ActiveModel = existing.into();
    payload.apply(&mut active);
    active.updated_at = Set(state.now());

    Ok(ApiResponse::success(active.update(&state.db).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/skills/{id}",
    params(("id" = Uuid, Path, description = "Skill ID")),
    responses(
        (status = 200, description = "Skill deleted", body = ApiResponse<MessageResponse>),
        (status = 404, description = "Skill not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn delete_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<MessageResponse>, FolioError> {
    delete_by_id::<Skill>(&state.db, id, "Skill").await
}

// ═══════════════════════════════════════════════════════════════
// Projects
// ═══════════════════════════════════════════════════════════════

#[utoipa::path(
    get,
    path = "/api/public/projects",
    responses((status = 200, description = "All projects", body = ApiResponse<Vec<project::Model>>)),
    tag = "public"
)]
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<project::Model>>, FolioError> {
    Ok(ApiResponse::success(all_projects(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/projects",
    request_body = ProjectPayload,
    responses(
        (status = 201, description = "Project created", body = ApiResponse<project::Model>),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<ProjectPayload>,
) -> Result<(StatusCode, ApiResponse<project::Model>), FolioError> {
    let payload = validated(payload)?;
    let now = state.now();

    let mut active = project::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    payload.apply(&mut active);

    let created = active.insert(&state.db).await?;
    Ok(ApiResponse::created(created))
}

#[utoipa::path(
    put,
    path = "/api/admin/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    request_body = ProjectPayload,
    responses(
        (status = 200, description = "Project replaced", body = ApiResponse<project::Model>),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProjectPayload>,
) -> Result<ApiResponse<project::Model>, FolioError> {
    let payload = validated(payload)?;

    let existing = Project::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| FolioError::NotFound("Project not found".to_string()))?;

    let mut active: project::ActiveModel = existing.into();
    payload.apply(&mut active);
    active.updated_at = Set(state.now());

    Ok(ApiResponse::success(active.update(&state.db).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project deleted", body = ApiResponse<MessageResponse>),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<MessageResponse>, FolioError> {
    delete_by_id::<Project>(&state.db, id, "Project").await
}

// ═══════════════════════════════════════════════════════════════
// Experience
// ═══════════════════════════════════════════════════════════════

#[utoipa::path(
    get,
    path = "/api/public/experience",
    responses((status = 200, description = "All experience entries", body = ApiResponse<Vec<experience::Model>>)),
    tag = "public"
)]
pub async fn list_experience(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<experience::Model>>, FolioError> {
    Ok(ApiResponse::success(all_experience(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/experience",
    request_body = ExperiencePayload,
    responses(
        (status = 201, description = "Experience created", body = ApiResponse<experience::Model>),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn create_experience(
    State(state): State<AppState>,
    Json(payload): Json<ExperiencePayload>,
) -> Result<(StatusCode, ApiResponse<experience::Model>), FolioError> {
    let payload = validated(payload)?;
    let now = state.now();

    let mut active = experience::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    payload.apply(&mut active);

    let created = active.insert(&state.db).await?;
    Ok(ApiResponse::created(created))
}

#[utoipa::path(
    put,
    path = "/api/admin/experience/{id}",
    params(("id" = Uuid, Path, description = "Experience ID")),
    request_body = ExperiencePayload,
    responses(
        (status = 200, description = "Experience replaced", body = ApiResponse<experience::Model>),
        (status = 404, description = "Experience not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_experience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExperiencePayload>,
) -> Result<ApiResponse<experience::Model>, FolioError> {
    let payload = validated(payload)?;

    let existing = Experience::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| FolioError::NotFound("Experience not found".to_string()))?;

    let mut active: experience::ActiveModel = existing.into();
    payload.apply(&mut active);
    active.updated_at = Set(state.now());

    Ok(ApiResponse::success(active.update(&state.db).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/experience/{id}",
    params(("id" = Uuid, Path, description = "Experience ID")),
    responses(
        (status = 200, description = "Experience deleted", body = ApiResponse<MessageResponse>),
        (status = 404, description = "Experience not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn delete_experience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<MessageResponse>, FolioError> {
    delete_by_id::<Experience>(&state.db, id, "Experience").await
}

// ═══════════════════════════════════════════════════════════════
// Education
// ═══════════════════════════════════════════════════════════════

#[utoipa::path(
    get,
    path = "/api/public/education",
    responses((status = 200, description = "All education entries", body = ApiResponse<Vec<education::Model>>)),
    tag = "public"
)]
pub async fn list_education(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<education::Model>>, FolioError> {
    Ok(ApiResponse::success(all_education(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/education",
    request_body = EducationPayload,
    responses(
        (status = 201, description = "Education created", body = ApiResponse<education::Model>),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn create_education(
    State(state): State<AppState>,
    Json(payload): Json<EducationPayload>,
) -> Result<(StatusCode, ApiResponse<education::Model>), FolioError> {
    let payload = validated(payload)?;
    let now = state.now();

    let mut active = education::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    payload.apply(&mut active);

    let created = active.insert(&state.db).await?;
    Ok(ApiResponse::created(created))
}

#[utoipa::path(
    put,
    path = "/api/admin/education/{id}",
    params(("id" = Uuid, Path, description = "Education ID")),
    request_body = EducationPayload,
    responses(
        (status = 200, description = "Education replaced", body = ApiResponse<education::Model>),
        (status = 404, description = "Education not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_education(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EducationPayload>,
) -> Result<ApiResponse<education::Model>, FolioError> {
    let payload = validated(payload)?;

    let existing = Education::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| FolioError::NotFound("Education not found".to_string()))?;

    let mut active: education::ActiveModel = existing.into();
    payload.apply(&mut active);
    active.updated_at = Set(state.now());

    Ok(ApiResponse::success(active.update(&state.db).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/education/{id}",
    params(("id" = Uuid, Path, description = "Education ID")),
    responses(
        (status = 200, description = "Education deleted", body = ApiResponse<MessageResponse>),
        (status = 404, description = "Education not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn delete_education(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<MessageResponse>, FolioError> {
    delete_by_id::<Education>(&state.db, id, "Education").await
}

// ═══════════════════════════════════════════════════════════════
// Hobbies
// ═══════════════════════════════════════════════════════════════

#[utoipa::path(
    get,
    path = "/api/public/hobbies",
    responses((status = 200, description = "All hobbies", body = ApiResponse<Vec<hobby::Model>>)),
    tag = "public"
)]
pub async fn list_hobbies(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<hobby::Model>>, FolioError> {
    Ok(ApiResponse::success(all_hobbies(&state.db).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/hobbies",
    request_body = HobbyPayload,
    responses(
        (status = 201, description = "Hobby created", body = ApiResponse<hobby::Model>),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn create_hobby(
    State(state): State<AppState>,
    Json(payload): Json<HobbyPayload>,
) -> Result<(StatusCode, ApiResponse<hobby::Model>), FolioError> {
    let payload = validated(payload)?;
    let now = state.now();

    let mut active = hobby::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    payload.apply(&mut active);

    let created = active.insert(&state.db).await?;
    Ok(ApiResponse::created(created))
}

#[utoipa::path(
    put,
    path = "/api/admin/hobbies/{id}",
    params(("id" = Uuid, Path, description = "Hobby ID")),
    request_body = HobbyPayload,
    responses(
        (status = 200, description = "Hobby replaced", body = ApiResponse<hobby::Model>),
        (status = 404, description = "Hobby not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_hobby(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<HobbyPayload>,
) -> Result<ApiResponse<hobby::Model>, FolioError> {
    let payload = validated(payload)?;

    let existing = Hobby::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| FolioError::NotFound("Hobby not found".to_string()))?;

    let mut active: hobby::ActiveModel = existing.into();
    payload.apply(&mut active);
    active.updated_at = Set(state.now());

    Ok(ApiResponse::success(active.update(&state.db).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/hobbies/{id}",
    params(("id" = Uuid, Path, description = "Hobby ID")),
    responses(
        (status = 200, description = "Hobby deleted", body = ApiResponse<MessageResponse>),
        (status = 404, description = "Hobby not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn delete_hobby(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<MessageResponse>, FolioError> {
    delete_by_id::<Hobby>(&state.db, id, "Hobby").await
}

// ═══════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════

async fn all_projects(db: &DatabaseConnection) -> Result<Vec<project::Model>, FolioError> {
    Ok(Project::find()
        .order_by_asc(project::Column::SortOrder)
        .all(db)
        .await?)
}

async fn all_experience(db: &DatabaseConnection) -> Result<Vec<experience::Model>, FolioError> {
    Ok(Experience::find()
        .order_by_asc(experience::Column::SortOrder)
        .all(db)
        .await?)
}

async fn all_education(db: &DatabaseConnection) -> Result<Vec<education::Model>, FolioError> {
    Ok(Education::find()
        .order_by_asc(education::Column::SortOrder)
        .all(db)
        .await?)
}

async fn all_hobbies(db: &DatabaseConnection) -> Result<Vec<hobby::Model>, FolioError> {
    Ok(Hobby::find()
        .order_by_asc(hobby::Column::SortOrder)
        .all(db)
        .await?)
}

/// Delete one row by primary key; `label` names the entity in messages.
pub(crate) async fn delete_by_id<E>(
    db: &DatabaseConnection,
    id: Uuid,
    label: &str,
) -> Result<ApiResponse<MessageResponse>, FolioError>
where
    E: EntityTrait,
    Uuid: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    let result = E::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(FolioError::NotFound(format!("{} not found", label)));
    }

    tracing::info!(%id, entity = label, "deleted");
    Ok(ApiResponse::success(MessageResponse::with_id(
        format!("{} deleted", label),
        id,
    )))
}
