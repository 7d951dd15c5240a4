use utoipa::OpenApi;

use crate::controllers::auth::{AdminProfile, LoginRequest, LoginResponse};
use crate::controllers::files::UploadResponse;
use crate::controllers::portfolio::PortfolioData;
use crate::controllers::{HealthStatus, auth, contact_info, files, messages, portfolio, testimonials};
use crate::error::{ErrorDetail, FieldError};
use crate::models::contact_info::ContactInfoPayload;
use crate::models::education::EducationPayload;
use crate::models::experience::ExperiencePayload;
use crate::models::hobby::HobbyPayload;
use crate::models::message::CreateMessageRequest;
use crate::models::project::ProjectPayload;
use crate::models::skill::SkillPayload;
use crate::models::testimonial::{SubmitTestimonial, TestimonialStatus};
use crate::models::{education, experience, hobby, message, project, skill, testimonial};
use crate::response::MessageResponse;

/// OpenAPI documentation for the Folio API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Folio API",
        version = "0.3.2",
        description = "Portfolio content, testimonials and a spam-protected contact form."
    ),
    paths(
        crate::controllers::health,
        auth::login,
        auth::profile,
        portfolio::portfolio,
        portfolio::list_skills,
        portfolio::create_skill,
        portfolio::update_skill,
        portfolio::delete_skill,
        portfolio::list_projects,
        portfolio::create_project,
        portfolio::update_project,
        portfolio::delete_project,
        portfolio::list_experience,
        portfolio::create_experience,
        portfolio::update_experience,
        portfolio::delete_experience,
        portfolio::list_education,
        portfolio::create_education,
        portfolio::update_education,
        portfolio::delete_education,
        portfolio::list_hobbies,
        portfolio::create_hobby,
        portfolio::update_hobby,
        portfolio::delete_hobby,
        testimonials::list_approved,
        testimonials::submit,
        testimonials::list_all,
        testimonials::approve,
        testimonials::reject,
        testimonials::remove,
        messages::contact,
        messages::list_messages,
        messages::mark_read,
        messages::remove,
        contact_info::get_contact_info,
        contact_info::get_contact_info_admin,
        contact_info::update_contact_info,
        files::get_resume,
        files::upload_resume,
        files::get_profile_picture,
        files::upload_profile_picture,
    ),
    components(
        schemas(
            HealthStatus,
            LoginRequest,
            LoginResponse,
            AdminProfile,
            PortfolioData,
            skill::Model,
            SkillPayload,
            project::Model,
            ProjectPayload,
            experience::Model,
            ExperiencePayload,
            education::Model,
            EducationPayload,
            hobby::Model,
            HobbyPayload,
            testimonial::Model,
            TestimonialStatus,
            SubmitTestimonial,
            message::Model,
            CreateMessageRequest,
            ContactInfoPayload,
            UploadResponse,
            MessageResponse,
            ErrorDetail,
            FieldError,
        )
    ),
    tags(
        (name = "health", description = "Service status"),
        (name = "public", description = "Portfolio content and visitor submissions"),
        (name = "admin", description = "Content management; requires a bearer token")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add JWT Bearer security scheme to the OpenAPI spec.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_public_and_admin_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/public/contact"));
        assert!(doc.paths.paths.contains_key("/api/admin/login"));
        assert!(doc.paths.paths.contains_key("/api/admin/skills/{id}"));
    }
}
