use chrono::NaiveDateTime;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Moderation state of a testimonial. Only `Approved` ones are public.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum TestimonialStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// A visitor-submitted testimonial.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "testimonials")]
#[schema(as = Testimonial)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_name: String,
    pub author_role: String,
    pub author_email: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    /// 1 to 5
    pub rating: i32,
    pub status: TestimonialStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Body of the public `POST /testimonials`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTestimonial {
    #[validate(length(min = 1, max = 255, message = "authorName is required"))]
    pub author_name: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub author_role: String,
    #[validate(email(message = "authorEmail must be a valid email address"), length(max = 255))]
    pub author_email: String,
    #[validate(length(min = 1, max = 4000, message = "content is required"))]
    pub content: String,
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i32,
}

impl SubmitTestimonial {
    /// New testimonials always start out pending.
    pub fn into_active_model(self, now: NaiveDateTime) -> ActiveModel {
        ActiveModel {
            id: Set(Uuid::new_v4()),
            author_name: Set(self.author_name.trim().to_string()),
            author_role: Set(self.author_role.trim().to_string()),
            author_email: Set(self.author_email.trim().to_string()),
            content: Set(self.content.trim().to_string()),
            rating: Set(self.rating),
            status: Set(TestimonialStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}
