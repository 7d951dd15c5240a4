use chrono::NaiveDateTime;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::StringList;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "projects")]
#[schema(as = Project)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub title_fr: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub description_fr: String,
    pub image_url: String,
    pub live_url: String,
    pub code_url: String,
    #[schema(value_type = Vec<String>)]
    pub tags: StringList,
    pub featured: bool,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub title_fr: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[serde(default)]
    pub description_fr: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub image_url: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub live_url: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub code_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl ProjectPayload {
    pub fn apply(self, active: &mut ActiveModel) {
        active.title = Set(self.title.trim().to_string());
        active.title_fr = Set(self.title_fr);
        active.description = Set(self.description);
        active.description_fr = Set(self.description_fr);
        active.image_url = Set(self.image_url);
        active.live_url = Set(self.live_url);
        active.code_url = Set(self.code_url);
        active.tags = Set(self.tags.into());
        active.featured = Set(self.featured);
        active.sort_order = Set(self.sort_order);
    }
}
