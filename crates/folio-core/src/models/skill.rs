use chrono::NaiveDateTime;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A skill shown on the portfolio.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "skills")]
#[schema(as = Skill)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    /// 0 to 100
    pub proficiency: i32,
    pub category: String,
    pub sort_order: i32,
    /// Hidden skills are left out of `/portfolio` only.
    pub show_in_portfolio: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Body of `POST /skills` and `PUT /skills/{id}`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkillPayload {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub icon: String,
    #[validate(range(min = 0, max = 100, message = "proficiency must be between 0 and 100"))]
    pub proficiency: i32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "super::default_true")]
    pub show_in_portfolio: bool,
}

impl SkillPayload {
    pub fn apply(self, active: &mut ActiveModel) {
        active.name = Set(self.name.trim().to_string());
        active.icon = Set(self.icon);
        active.proficiency = Set(self.proficiency);
        active.category = Set(self.category);
        active.sort_order = Set(self.sort_order);
        active.show_in_portfolio = Set(self.show_in_portfolio);
    }
}
