use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::StringList;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "experiences")]
#[schema(as = Experience)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub title_fr: String,
    pub company: String,
    pub company_fr: String,
    pub location: String,
    pub location_fr: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current: bool,
    /// One bullet point per entry
    #[schema(value_type = Vec<String>)]
    pub description: StringList,
    #[schema(value_type = Vec<String>)]
    pub description_fr: StringList,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePayload {
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub title_fr: String,
    #[validate(length(min = 1, max = 255, message = "company is required"))]
    pub company: String,
    #[serde(default)]
    pub company_fr: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub location_fr: String,
    /// `YYYY-MM-DD`
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    /// `YYYY-MM-DD`, empty or absent for none
    #[serde(default, deserialize_with = "super::optional_date")]
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub description_fr: Vec<String>,
    #[serde(default)]
    pub sort_order: i32,
}

impl ExperiencePayload {
    pub fn apply(self, active: &mut ActiveModel) {
        active.title = Set(self.title.trim().to_string());
        active.title_fr = Set(self.title_fr);
        active.company = Set(self.company.trim().to_string());
        active.company_fr = Set(self.company_fr);
        active.location = Set(self.location);
        active.location_fr = Set(self.location_fr);
        active.start_date = Set(self.start_date);
        active.end_date = Set(self.end_date);
        active.current = Set(self.current);
        active.description = Set(self.description.into());
        active.description_fr = Set(self.description_fr.into());
        active.sort_order = Set(self.sort_order);
    }
}
