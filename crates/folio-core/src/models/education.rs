use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "education")]
#[schema(as = Education)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub degree: String,
    pub degree_fr: String,
    pub school: String,
    pub school_fr: String,
    pub location: String,
    pub location_fr: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub description_fr: String,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EducationPayload {
    #[validate(length(min = 1, max = 255, message = "degree is required"))]
    pub degree: String,
    #[serde(default)]
    pub degree_fr: String,
    #[validate(length(min = 1, max = 255, message = "school is required"))]
    pub school: String,
    #[serde(default)]
    pub school_fr: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub location_fr: String,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[serde(default, deserialize_with = "super::optional_date")]
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_fr: String,
    #[serde(default)]
    pub sort_order: i32,
}

impl EducationPayload {
    pub fn apply(self, active: &mut ActiveModel) {
        active.degree = Set(self.degree.trim().to_string());
        active.degree_fr = Set(self.degree_fr);
        active.school = Set(self.school.trim().to_string());
        active.school_fr = Set(self.school_fr);
        active.location = Set(self.location);
        active.location_fr = Set(self.location_fr);
        active.start_date = Set(self.start_date);
        active.end_date = Set(self.end_date);
        active.description = Set(self.description);
        active.description_fr = Set(self.description_fr);
        active.sort_order = Set(self.sort_order);
    }
}
