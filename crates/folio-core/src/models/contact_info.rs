use chrono::NaiveDateTime;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Public contact details. The table holds at most one row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "contact_info")]
#[schema(as = ContactInfo)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub twitter: String,
    pub website: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Contact details as returned to clients; all fields empty until set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfoPayload {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub location: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub linkedin: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub github: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub twitter: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub website: String,
}

impl ContactInfoPayload {
    pub fn apply(self, active: &mut ActiveModel) {
        active.email = Set(self.email);
        active.phone = Set(self.phone);
        active.location = Set(self.location);
        active.linkedin = Set(self.linkedin);
        active.github = Set(self.github);
        active.twitter = Set(self.twitter);
        active.website = Set(self.website);
    }
}

impl From<Model> for ContactInfoPayload {
    fn from(info: Model) -> Self {
        ContactInfoPayload {
            email: info.email,
            phone: info.phone,
            location: info.location,
            linkedin: info.linkedin,
            github: info.github,
            twitter: info.twitter,
            website: info.website,
        }
    }
}
