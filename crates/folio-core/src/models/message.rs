use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::guard::Submission;

/// A message left through the contact form.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "messages")]
#[schema(as = Message)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    /// Duplicate-detection fingerprint; never leaves the server.
    #[sea_orm(indexed)]
    #[serde(skip)]
    pub content_hash: String,
    #[serde(rename = "read")]
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Body of the public `POST /contact`.
///
/// Besides the message itself it carries the anti-spam fields: the
/// `website` honeypot, the form render time and the Turnstile token.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    #[validate(length(min = 2, max = 120, message = "name must be 2 to 120 characters"))]
    pub name: String,
    #[validate(email(message = "email must be a valid email address"), length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 255, message = "subject is required"))]
    pub subject: String,
    #[validate(length(min = 10, max = 4000, message = "content must be 10 to 4000 characters"))]
    pub content: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub submitted_at_ms: i64,
    #[serde(default)]
    pub turnstile_token: String,
}

impl CreateMessageRequest {
    pub fn submission(&self) -> Submission<'_> {
        Submission {
            email: &self.email,
            subject: &self.subject,
            content: &self.content,
            honeypot: &self.website,
            submitted_at_ms: self.submitted_at_ms,
            captcha_token: &self.turnstile_token,
        }
    }
}

/// A screened message ready to be stored.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub content: String,
}

impl From<CreateMessageRequest> for NewMessage {
    fn from(req: CreateMessageRequest) -> Self {
        NewMessage {
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            subject: req.subject.trim().to_string(),
            content: req.content.trim().to_string(),
        }
    }
}
