//! Persistence for contact messages, including duplicate suppression.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, Set, Statement, TransactionTrait,
};
use uuid::Uuid;

use crate::guard::saturating_sub;
use crate::models::message::{self, Entity as Message, NewMessage};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A message with the same fingerprint was stored inside the window.
    #[error("duplicate message")]
    Duplicate,

    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

/// Where screened contact messages end up.
///
/// Implementations reject an insert when a message with the same
/// `fingerprint` was stored at or after `now - duplicate_window`.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn create_message(
        &self,
        message: NewMessage,
        fingerprint: &str,
        duplicate_window: Duration,
        now: DateTime<Utc>,
    ) -> Result<message::Model, StoreError>;
}

/// [`MessageStore`] backed by the `messages` table.
///
/// On Postgres the check and the insert run under a transaction-scoped
/// advisory lock keyed on the fingerprint, so concurrent identical
/// submissions are serialized. SQLite allows a single writer, which gives
/// the same guarantee.
#[derive(Clone)]
pub struct DbMessageStore {
    db: DatabaseConnection,
}

impl DbMessageStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageStore for DbMessageStore {
    async fn create_message(
        &self,
        message: NewMessage,
        fingerprint: &str,
        duplicate_window: Duration,
        now: DateTime<Utc>,
    ) -> Result<message::Model, StoreError> {
        let created_at = now.naive_utc();
        let since = saturating_sub(now, duplicate_window).naive_utc();

        let txn = self.db.begin().await?;

        if txn.get_database_backend() == DbBackend::Postgres {
            txn.execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT pg_advisory_xact_lock(hashtext($1))",
                [fingerprint.into()],
            ))
            .await?;
        }

        let existing = Message::find()
            .filter(message::Column::ContentHash.eq(fingerprint))
            .filter(message::Column::CreatedAt.gte(since))
            .one(&txn)
            .await?;

        if existing.is_some() {
            txn.rollback().await?;
            return Err(StoreError::Duplicate);
        }

        let stored = message::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(message.name),
            email: Set(message.email),
            subject: Set(message.subject),
            content: Set(message.content),
            content_hash: Set(fingerprint.to_string()),
            is_read: Set(false),
            created_at: Set(created_at),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(stored)
    }
}
