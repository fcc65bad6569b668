//! Contact form and support inbox repository.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};
use uuid::Uuid;

use crate::entities::{contact_messages, support_messages};

/// Status of a new support request.
pub const SUPPORT_STATUS_OPEN: &str = "open";

/// A marketing-site contact form submission.
#[derive(Debug, Clone)]
pub struct ContactInput {
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Optional subject.
    pub subject: Option<String>,
    /// Message body.
    pub message: String,
}

/// Message repository.
#[derive(Debug, Clone)]
pub struct MessageRepository {
    db: DatabaseConnection,
}

impl MessageRepository {
    /// Creates a new message repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a contact form submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_contact(&self, input: ContactInput) -> Result<contact_messages::Model, DbErr> {
        contact_messages::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            email: Set(input.email),
            subject: Set(input.subject),
            message: Set(input.message),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
    }

    /// Opens a support request for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_support(
        &self,
        user_id: Uuid,
        subject: String,
        message: String,
    ) -> Result<support_messages::Model, DbErr> {
        support_messages::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            subject: Set(subject),
            message: Set(message),
            status: Set(SUPPORT_STATUS_OPEN.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
    }
}
