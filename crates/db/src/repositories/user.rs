//! User repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{profiles, users};

/// Default profile currency for new accounts.
pub const DEFAULT_CURRENCY: &str = "USD";
/// Default profile timezone for new accounts.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Input for registering a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Normalized email.
    pub email: String,
    /// Argon2 hash.
    pub password_hash: String,
    /// Full name.
    pub full_name: String,
    /// Business name for the profile.
    pub business_name: String,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a user together with their profile.
    ///
    /// # Errors
    ///
    /// Returns an error if either insert fails; nothing is written then.
    pub async fn create_with_profile(
        &self,
        input: CreateUserInput,
    ) -> Result<(users::Model, profiles::Model), DbErr> {
        let now = Utc::now().into();
        let txn = self.db.begin().await?;

        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email.clone()),
            password_hash: Set(input.password_hash),
            full_name: Set(input.full_name),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let profile = profiles::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            business_name: Set(input.business_name),
            address: Set(None),
            email: Set(Some(input.email)),
            phone: Set(None),
            logo_url: Set(None),
            accent_color: Set(None),
            currency: Set(DEFAULT_CURRENCY.to_string()),
            timezone: Set(DEFAULT_TIMEZONE.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok((user, profile))
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
