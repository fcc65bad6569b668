//! Catalog item repository.
//!
//! Items are owned per user like every other row.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::items;

/// Error types for item operations.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    /// Item not found (or owned by someone else).
    #[error("Item not found: {0}")]
    NotFound(Uuid),

    /// Rate is negative.
    #[error("Item rate cannot be negative")]
    NegativeRate,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Item repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    db: DatabaseConnection,
}

impl ItemRepository {
    /// Creates a new item repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a user's items.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<items::Model>, ItemError> {
        let items = items::Entity::find()
            .filter(items::Column::UserId.eq(user_id))
            .order_by_asc(items::Column::Description)
            .all(&self.db)
            .await?;
        Ok(items)
    }

    /// Creates an item.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::NegativeRate` for a negative rate.
    pub async fn create(
        &self,
        user_id: Uuid,
        description: String,
        rate: Decimal,
    ) -> Result<items::Model, ItemError> {
        if rate < Decimal::ZERO {
            return Err(ItemError::NegativeRate);
        }

        let now = Utc::now().into();
        let item = items::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            description: Set(description),
            rate: Set(rate),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(item.insert(&self.db).await?)
    }

    /// Replaces an item's description and rate.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::NotFound` if the user has no such item.
    pub async fn update(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        description: String,
        rate: Decimal,
    ) -> Result<items::Model, ItemError> {
        if rate < Decimal::ZERO {
            return Err(ItemError::NegativeRate);
        }

        let item = items::Entity::find_by_id(item_id)
            .filter(items::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(ItemError::NotFound(item_id))?;

        let mut active: items::ActiveModel = item.into();
        active.description = Set(description);
        active.rate = Set(rate);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an item.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::NotFound` if the user has no such item.
    pub async fn delete(&self, user_id: Uuid, item_id: Uuid) -> Result<(), ItemError> {
        let result = items::Entity::delete_many()
            .filter(items::Column::Id.eq(item_id))
            .filter(items::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ItemError::NotFound(item_id));
        }
        Ok(())
    }
}
