//! Client repository.
//!
//! Every query is scoped to the owning user.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::entities::{clients, invoices};

/// Error types for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client not found (or owned by someone else).
    #[error("Client not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or replacing a client.
#[derive(Debug, Clone)]
pub struct ClientInput {
    /// Display name.
    pub name: String,
    /// Email documents are sent to.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Tax identifier.
    pub tax_id: Option<String>,
}

/// Client repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a user's clients by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<clients::Model>, ClientError> {
        let clients = clients::Entity::find()
            .filter(clients::Column::UserId.eq(user_id))
            .order_by_asc(clients::Column::Name)
            .all(&self.db)
            .await?;
        Ok(clients)
    }

    /// Gets one client.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the user has no such client.
    pub async fn get(&self, user_id: Uuid, client_id: Uuid) -> Result<clients::Model, ClientError> {
        clients::Entity::find_by_id(client_id)
            .filter(clients::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(ClientError::NotFound(client_id))
    }

    /// Creates a client. The caller is responsible for the limit check.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: ClientInput,
    ) -> Result<clients::Model, ClientError> {
        let now = Utc::now().into();
        let client = clients::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            tax_id: Set(input.tax_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(client.insert(&self.db).await?)
    }

    /// Replaces a client's details.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the user has no such client.
    pub async fn update(
        &self,
        user_id: Uuid,
        client_id: Uuid,
        input: ClientInput,
    ) -> Result<clients::Model, ClientError> {
        let client = self.get(user_id, client_id).await?;

        let mut active: clients::ActiveModel = client.into();
        active.name = Set(input.name);
        active.email = Set(input.email);
        active.phone = Set(input.phone);
        active.address = Set(input.address);
        active.tax_id = Set(input.tax_id);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a client. Its documents are kept and lose their client.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the user has no such client.
    pub async fn delete(&self, user_id: Uuid, client_id: Uuid) -> Result<(), ClientError> {
        let txn = self.db.begin().await?;

        let exists = clients::Entity::find_by_id(client_id)
            .filter(clients::Column::UserId.eq(user_id))
            .one(&txn)
            .await?;
        if exists.is_none() {
            return Err(ClientError::NotFound(client_id));
        }

        invoices::Entity::update_many()
            .col_expr(invoices::Column::ClientId, Expr::value(Option::<Uuid>::None))
            .filter(invoices::Column::ClientId.eq(client_id))
            .filter(invoices::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        clients::Entity::delete_by_id(client_id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}
