//! Dashboard repository.
//!
//! Loads the bounded document snapshot the aggregator works on.

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use invoxa_core::dashboard::{
    DashboardAggregator, DashboardSummary, DocumentSnapshot, MAX_DASHBOARD_DOCUMENTS,
};
use invoxa_core::document::DocumentKind;

use super::document::kind_condition;
use crate::entities::{clients, invoices};

/// Dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The user's most recent invoices, newest first, capped at
    /// [`MAX_DASHBOARD_DOCUMENTS`].
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn recent_invoices(&self, user_id: Uuid) -> Result<Vec<DocumentSnapshot>, DbErr> {
        let rows = invoices::Entity::find()
            .filter(invoices::Column::UserId.eq(user_id))
            .filter(kind_condition(DocumentKind::Invoice))
            .order_by_desc(invoices::Column::IssueDate)
            .order_by_desc(invoices::Column::CreatedAt)
            .limit(MAX_DASHBOARD_DOCUMENTS as u64)
            .find_also_related(clients::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(doc, client)| DocumentSnapshot {
                id: doc.id,
                client_id: doc.client_id,
                client_name: client.map(|c| c.name),
                status: doc.status.into(),
                issue_date: doc.issue_date,
                total: doc.total,
            })
            .collect())
    }

    /// Loads and aggregates the dashboard as of `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn summary(&self, user_id: Uuid, today: NaiveDate) -> Result<DashboardSummary, DbErr> {
        let documents = self.recent_invoices(user_id).await?;
        Ok(DashboardAggregator::aggregate(&documents, today))
    }
}
