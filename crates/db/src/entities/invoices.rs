//! `SeaORM` Entity for invoices table.
//!
//! Holds every document kind. `document_type` is null on rows written before
//! the column existed; those are invoices.
//!
//! Money columns are `NUMERIC(19,4)` in the migrations. The entity declares
//! `(16, 4)`, the widest precision the SQLite schema builder accepts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use invoxa_core::document::{DocumentKind, UnknownDocumentKind};

use super::sea_orm_active_enums::DocumentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_id: Option<Uuid>,
    pub document_type: Option<String>,
    pub invoice_number: String,
    pub status: DocumentStatus,
    pub issue_date: Date,
    pub due_date: Option<Date>,
    pub currency: String,
    pub notes: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((7, 4)))")]
    pub tax_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((7, 4)))")]
    pub discount_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub subtotal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub discount_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub tax_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub total: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id",
        on_delete = "SetNull"
    )]
    Clients,
    #[sea_orm(has_many = "super::invoice_items::Entity")]
    InvoiceItems,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::invoice_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The document's kind; untagged rows are invoices.
    ///
    /// # Errors
    ///
    /// Returns the tag when it is not a known kind.
    pub fn kind(&self) -> Result<DocumentKind, UnknownDocumentKind> {
        DocumentKind::from_stored(self.document_type.as_deref())
    }
}
