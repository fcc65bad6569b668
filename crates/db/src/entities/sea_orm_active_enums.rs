//! Enums stored as strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use invoxa_core::document::DocumentStatus as CoreDocumentStatus;

/// `invoices.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "overdue")]
    Overdue,
}

impl From<CoreDocumentStatus> for DocumentStatus {
    fn from(status: CoreDocumentStatus) -> Self {
        match status {
            CoreDocumentStatus::Draft => Self::Draft,
            CoreDocumentStatus::Sent => Self::Sent,
            CoreDocumentStatus::Paid => Self::Paid,
            CoreDocumentStatus::Overdue => Self::Overdue,
        }
    }
}

impl From<DocumentStatus> for CoreDocumentStatus {
    fn from(status: DocumentStatus) -> Self {
        match status {
            DocumentStatus::Draft => Self::Draft,
            DocumentStatus::Sent => Self::Sent,
            DocumentStatus::Paid => Self::Paid,
            DocumentStatus::Overdue => Self::Overdue,
        }
    }
}
