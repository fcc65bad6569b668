//! Dashboard data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::DocumentStatus;

/// The fields of a document the dashboard needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    /// Document ID.
    pub id: Uuid,
    /// Client, if one is attached.
    pub client_id: Option<Uuid>,
    /// Client display name, if one is attached.
    pub client_name: Option<String>,
    /// Current status.
    pub status: DocumentStatus,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Document total.
    pub total: Decimal,
}

/// Dashboard response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Headline counters.
    pub totals: DashboardTotals,
    /// Paid revenue for the trailing 12 months, oldest first.
    pub revenue_trend: Vec<MonthlyRevenue>,
    /// Documents per status.
    pub status_distribution: Vec<StatusCount>,
    /// Best clients by paid revenue.
    pub top_clients: Vec<ClientRevenue>,
    /// This month against last month.
    pub growth: GrowthMetrics,
}

/// Headline counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardTotals {
    /// Sum of paid totals.
    pub total_revenue: Decimal,
    /// Paid documents.
    pub paid_count: u64,
    /// Sent and awaiting payment.
    pub pending_count: u64,
    /// Marked overdue.
    pub overdue_count: u64,
    /// Still drafts.
    pub draft_count: u64,
    /// Everything aggregated.
    pub document_count: u64,
}

/// One bucket of the revenue trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// `YYYY-MM`.
    pub month: String,
    /// Short month name, e.g. `Mar`.
    pub label: String,
    /// Paid revenue issued that month.
    pub revenue: Decimal,
}

/// Count of documents in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    /// Label-cased status, e.g. `Paid`.
    pub status: String,
    /// Number of documents.
    pub count: u64,
}

/// Paid revenue of one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRevenue {
    /// Client name, or `Unknown client`.
    pub name: String,
    /// Sum of paid totals.
    pub revenue: Decimal,
}

/// A metric this month vs last month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthMetric {
    /// Current month to date.
    pub current: Decimal,
    /// Previous full month.
    pub previous: Decimal,
    /// Percentage change, two decimal places.
    pub growth_percent: Decimal,
}

/// Month-over-month growth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthMetrics {
    /// Paid revenue.
    pub revenue: GrowthMetric,
    /// Documents issued.
    pub invoice_count: GrowthMetric,
    /// Distinct clients with a document issued.
    pub active_clients: GrowthMetric,
    /// Revenue per paid document.
    pub average_invoice_value: GrowthMetric,
}
