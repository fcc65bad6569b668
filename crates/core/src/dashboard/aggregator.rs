//! Reduces a user's recent documents into the dashboard.
//!
//! Input is bounded: at most [`MAX_DASHBOARD_DOCUMENTS`] snapshots, most
//! recent first. Everything is computed in one pass plus small sorts.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

use super::types::{
    ClientRevenue, DashboardSummary, DashboardTotals, DocumentSnapshot, GrowthMetric,
    GrowthMetrics, MonthlyRevenue, StatusCount,
};
use crate::document::DocumentStatus;

/// Most documents the dashboard looks at.
pub const MAX_DASHBOARD_DOCUMENTS: usize = 1000;

/// Months in the revenue trend.
pub const TREND_MONTHS: u32 = 12;

/// Clients shown in the leaderboard.
pub const TOP_CLIENTS: usize = 5;

/// Name used for documents without a client.
pub const UNKNOWN_CLIENT: &str = "Unknown client";

/// Percentage change from `previous` to `current`, rounded to 2 dp.
///
/// From zero: 100 when anything happened, 0 otherwise.
#[must_use]
pub fn growth_percent(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return if current > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
    }
    ((current - previous) / previous * Decimal::ONE_HUNDRED).round_dp(2)
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[derive(Default)]
struct MonthStats {
    revenue: Decimal,
    paid: u64,
    issued: u64,
    clients: HashSet<uuid::Uuid>,
}

impl MonthStats {
    fn add(&mut self, doc: &DocumentSnapshot) {
        self.issued += 1;
        if let Some(client_id) = doc.client_id {
            self.clients.insert(client_id);
        }
        if doc.status == DocumentStatus::Paid {
            self.revenue += doc.total;
            self.paid += 1;
        }
    }

    fn average(&self) -> Decimal {
        if self.paid == 0 {
            Decimal::ZERO
        } else {
            (self.revenue / Decimal::from(self.paid)).round_dp(2)
        }
    }
}

fn metric(current: Decimal, previous: Decimal) -> GrowthMetric {
    GrowthMetric {
        current,
        previous,
        growth_percent: growth_percent(current, previous),
    }
}

/// Dashboard aggregator.
pub struct DashboardAggregator;

impl DashboardAggregator {
    /// Builds the dashboard as of `today`.
    #[must_use]
    pub fn aggregate(documents: &[DocumentSnapshot], today: NaiveDate) -> DashboardSummary {
        let documents = &documents[..documents.len().min(MAX_DASHBOARD_DOCUMENTS)];

        let current_month = month_start(today);
        let previous_month = current_month
            .checked_sub_months(Months::new(1))
            .unwrap_or(current_month);
        let trend_start = current_month
            .checked_sub_months(Months::new(TREND_MONTHS - 1))
            .unwrap_or(current_month);

        let mut trend: Vec<MonthlyRevenue> = (0..TREND_MONTHS)
            .filter_map(|offset| trend_start.checked_add_months(Months::new(offset)))
            .map(|month| MonthlyRevenue {
                month: month.format("%Y-%m").to_string(),
                label: month.format("%b").to_string(),
                revenue: Decimal::ZERO,
            })
            .collect();

        let mut totals = DashboardTotals::default();
        let mut status_counts: HashMap<DocumentStatus, u64> = HashMap::new();
        let mut clients: Vec<ClientRevenue> = Vec::new();
        let mut client_index: HashMap<String, usize> = HashMap::new();
        let mut this_month = MonthStats::default();
        let mut last_month = MonthStats::default();

        for doc in documents {
            totals.document_count += 1;
            *status_counts.entry(doc.status).or_insert(0) += 1;

            match doc.status {
                DocumentStatus::Paid => {
                    totals.total_revenue += doc.total;
                    totals.paid_count += 1;
                }
                DocumentStatus::Sent => totals.pending_count += 1,
                DocumentStatus::Overdue => totals.overdue_count += 1,
                DocumentStatus::Draft => totals.draft_count += 1,
            }

            if same_month(doc.issue_date, current_month) {
                this_month.add(doc);
            } else if same_month(doc.issue_date, previous_month) {
                last_month.add(doc);
            }

            if doc.status != DocumentStatus::Paid {
                continue;
            }

            let issued = month_start(doc.issue_date);
            if issued >= trend_start && issued <= current_month {
                let offset = (issued.year() - trend_start.year()) * 12
                    + i32::try_from(issued.month()).unwrap_or(0)
                    - i32::try_from(trend_start.month()).unwrap_or(0);
                if let Some(bucket) = usize::try_from(offset).ok().and_then(|i| trend.get_mut(i)) {
                    bucket.revenue += doc.total;
                }
            }

            let name = doc
                .client_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(UNKNOWN_CLIENT);
            if let Some(&idx) = client_index.get(name) {
                clients[idx].revenue += doc.total;
            } else {
                client_index.insert(name.to_string(), clients.len());
                clients.push(ClientRevenue {
                    name: name.to_string(),
                    revenue: doc.total,
                });
            }
        }

        // Stable: ties keep first-seen order.
        clients.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        clients.truncate(TOP_CLIENTS);

        let status_distribution = DocumentStatus::ALL
            .into_iter()
            .filter_map(|status| {
                let count = status_counts.get(&status).copied().unwrap_or(0);
                (count > 0).then(|| StatusCount {
                    status: status.label().to_string(),
                    count,
                })
            })
            .collect();

        let growth = GrowthMetrics {
            revenue: metric(this_month.revenue, last_month.revenue),
            invoice_count: metric(
                Decimal::from(this_month.issued),
                Decimal::from(last_month.issued),
            ),
            active_clients: metric(
                Decimal::from(this_month.clients.len()),
                Decimal::from(last_month.clients.len()),
            ),
            average_invoice_value: metric(this_month.average(), last_month.average()),
        };

        DashboardSummary {
            totals,
            revenue_trend: trend,
            status_distribution,
            top_clients: clients,
            growth,
        }
    }
}
