//! Property-based tests for the dashboard aggregator.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::aggregator::{DashboardAggregator, TOP_CLIENTS};
use super::types::DocumentSnapshot;
use crate::document::DocumentStatus;

fn snapshot_strategy() -> impl Strategy<Value = DocumentSnapshot> {
    (
        prop::option::of(0usize..8),
        prop::sample::select(DocumentStatus::ALL.to_vec()),
        0i64..900,
        0i64..1_000_000,
    )
        .prop_map(|(client, status, days_ago, cents)| {
            let today = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
            let names = ["A", "B", "C", "D", "E", "F", "G", "H"];
            DocumentSnapshot {
                id: Uuid::new_v4(),
                client_id: client.map(|i| Uuid::from_u128(i as u128 + 1)),
                client_name: client.map(|i| names[i].to_string()),
                status,
                issue_date: today - chrono::Duration::days(days_ago),
                total: Decimal::new(cents, 2),
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Trend always has 12 consecutive months, oldest first.
    #[test]
    fn prop_trend_has_twelve_ordered_months(
        docs in prop::collection::vec(snapshot_strategy(), 0..60),
    ) {
        let today = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let summary = DashboardAggregator::aggregate(&docs, today);

        prop_assert_eq!(summary.revenue_trend.len(), 12);
        prop_assert!(summary.revenue_trend.windows(2).all(|w| w[0].month < w[1].month));
        prop_assert_eq!(summary.revenue_trend[11].month.as_str(), "2026-06");
    }

    /// Top clients are at most five, in descending revenue.
    #[test]
    fn prop_top_clients_descending(
        docs in prop::collection::vec(snapshot_strategy(), 0..60),
    ) {
        let today = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let summary = DashboardAggregator::aggregate(&docs, today);

        prop_assert!(summary.top_clients.len() <= TOP_CLIENTS);
        prop_assert!(summary.top_clients.windows(2).all(|w| w[0].revenue >= w[1].revenue));
    }

    /// Status counts add up and revenue matches the paid documents.
    #[test]
    fn prop_counts_consistent(
        docs in prop::collection::vec(snapshot_strategy(), 0..60),
    ) {
        let today = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let summary = DashboardAggregator::aggregate(&docs, today);
        let t = &summary.totals;

        prop_assert_eq!(t.document_count, docs.len() as u64);
        prop_assert_eq!(
            t.paid_count + t.pending_count + t.overdue_count + t.draft_count,
            t.document_count
        );
        let histogram: u64 = summary.status_distribution.iter().map(|s| s.count).sum();
        prop_assert_eq!(histogram, t.document_count);
        prop_assert!(summary.status_distribution.iter().all(|s| s.count > 0));

        let paid: Decimal = docs
            .iter()
            .filter(|d| d.status == DocumentStatus::Paid)
            .map(|d| d.total)
            .sum();
        prop_assert_eq!(t.total_revenue, paid);
    }
}
