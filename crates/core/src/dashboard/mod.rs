//! Dashboard metrics.
//!
//! This module provides:
//! - Headline totals and the status histogram
//! - The trailing 12-month revenue trend
//! - Top clients by paid revenue
//! - Month-over-month growth

pub mod aggregator;
pub mod types;

#[cfg(test)]
mod aggregator_props;

pub use aggregator::{DashboardAggregator, MAX_DASHBOARD_DOCUMENTS, growth_percent};
pub use types::*;
