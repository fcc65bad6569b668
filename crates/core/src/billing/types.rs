//! Subscription and billing types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

/// The paid plan every gateway activates.
pub const PROFESSIONAL_PLAN: &str = "Professional";

/// Canonical subscription status.
///
/// Stored lowercase. Parsing ignores case so rows written as `ACTIVE`
/// still count as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Paid and current.
    Active,
    /// In a trial period.
    Trialing,
    /// Payment failed; gateway is retrying.
    PastDue,
    /// Cancelled by the user or the gateway.
    Cancelled,
    /// Period ended without renewal.
    Expired,
}

impl SubscriptionStatus {
    /// The stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Trialing => "trialing",
            Self::PastDue => "past_due",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }

    /// Parses a stored or gateway-provided status, ignoring case and
    /// accepting the American spelling of cancelled.
    #[must_use]
    pub fn parse_loose(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().replace('-', "_").as_str() {
            "active" => Some(Self::Active),
            "trialing" | "trial" => Some(Self::Trialing),
            "past_due" | "pastdue" => Some(Self::PastDue),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }

    /// Whether this status lifts the free-tier limits.
    #[must_use]
    pub const fn is_active_plan(self) -> bool {
        matches!(self, Self::Active | Self::Trialing)
    }

    /// Convenience for raw stored values; unknown values are not active.
    #[must_use]
    pub fn is_active_value(raw: &str) -> bool {
        Self::parse_loose(raw).is_some_and(Self::is_active_plan)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_loose(s).ok_or_else(|| format!("Unknown subscription status: {s}"))
    }
}

/// Payment gateway a subscription came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingProvider {
    /// PayPal subscriptions.
    PayPal,
    /// Paystack.
    Paystack,
    /// Yoco.
    Yoco,
}

impl BillingProvider {
    /// The stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PayPal => "paypal",
            Self::Paystack => "paystack",
            Self::Yoco => "yoco",
        }
    }
}

impl fmt::Display for BillingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often a subscription renews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    /// Renews every calendar month.
    #[default]
    Monthly,
    /// Renews every year.
    Annual,
}

impl BillingCycle {
    /// Reads the cycle from gateway metadata. Anything unrecognized is monthly.
    #[must_use]
    pub fn from_metadata(raw: Option<&str>) -> Self {
        match raw.map(|r| r.trim().to_lowercase()).as_deref() {
            Some("annual" | "annually" | "yearly" | "year") => Self::Annual,
            _ => Self::Monthly,
        }
    }

    /// End of a period starting at `start`.
    ///
    /// Month arithmetic clamps to the last day of shorter months
    /// (Jan 31 + 1 month = Feb 28/29).
    #[must_use]
    pub fn period_end(self, start: DateTime<Utc>) -> DateTime<Utc> {
        let months = match self {
            Self::Monthly => Months::new(1),
            Self::Annual => Months::new(12),
        };
        start.checked_add_months(months).unwrap_or(start)
    }
}
