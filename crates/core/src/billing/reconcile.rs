//! What a webhook asks the subscription store to do.
//!
//! Gateway payloads are parsed into a [`WebhookAction`]; persisting it is
//! the database layer's job. Activations are upserts keyed by user, so
//! replaying the same event converges on one active row.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::types::{BillingProvider, PROFESSIONAL_PLAN};

/// How a webhook identifies the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    /// Our own user id, passed through gateway metadata.
    Id(Uuid),
    /// Email the customer paid with.
    Email(String),
}

/// Gateway identifiers stored alongside a subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderRefs {
    /// PayPal subscription (billing agreement) id.
    pub paypal_subscription_id: Option<String>,
    /// Paystack transaction reference.
    pub paystack_reference: Option<String>,
    /// Paystack subscription code.
    pub paystack_subscription_code: Option<String>,
    /// Paystack customer code.
    pub paystack_customer_code: Option<String>,
    /// Yoco charge id; also the idempotency key for Yoco events.
    pub yoco_charge_id: Option<String>,
}

/// Move a user onto an active paid plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// Who paid.
    pub user: UserRef,
    /// Gateway that reported the payment.
    pub provider: BillingProvider,
    /// Plan being activated.
    pub plan_id: String,
    /// Start of the paid period.
    pub period_start: DateTime<Utc>,
    /// End of the paid period, when the gateway tells us.
    pub period_end: Option<DateTime<Utc>>,
    /// Gateway identifiers.
    pub refs: ProviderRefs,
}

impl Activation {
    /// An activation of the Professional plan starting `now`.
    #[must_use]
    pub fn professional(user: UserRef, provider: BillingProvider, now: DateTime<Utc>) -> Self {
        Self {
            user,
            provider,
            plan_id: PROFESSIONAL_PLAN.to_string(),
            period_start: now,
            period_end: None,
            refs: ProviderRefs::default(),
        }
    }
}

/// Which subscription a cancellation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelTarget {
    /// The user's subscription.
    User(UserRef),
    /// The row carrying this PayPal subscription id.
    PayPalSubscription(String),
    /// The row carrying this Paystack subscription code.
    PaystackSubscription(String),
}

/// Mark a subscription cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancellation {
    /// Gateway that reported the cancellation.
    pub provider: BillingProvider,
    /// Row to cancel.
    pub target: CancelTarget,
}

/// Result of interpreting one webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookAction {
    /// Upsert an active subscription.
    Activate(Activation),
    /// Cancel a subscription.
    Cancel(Cancellation),
    /// Acknowledge without changes.
    Ignore(String),
}

impl WebhookAction {
    pub(crate) fn ignore_event(event: &str) -> Self {
        Self::Ignore(format!("event {event} not handled"))
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
