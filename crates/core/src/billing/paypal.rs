//! PayPal webhook events.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::error::BillingError;
use super::reconcile::{
    Activation, CancelTarget, Cancellation, UserRef, WebhookAction, non_empty,
};
use super::types::BillingProvider;

/// A one-off or recurring payment was captured.
pub const PAYMENT_SALE_COMPLETED: &str = "PAYMENT.SALE.COMPLETED";
/// A subscription became active.
pub const SUBSCRIPTION_ACTIVATED: &str = "BILLING.SUBSCRIPTION.ACTIVATED";
/// A subscription was cancelled.
pub const SUBSCRIPTION_CANCELLED: &str = "BILLING.SUBSCRIPTION.CANCELLED";

/// Envelope of every PayPal webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct PayPalEvent {
    /// Event name, e.g. `PAYMENT.SALE.COMPLETED`.
    pub event_type: String,
    /// Event-specific resource.
    #[serde(default)]
    pub resource: PayPalResource,
}

/// The subset of the resource object used for reconciliation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayPalResource {
    /// Resource id (subscription id on subscription events).
    pub id: Option<String>,
    /// Subscription id on sale events.
    pub billing_agreement_id: Option<String>,
    /// Payer on sale events.
    pub payer: Option<PayPalPayer>,
    /// Subscriber on subscription events.
    pub subscriber: Option<PayPalSubscriber>,
}

/// Payer details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayPalPayer {
    /// Newer API shape.
    pub email_address: Option<String>,
    /// Classic API shape.
    pub payer_info: Option<PayPalPayerInfo>,
}

/// Classic payer info.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayPalPayerInfo {
    /// Payer email.
    pub email: Option<String>,
}

/// Subscriber details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayPalSubscriber {
    /// Subscriber email.
    pub email_address: Option<String>,
}

impl PayPalResource {
    /// Email of whoever paid or subscribed.
    #[must_use]
    pub fn email(&self) -> Option<String> {
        let subscriber = self
            .subscriber
            .as_ref()
            .and_then(|s| s.email_address.as_deref());
        let payer = self.payer.as_ref().and_then(|p| {
            p.email_address
                .as_deref()
                .or_else(|| p.payer_info.as_ref().and_then(|i| i.email.as_deref()))
        });
        non_empty(subscriber.or(payer))
    }

    /// Subscription id regardless of event family.
    #[must_use]
    pub fn subscription_id(&self) -> Option<String> {
        non_empty(self.billing_agreement_id.as_deref()).or_else(|| non_empty(self.id.as_deref()))
    }
}

impl PayPalEvent {
    /// Parses a webhook body.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::MalformedPayload` when the body is not a PayPal event.
    pub fn parse(body: &[u8]) -> Result<Self, BillingError> {
        serde_json::from_slice(body).map_err(|e| BillingError::MalformedPayload(e.to_string()))
    }

    /// Interprets the event.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::MissingField` when a handled event carries no
    /// way to find the user.
    pub fn into_action(self, now: DateTime<Utc>) -> Result<WebhookAction, BillingError> {
        match self.event_type.as_str() {
            PAYMENT_SALE_COMPLETED | SUBSCRIPTION_ACTIVATED => {
                let email = self
                    .resource
                    .email()
                    .ok_or(BillingError::MissingField("payer email"))?;
                let mut activation =
                    Activation::professional(UserRef::Email(email), BillingProvider::PayPal, now);
                activation.refs.paypal_subscription_id = self.resource.subscription_id();
                Ok(WebhookAction::Activate(activation))
            }
            SUBSCRIPTION_CANCELLED => {
                let target = match (self.resource.email(), self.resource.subscription_id()) {
                    (Some(email), _) => CancelTarget::User(UserRef::Email(email)),
                    (None, Some(id)) => CancelTarget::PayPalSubscription(id),
                    (None, None) => return Err(BillingError::MissingField("subscriber")),
                };
                Ok(WebhookAction::Cancel(Cancellation {
                    provider: BillingProvider::PayPal,
                    target,
                }))
            }
            other => Ok(WebhookAction::ignore_event(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: &serde_json::Value) -> PayPalEvent {
        PayPalEvent::parse(value.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn test_sale_completed_activates_professional() {
        let now = Utc::now();
        let event = parse(&json!({
            "event_type": "PAYMENT.SALE.COMPLETED",
            "resource": {
                "id": "SALE-1",
                "billing_agreement_id": "I-SUB123",
                "payer": { "payer_info": { "email": "owner@shop.test" } }
            }
        }));

        let WebhookAction::Activate(activation) = event.into_action(now).unwrap() else {
            panic!("expected activation");
        };
        assert_eq!(activation.user, UserRef::Email("owner@shop.test".into()));
        assert_eq!(activation.plan_id, "Professional");
        assert_eq!(activation.provider, BillingProvider::PayPal);
        assert_eq!(activation.period_start, now);
        assert_eq!(
            activation.refs.paypal_subscription_id.as_deref(),
            Some("I-SUB123")
        );
    }

    #[test]
    fn test_subscription_activated_uses_subscriber_email() {
        let event = parse(&json!({
            "event_type": "BILLING.SUBSCRIPTION.ACTIVATED",
            "resource": {
                "id": "I-SUB9",
                "subscriber": { "email_address": "buyer@shop.test" }
            }
        }));

        let WebhookAction::Activate(activation) = event.into_action(Utc::now()).unwrap() else {
            panic!("expected activation");
        };
        assert_eq!(activation.user, UserRef::Email("buyer@shop.test".into()));
        assert_eq!(activation.refs.paypal_subscription_id.as_deref(), Some("I-SUB9"));
    }

    #[test]
    fn test_sale_without_email_is_rejected() {
        let event = parse(&json!({
            "event_type": "PAYMENT.SALE.COMPLETED",
            "resource": { "id": "SALE-1" }
        }));
        assert_eq!(
            event.into_action(Utc::now()),
            Err(BillingError::MissingField("payer email"))
        );
    }

    #[test]
    fn test_cancel_by_subscription_id() {
        let event = parse(&json!({
            "event_type": "BILLING.SUBSCRIPTION.CANCELLED",
            "resource": { "id": "I-SUB9" }
        }));
        assert_eq!(
            event.into_action(Utc::now()).unwrap(),
            WebhookAction::Cancel(Cancellation {
                provider: BillingProvider::PayPal,
                target: CancelTarget::PayPalSubscription("I-SUB9".into()),
            })
        );
    }

    #[test]
    fn test_other_events_ignored() {
        let event = parse(&json!({ "event_type": "PAYMENT.SALE.REFUNDED" }));
        assert!(matches!(
            event.into_action(Utc::now()).unwrap(),
            WebhookAction::Ignore(_)
        ));
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            PayPalEvent::parse(b"not json"),
            Err(BillingError::MalformedPayload(_))
        ));
    }
}
