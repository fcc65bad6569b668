//! Paystack webhook events.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::error::BillingError;
use super::reconcile::{
    Activation, CancelTarget, Cancellation, UserRef, WebhookAction, non_empty,
};
use super::types::{BillingCycle, BillingProvider};

/// A charge succeeded.
pub const CHARGE_SUCCESS: &str = "charge.success";
/// A subscription was disabled.
pub const SUBSCRIPTION_DISABLE: &str = "subscription.disable";

/// Envelope of every Paystack webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct PaystackEvent {
    /// Event name, e.g. `charge.success`.
    pub event: String,
    /// Event data.
    #[serde(default)]
    pub data: PaystackData,
}

/// The subset of `data` used for reconciliation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaystackData {
    /// Transaction reference.
    pub reference: Option<String>,
    /// Subscription code on subscription events.
    pub subscription_code: Option<String>,
    /// Customer.
    pub customer: Option<PaystackCustomer>,
    /// Free-form metadata set at checkout. Paystack sometimes sends it as a
    /// JSON-encoded string.
    #[serde(default)]
    pub metadata: Value,
}

/// Customer details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaystackCustomer {
    /// Customer email.
    pub email: Option<String>,
    /// Customer code.
    pub customer_code: Option<String>,
}

impl PaystackData {
    fn metadata_object(&self) -> Option<serde_json::Map<String, Value>> {
        match &self.metadata {
            Value::Object(map) => Some(map.clone()),
            Value::String(raw) => serde_json::from_str(raw).ok(),
            _ => None,
        }
    }

    fn metadata_str(&self, key: &str) -> Option<String> {
        self.metadata_object()?
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Billing cycle chosen at checkout.
    #[must_use]
    pub fn billing_cycle(&self) -> BillingCycle {
        BillingCycle::from_metadata(self.metadata_str("billing_cycle").as_deref())
    }

    fn email(&self) -> Option<String> {
        non_empty(self.customer.as_ref().and_then(|c| c.email.as_deref()))
    }

    fn user(&self) -> Result<UserRef, BillingError> {
        if let Some(raw) = self.metadata_str("user_id") {
            let id = Uuid::parse_str(raw.trim()).map_err(|_| BillingError::InvalidUserId(raw))?;
            return Ok(UserRef::Id(id));
        }
        self.email()
            .map(UserRef::Email)
            .ok_or(BillingError::MissingField("customer email"))
    }
}

impl PaystackEvent {
    /// Parses a webhook body. Verify the signature first.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::MalformedPayload` when the body is not a Paystack event.
    pub fn parse(body: &[u8]) -> Result<Self, BillingError> {
        serde_json::from_slice(body).map_err(|e| BillingError::MalformedPayload(e.to_string()))
    }

    /// Interprets the event.
    ///
    /// # Errors
    ///
    /// Returns an error when a handled event carries no usable user reference.
    pub fn into_action(self, now: DateTime<Utc>) -> Result<WebhookAction, BillingError> {
        match self.event.as_str() {
            CHARGE_SUCCESS => {
                let data = &self.data;
                let mut activation =
                    Activation::professional(data.user()?, BillingProvider::Paystack, now);
                activation.period_end = Some(data.billing_cycle().period_end(now));
                activation.refs.paystack_reference = non_empty(data.reference.as_deref());
                activation.refs.paystack_customer_code = non_empty(
                    data.customer
                        .as_ref()
                        .and_then(|c| c.customer_code.as_deref()),
                );
                activation.refs.paystack_subscription_code =
                    non_empty(data.subscription_code.as_deref());
                Ok(WebhookAction::Activate(activation))
            }
            SUBSCRIPTION_DISABLE => {
                let target = match (self.data.email(), non_empty(self.data.subscription_code.as_deref())) {
                    (Some(email), _) => CancelTarget::User(UserRef::Email(email)),
                    (None, Some(code)) => CancelTarget::PaystackSubscription(code),
                    (None, None) => return Err(BillingError::MissingField("customer email")),
                };
                Ok(WebhookAction::Cancel(Cancellation {
                    provider: BillingProvider::Paystack,
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
    use chrono::TimeZone;
    use serde_json::json;

    fn parse(value: &serde_json::Value) -> PaystackEvent {
        PaystackEvent::parse(value.to_string().as_bytes()).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 15, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_charge_success_annual() {
        let event = parse(&json!({
            "event": "charge.success",
            "data": {
                "reference": "ref_123",
                "customer": { "email": "owner@shop.test", "customer_code": "CUS_1" },
                "metadata": { "billing_cycle": "annual" }
            }
        }));

        let WebhookAction::Activate(activation) = event.into_action(now()).unwrap() else {
            panic!("expected activation");
        };
        assert_eq!(activation.user, UserRef::Email("owner@shop.test".into()));
        assert_eq!(
            activation.period_end,
            Some(Utc.with_ymd_and_hms(2027, 5, 15, 9, 0, 0).unwrap())
        );
        assert_eq!(activation.refs.paystack_reference.as_deref(), Some("ref_123"));
        assert_eq!(activation.refs.paystack_customer_code.as_deref(), Some("CUS_1"));
    }

    #[test]
    fn test_charge_success_defaults_to_monthly() {
        let event = parse(&json!({
            "event": "charge.success",
            "data": { "customer": { "email": "owner@shop.test" } }
        }));

        let WebhookAction::Activate(activation) = event.into_action(now()).unwrap() else {
            panic!("expected activation");
        };
        assert_eq!(
            activation.period_end,
            Some(Utc.with_ymd_and_hms(2026, 6, 15, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_metadata_as_string_and_user_id() {
        let user_id = Uuid::new_v4();
        let metadata = json!({ "user_id": user_id.to_string(), "billing_cycle": "yearly" });
        let event = parse(&json!({
            "event": "charge.success",
            "data": { "metadata": metadata.to_string() }
        }));

        let WebhookAction::Activate(activation) = event.into_action(now()).unwrap() else {
            panic!("expected activation");
        };
        assert_eq!(activation.user, UserRef::Id(user_id));
        assert_eq!(
            activation.period_end,
            Some(Utc.with_ymd_and_hms(2027, 5, 15, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_charge_without_customer_rejected() {
        let event = parse(&json!({ "event": "charge.success", "data": {} }));
        assert_eq!(
            event.into_action(now()),
            Err(BillingError::MissingField("customer email"))
        );
    }

    #[test]
    fn test_subscription_disable() {
        let event = parse(&json!({
            "event": "subscription.disable",
            "data": {
                "subscription_code": "SUB_1",
                "customer": { "email": "owner@shop.test" }
            }
        }));
        assert_eq!(
            event.into_action(now()).unwrap(),
            WebhookAction::Cancel(Cancellation {
                provider: BillingProvider::Paystack,
                target: CancelTarget::User(UserRef::Email("owner@shop.test".into())),
            })
        );
    }
}
