//! Yoco webhook events.
//!
//! Yoco webhooks are not signed in this integration, so the charge id is
//! the only replay guard.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::error::BillingError;
use super::reconcile::{Activation, UserRef, WebhookAction, non_empty};
use super::types::{BillingCycle, BillingProvider};

/// A payment went through.
pub const PAYMENT_SUCCEEDED: &str = "payment.succeeded";

/// Envelope of every Yoco webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct YocoEvent {
    /// Event name, e.g. `payment.succeeded`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event payload.
    #[serde(default)]
    pub payload: YocoPayload,
}

/// The subset of the payload used for reconciliation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YocoPayload {
    /// Charge id.
    pub id: Option<String>,
    /// Metadata set at checkout.
    #[serde(default)]
    pub metadata: YocoMetadata,
}

/// Checkout metadata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YocoMetadata {
    /// Our user id.
    #[serde(alias = "user_id")]
    pub user_id: Option<String>,
    /// Customer email.
    pub email: Option<String>,
    /// Billing cycle chosen at checkout.
    #[serde(alias = "billing_cycle")]
    pub billing_cycle: Option<String>,
}

impl YocoEvent {
    /// Parses a webhook body.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::MalformedPayload` when the body is not a Yoco event.
    pub fn parse(body: &[u8]) -> Result<Self, BillingError> {
        serde_json::from_slice(body).map_err(|e| BillingError::MalformedPayload(e.to_string()))
    }

    /// Interprets the event. The user comes from metadata `user_id`, falling
    /// back to the email.
    ///
    /// # Errors
    ///
    /// Returns an error when a payment has no charge id or no user reference.
    pub fn into_action(self, now: DateTime<Utc>) -> Result<WebhookAction, BillingError> {
        if self.event_type != PAYMENT_SUCCEEDED {
            return Ok(WebhookAction::ignore_event(&self.event_type));
        }

        let charge_id =
            non_empty(self.payload.id.as_deref()).ok_or(BillingError::MissingField("charge id"))?;
        let metadata = self.payload.metadata;

        let user = if let Some(raw) = non_empty(metadata.user_id.as_deref()) {
            UserRef::Id(Uuid::parse_str(&raw).map_err(|_| BillingError::InvalidUserId(raw))?)
        } else {
            non_empty(metadata.email.as_deref())
                .map(UserRef::Email)
                .ok_or(BillingError::MissingField("user_id or email"))?
        };

        let mut activation = Activation::professional(user, BillingProvider::Yoco, now);
        activation.period_end =
            Some(BillingCycle::from_metadata(metadata.billing_cycle.as_deref()).period_end(now));
        activation.refs.yoco_charge_id = Some(charge_id);
        Ok(WebhookAction::Activate(activation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: &serde_json::Value) -> YocoEvent {
        YocoEvent::parse(value.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn test_payment_succeeded_with_user_id() {
        let user_id = Uuid::new_v4();
        let event = parse(&json!({
            "type": "payment.succeeded",
            "payload": {
                "id": "ch_123",
                "metadata": { "userId": user_id.to_string(), "email": "x@shop.test" }
            }
        }));

        let WebhookAction::Activate(activation) = event.into_action(Utc::now()).unwrap() else {
            panic!("expected activation");
        };
        assert_eq!(activation.user, UserRef::Id(user_id));
        assert_eq!(activation.refs.yoco_charge_id.as_deref(), Some("ch_123"));
        assert!(activation.period_end.is_some());
    }

    #[test]
    fn test_payment_succeeded_falls_back_to_email() {
        let event = parse(&json!({
            "type": "payment.succeeded",
            "payload": { "id": "ch_9", "metadata": { "email": "owner@shop.test" } }
        }));

        let WebhookAction::Activate(activation) = event.into_action(Utc::now()).unwrap() else {
            panic!("expected activation");
        };
        assert_eq!(activation.user, UserRef::Email("owner@shop.test".into()));
    }

    #[test]
    fn test_snake_case_user_id_accepted() {
        let user_id = Uuid::new_v4();
        let event = parse(&json!({
            "type": "payment.succeeded",
            "payload": { "id": "ch_1", "metadata": { "user_id": user_id.to_string() } }
        }));

        let WebhookAction::Activate(activation) = event.into_action(Utc::now()).unwrap() else {
            panic!("expected activation");
        };
        assert_eq!(activation.user, UserRef::Id(user_id));
    }

    #[test]
    fn test_missing_user_and_bad_user_id() {
        let event = parse(&json!({
            "type": "payment.succeeded",
            "payload": { "id": "ch_1" }
        }));
        assert_eq!(
            event.into_action(Utc::now()),
            Err(BillingError::MissingField("user_id or email"))
        );

        let event = parse(&json!({
            "type": "payment.succeeded",
            "payload": { "id": "ch_1", "metadata": { "userId": "nope" } }
        }));
        assert_eq!(
            event.into_action(Utc::now()),
            Err(BillingError::InvalidUserId("nope".into()))
        );
    }

    #[test]
    fn test_other_events_ignored() {
        let event = parse(&json!({ "type": "refund.succeeded", "payload": { "id": "r_1" } }));
        assert!(matches!(
            event.into_action(Utc::now()).unwrap(),
            WebhookAction::Ignore(_)
        ));
    }
}
