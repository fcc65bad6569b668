//! Payment gateway webhooks.
//!
//! Each handler turns the gateway event into a [`WebhookAction`] and lets the
//! subscription repository apply it. Malformed payloads answer 400 and
//! unknown users 404; nothing is retried here, the gateways redeliver.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::AppState;
use crate::error::ApiResult;
use crate::gateways::GatewayError;
use invoxa_core::billing::{
    PayPalEvent, PaystackEvent, WebhookAction, YocoEvent, verify_paystack_signature,
};
use invoxa_db::repositories::{ReconcileOutcome, SubscriptionRepository};

/// Header carrying the Paystack HMAC.
pub const PAYSTACK_SIGNATURE_HEADER: &str = "x-paystack-signature";

/// Creates the webhook routes. They are public; Paystack is authenticated by
/// its signature.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/webhooks/paypal", post(paypal_webhook))
        .route("/webhooks/paystack", post(paystack_webhook))
        .route("/webhooks/yoco", post(yoco_webhook))
}

/// Acknowledgement returned to the gateway.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    /// Always true; failures use error statuses.
    pub received: bool,
    /// What the event did.
    pub outcome: &'static str,
}

impl From<&ReconcileOutcome> for WebhookAck {
    fn from(outcome: &ReconcileOutcome) -> Self {
        let outcome = match outcome {
            ReconcileOutcome::Activated { .. } => "activated",
            ReconcileOutcome::AlreadyApplied { .. } => "already_applied",
            ReconcileOutcome::Cancelled { .. } => "cancelled",
            ReconcileOutcome::Ignored(_) => "ignored",
        };
        Self {
            received: true,
            outcome,
        }
    }
}

async fn apply(state: &AppState, gateway: &'static str, action: WebhookAction) -> ApiResult<Json<WebhookAck>> {
    let outcome = SubscriptionRepository::apply(&state.db, action).await?;
    match &outcome {
        ReconcileOutcome::Ignored(reason) => info!(gateway, reason = %reason, "Webhook ignored"),
        ReconcileOutcome::Cancelled { rows: 0 } => {
            warn!(gateway, "Cancellation matched no subscription");
        }
        other => info!(gateway, outcome = ?other, "Webhook applied"),
    }
    Ok(Json(WebhookAck::from(&outcome)))
}

/// POST /webhooks/paypal
async fn paypal_webhook(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<WebhookAck>> {
    let action = PayPalEvent::parse(&body)?.into_action(Utc::now())?;
    apply(&state, "paypal", action).await
}

/// POST /webhooks/paystack - The signature is checked before the body is parsed.
async fn paystack_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookAck>> {
    let config = state
        .config
        .payments
        .paystack
        .as_ref()
        .ok_or(GatewayError::NotConfigured("Paystack"))?;

    let signature = headers
        .get(PAYSTACK_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    verify_paystack_signature(&config.secret_key, &body, signature)?;

    let action = PaystackEvent::parse(&body)?.into_action(Utc::now())?;
    apply(&state, "paystack", action).await
}

/// POST /webhooks/yoco
async fn yoco_webhook(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<WebhookAck>> {
    let action = YocoEvent::parse(&body)?.into_action(Utc::now())?;
    apply(&state, "yoco", action).await
}
