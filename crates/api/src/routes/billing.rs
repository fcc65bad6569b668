//! Subscription status, usage and checkout initiation.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::gateways::{ChargeRequest, CheckoutSession, GatewayError};
use crate::middleware::AuthUser;
use invoxa_core::billing::{
    Activation, BillingCycle, BillingProvider, SubscriptionStatus, UserRef,
};
use invoxa_core::limits::ResourceUsage;
use invoxa_db::entities::subscriptions;
use invoxa_db::repositories::{ReconcileOutcome, SubscriptionRepository};
use invoxa_shared::AppError;
use invoxa_shared::config::PricingConfig;

/// Creates the billing routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/billing/subscription", get(get_subscription))
        .route("/billing/usage", get(get_usage))
        .route("/billing/paypal/activate", post(activate_paypal))
        .route("/billing/paystack/initialize", post(initialize_paystack))
        .route("/billing/yoco/checkout", post(create_yoco_checkout))
}

/// Response for `GET /billing/subscription`.
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    /// Whether the user is on an active plan.
    pub active: bool,
    /// The stored row, if the user ever subscribed.
    pub subscription: Option<subscriptions::Model>,
}

/// Response for `GET /billing/usage`.
#[derive(Debug, Serialize)]
pub struct UsageResponse {
    /// Whether the user is on an active plan.
    pub plan_active: bool,
    /// Per-category counts and ceilings.
    pub usage: Vec<ResourceUsage>,
}

/// Request body for `POST /billing/paypal/activate`.
#[derive(Debug, Deserialize)]
pub struct PayPalActivateRequest {
    /// Subscription id returned by the PayPal buttons.
    pub subscription_id: String,
}

/// Request body for starting a Paystack or Yoco checkout.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutRequest {
    /// Monthly unless stated.
    #[serde(default)]
    pub billing_cycle: BillingCycle,
}

/// Price of one period in minor units.
fn price_for(pricing: &PricingConfig, cycle: BillingCycle) -> u64 {
    match cycle {
        BillingCycle::Monthly => pricing.monthly_minor,
        BillingCycle::Annual => pricing.annual_minor,
    }
}

/// GET /billing/subscription
async fn get_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<SubscriptionResponse>> {
    let subscription = SubscriptionRepository::find_for_user(&state.db, auth.user_id()).await?;
    let active = subscription
        .as_ref()
        .is_some_and(|s| SubscriptionStatus::is_active_value(&s.status));

    Ok(Json(SubscriptionResponse {
        active,
        subscription,
    }))
}

/// GET /billing/usage
async fn get_usage(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UsageResponse>> {
    let plan_active = SubscriptionRepository::is_plan_active(&state.db, auth.user_id()).await?;
    let usage = SubscriptionRepository::usage(&state.db, auth.user_id()).await?;
    Ok(Json(UsageResponse { plan_active, usage }))
}

/// POST /billing/paypal/activate - Verifies the subscription with PayPal
/// before activating it.
async fn activate_paypal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<PayPalActivateRequest>,
) -> ApiResult<Json<SubscriptionResponse>> {
    let config = state
        .config
        .payments
        .paypal
        .as_ref()
        .ok_or(GatewayError::NotConfigured("PayPal"))?;

    let subscription_id = payload.subscription_id.trim();
    if subscription_id.is_empty() {
        return Err(ApiError::validation("subscription_id is required"));
    }

    if let Some(existing) =
        SubscriptionRepository::find_by_paypal_subscription(&state.db, subscription_id).await?
        && existing.user_id != auth.user_id()
    {
        warn!(
            user_id = %auth.user_id(),
            subscription_id,
            "PayPal subscription already linked to another user"
        );
        return Err(AppError::Conflict(
            "This PayPal subscription is linked to another account".to_string(),
        )
        .into());
    }

    let remote = state
        .gateways
        .paypal_subscription(config, subscription_id)
        .await?;
    if !remote.is_active() {
        return Err(AppError::BusinessRule(format!(
            "PayPal subscription is {}, not active",
            remote.status
        ))
        .into());
    }
    if !remote.is_subscribed_by(auth.email()) {
        warn!(
            user_id = %auth.user_id(),
            subscription_id,
            "PayPal subscriber does not match the caller"
        );
        return Err(AppError::Forbidden(
            "This PayPal subscription belongs to a different payer".to_string(),
        )
        .into());
    }

    let mut activation = Activation::professional(
        UserRef::Id(auth.user_id()),
        BillingProvider::PayPal,
        Utc::now(),
    );
    activation.refs.paypal_subscription_id = Some(remote.id);

    if let ReconcileOutcome::Activated { user_id } =
        SubscriptionRepository::activate(&state.db, activation).await?
    {
        info!(user_id = %user_id, "PayPal subscription activated from checkout");
    }

    get_subscription(State(state), auth).await
}

/// POST /billing/paystack/initialize - Returns the Paystack payment page.
async fn initialize_paystack(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Option<Json<CheckoutRequest>>,
) -> ApiResult<Json<CheckoutSession>> {
    let config = state
        .config
        .payments
        .paystack
        .as_ref()
        .ok_or(GatewayError::NotConfigured("Paystack"))?;
    let cycle = payload.map(|Json(p)| p.billing_cycle).unwrap_or_default();
    let pricing = &state.config.payments.pricing;
    let base_url = state.config.app.base_url.trim_end_matches('/');

    let charge = ChargeRequest {
        email: auth.email(),
        amount_minor: price_for(pricing, cycle),
        currency: &pricing.currency,
        metadata: json!({
            "user_id": auth.user_id().to_string(),
            "billing_cycle": cycle,
        }),
        return_url: format!("{base_url}/billing?status=success"),
        cancel_url: format!("{base_url}/billing?status=cancelled"),
    };

    let session = state.gateways.paystack_initialize(config, &charge).await?;
    info!(user_id = %auth.user_id(), "Paystack checkout initialized");
    Ok(Json(session))
}

/// POST /billing/yoco/checkout - Returns the Yoco hosted checkout.
async fn create_yoco_checkout(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Option<Json<CheckoutRequest>>,
) -> ApiResult<Json<CheckoutSession>> {
    let config = state
        .config
        .payments
        .yoco
        .as_ref()
        .ok_or(GatewayError::NotConfigured("Yoco"))?;
    let cycle = payload.map(|Json(p)| p.billing_cycle).unwrap_or_default();
    let pricing = &state.config.payments.pricing;
    let base_url = state.config.app.base_url.trim_end_matches('/');

    let charge = ChargeRequest {
        email: auth.email(),
        amount_minor: price_for(pricing, cycle),
        currency: &pricing.currency,
        metadata: json!({
            "userId": auth.user_id().to_string(),
            "email": auth.email(),
            "billingCycle": cycle,
        }),
        return_url: format!("{base_url}/billing?status=success"),
        cancel_url: format!("{base_url}/billing?status=cancelled"),
    };

    let session = state.gateways.yoco_checkout(config, &charge).await?;
    info!(user_id = %auth.user_id(), "Yoco checkout created");
    Ok(Json(session))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_for_cycle() {
        let pricing = PricingConfig::default();
        assert_eq!(price_for(&pricing, BillingCycle::Monthly), pricing.monthly_minor);
        assert_eq!(price_for(&pricing, BillingCycle::Annual), pricing.annual_minor);
    }

    #[test]
    fn test_checkout_request_defaults_to_monthly() {
        let request: CheckoutRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.billing_cycle, BillingCycle::Monthly);

        let request: CheckoutRequest =
            serde_json::from_str(r#"{"billing_cycle": "annual"}"#).unwrap();
        assert_eq!(request.billing_cycle, BillingCycle::Annual);
    }
}
