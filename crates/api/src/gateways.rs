//! Outbound calls to the payment gateways.
//!
//! One pooled `reqwest` client is shared by every gateway. Credentials come
//! from [`PaymentsConfig`](invoxa_shared::config::PaymentsConfig) per call, so a
//! gateway without configuration fails with [`GatewayError::NotConfigured`]
//! instead of at startup.

use std::time::Duration;

use reqwest::{Client, Response, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use invoxa_shared::config::{PayPalConfig, PaystackConfig, YocoConfig};

/// Timeout for every gateway request.
pub const GATEWAY_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors from gateway calls.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway has no credentials configured.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// Transport failure or timeout.
    #[error("Gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("{gateway} rejected the request with status {status}")]
    Rejected {
        /// Gateway name.
        gateway: &'static str,
        /// HTTP status returned.
        status: u16,
    },

    /// The gateway answered 2xx with a body we could not use.
    #[error("Unexpected gateway response: {0}")]
    UnexpectedResponse(String),

    /// A caller-supplied gateway id has characters no gateway issues.
    #[error("Invalid {gateway} reference: {reference}")]
    InvalidReference {
        /// Gateway name.
        gateway: &'static str,
        /// The rejected value.
        reference: String,
    },
}

/// PayPal ids (`I-BW452GLLEP1G`) are ASCII letters, digits and dashes.
#[must_use]
pub fn is_valid_paypal_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

/// A PayPal subscription as reported by the PayPal REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct PayPalSubscription {
    /// Subscription id (`I-...`).
    pub id: String,
    /// PayPal status, e.g. `ACTIVE`.
    pub status: String,
    /// Subscriber, when PayPal includes it.
    #[serde(default)]
    pub subscriber: Option<PayPalSubscriberInfo>,
}

/// Subscriber details of a PayPal subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct PayPalSubscriberInfo {
    /// Subscriber email.
    pub email_address: Option<String>,
}

impl PayPalSubscription {
    /// PayPal reports live subscriptions as `ACTIVE`.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("ACTIVE")
    }

    /// True when PayPal lists `email` as the subscriber. A subscription
    /// without a subscriber email belongs to nobody.
    #[must_use]
    pub fn is_subscribed_by(&self, email: &str) -> bool {
        self.subscriber
            .as_ref()
            .and_then(|s| s.email_address.as_deref())
            .is_some_and(|subscriber| subscriber.trim().eq_ignore_ascii_case(email.trim()))
    }
}

/// A hosted checkout the user is redirected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSession {
    /// URL to send the browser to.
    pub url: String,
    /// Gateway reference for the checkout.
    pub reference: Option<String>,
}

/// Parameters of a one-off charge.
#[derive(Debug, Clone)]
pub struct ChargeRequest<'a> {
    /// Payer email.
    pub email: &'a str,
    /// Amount in the currency's minor unit.
    pub amount_minor: u64,
    /// ISO 4217 code.
    pub currency: &'a str,
    /// Metadata echoed back in the webhook.
    pub metadata: Value,
    /// Where the gateway sends the browser afterwards.
    pub return_url: String,
    /// Where the gateway sends the browser on cancel.
    pub cancel_url: String,
}

#[derive(Deserialize)]
struct PayPalToken {
    access_token: String,
}

#[derive(Deserialize)]
struct PaystackEnvelope {
    status: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<PaystackAuthorization>,
}

#[derive(Deserialize)]
struct PaystackAuthorization {
    authorization_url: String,
    reference: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct YocoCheckout {
    id: Option<String>,
    redirect_url: String,
}

/// HTTP client for PayPal, Paystack and Yoco.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
}

impl GatewayClient {
    /// Builds the client with [`GATEWAY_TIMEOUT`].
    pub fn new() -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(GATEWAY_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;
        Ok(Self { http })
    }

    async fn ensure_success(gateway: &'static str, response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(gateway, status = status.as_u16(), body = %body, "Gateway rejected request");
        Err(GatewayError::Rejected {
            gateway,
            status: status.as_u16(),
        })
    }

    /// Looks up a PayPal subscription with client-credentials auth.
    pub async fn paypal_subscription(
        &self,
        config: &PayPalConfig,
        subscription_id: &str,
    ) -> Result<PayPalSubscription, GatewayError> {
        if !is_valid_paypal_id(subscription_id) {
            return Err(GatewayError::InvalidReference {
                gateway: "PayPal",
                reference: subscription_id.to_string(),
            });
        }
        let base = config.base_url.trim_end_matches('/');

        let response = self
            .http
            .post(format!("{base}/v1/oauth2/token"))
            .basic_auth(&config.client_id, Some(&config.client_secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;
        let token: PayPalToken = Self::ensure_success("PayPal", response).await?.json().await?;

        let response = self
            .http
            .get(format!("{base}/v1/billing/subscriptions/{subscription_id}"))
            .bearer_auth(token.access_token)
            .send()
            .await?;
        let subscription: PayPalSubscription =
            Self::ensure_success("PayPal", response).await?.json().await?;

        debug!(subscription_id, status = %subscription.status, "Fetched PayPal subscription");
        Ok(subscription)
    }

    /// Starts a Paystack transaction and returns its authorization URL.
    pub async fn paystack_initialize(
        &self,
        config: &PaystackConfig,
        charge: &ChargeRequest<'_>,
    ) -> Result<CheckoutSession, GatewayError> {
        let base = config.base_url.trim_end_matches('/');
        let body = serde_json::json!({
            "email": charge.email,
            "amount": charge.amount_minor,
            "currency": charge.currency,
            "callback_url": charge.return_url,
            "metadata": charge.metadata,
        });

        let response = self
            .http
            .post(format!("{base}/transaction/initialize"))
            .bearer_auth(&config.secret_key)
            .json(&body)
            .send()
            .await?;
        let envelope: PaystackEnvelope =
            Self::ensure_success("Paystack", response).await?.json().await?;

        match envelope.data {
            Some(data) if envelope.status => Ok(CheckoutSession {
                url: data.authorization_url,
                reference: data.reference,
            }),
            _ => Err(GatewayError::UnexpectedResponse(
                envelope
                    .message
                    .unwrap_or_else(|| "Paystack returned no authorization URL".to_string()),
            )),
        }
    }

    /// Creates a Yoco hosted checkout.
    pub async fn yoco_checkout(
        &self,
        config: &YocoConfig,
        charge: &ChargeRequest<'_>,
    ) -> Result<CheckoutSession, GatewayError> {
        let base = config.base_url.trim_end_matches('/');
        let body = serde_json::json!({
            "amount": charge.amount_minor,
            "currency": charge.currency,
            "successUrl": charge.return_url,
            "cancelUrl": charge.cancel_url,
            "metadata": charge.metadata,
        });

        let response = self
            .http
            .post(format!("{base}/api/checkouts"))
            .bearer_auth(&config.secret_key)
            .json(&body)
            .send()
            .await?;
        let checkout: YocoCheckout = Self::ensure_success("Yoco", response).await?.json().await?;

        Ok(CheckoutSession {
            url: checkout.redirect_url,
            reference: checkout.id,
        })
    }
}
