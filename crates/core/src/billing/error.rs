//! Billing error types.

use thiserror::Error;

/// Errors raised while interpreting gateway webhooks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    /// Body is not the JSON the gateway documents.
    #[error("Malformed webhook payload: {0}")]
    MalformedPayload(String),

    /// A field needed to identify the user is missing.
    #[error("Webhook payload is missing {0}")]
    MissingField(&'static str),

    /// Signature header missing or wrong.
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// A user id in metadata is not a UUID.
    #[error("Invalid user id in webhook metadata: {0}")]
    InvalidUserId(String),
}
