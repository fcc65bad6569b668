//! Subscription billing.
//!
//! Turns gateway webhooks (PayPal, Paystack, Yoco) into [`WebhookAction`]s
//! against the single subscription row each user owns.

pub mod error;
pub mod paypal;
pub mod paystack;
pub mod reconcile;
pub mod signature;
pub mod types;
pub mod yoco;

pub use error::BillingError;
pub use paypal::PayPalEvent;
pub use paystack::PaystackEvent;
pub use reconcile::{
    Activation, CancelTarget, Cancellation, ProviderRefs, UserRef, WebhookAction,
};
pub use signature::{sign_paystack_payload, verify_paystack_signature};
pub use types::{BillingCycle, BillingProvider, PROFESSIONAL_PLAN, SubscriptionStatus};
pub use yoco::YocoEvent;
