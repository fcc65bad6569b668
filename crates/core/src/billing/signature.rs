//! Paystack webhook signatures.
//!
//! Paystack sends `x-paystack-signature: hex(HMAC-SHA512(secret_key, body))`.
//! The check runs over the raw bytes, before any JSON parsing.

use hmac::{Hmac, Mac};
use sha2::Sha512;

use super::error::BillingError;

type HmacSha512 = Hmac<Sha512>;

/// Computes the hex signature Paystack would send for `body`.
#[must_use]
pub fn sign_paystack_payload(secret: &str, body: &[u8]) -> String {
    // HMAC accepts keys of any length.
    let Ok(mut mac) = HmacSha512::new_from_slice(secret.as_bytes()) else {
        return String::new();
    };
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a Paystack signature header in constant time.
///
/// # Errors
///
/// Returns `BillingError::InvalidSignature` when the header is missing, not
/// hex, or does not match.
pub fn verify_paystack_signature(
    secret: &str,
    body: &[u8],
    signature: Option<&str>,
) -> Result<(), BillingError> {
    let signature = signature
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(BillingError::InvalidSignature)?;
    let expected = hex::decode(signature).map_err(|_| BillingError::InvalidSignature)?;

    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|_| BillingError::InvalidSignature)?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| BillingError::InvalidSignature)
}
