//! Usage limit types.

use serde::{Deserialize, Serialize};

use crate::document::DocumentKind;

/// Free-tier ceiling applied to every category without an override.
pub const DEFAULT_FREE_LIMIT: u64 = 2;

/// Something the free tier caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitedResource {
    /// Client records.
    Client,
    /// Documents of one kind.
    Document(DocumentKind),
}

impl LimitedResource {
    /// Plural noun used in messages.
    #[must_use]
    pub const fn plural_noun(self) -> &'static str {
        match self {
            Self::Client => "clients",
            Self::Document(kind) => kind.plural_noun(),
        }
    }

    /// Every limited resource, clients first.
    #[must_use]
    pub fn all() -> Vec<Self> {
        std::iter::once(Self::Client)
            .chain(DocumentKind::ALL.into_iter().map(Self::Document))
            .collect()
    }
}

/// Per-user ceilings. Missing overrides fall back to [`DEFAULT_FREE_LIMIT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLimits {
    /// Max invoices.
    pub max_invoices: u64,
    /// Max estimates.
    pub max_estimates: u64,
    /// Max credit notes.
    pub max_credit_notes: u64,
    /// Max delivery notes.
    pub max_delivery_notes: u64,
    /// Max purchase orders.
    pub max_purchase_orders: u64,
    /// Max clients.
    pub max_clients: u64,
}

impl Default for UsageLimits {
    fn default() -> Self {
        Self {
            max_invoices: DEFAULT_FREE_LIMIT,
            max_estimates: DEFAULT_FREE_LIMIT,
            max_credit_notes: DEFAULT_FREE_LIMIT,
            max_delivery_notes: DEFAULT_FREE_LIMIT,
            max_purchase_orders: DEFAULT_FREE_LIMIT,
            max_clients: DEFAULT_FREE_LIMIT,
        }
    }
}

impl UsageLimits {
    /// The ceiling for one resource.
    #[must_use]
    pub const fn ceiling_for(&self, resource: LimitedResource) -> u64 {
        match resource {
            LimitedResource::Client => self.max_clients,
            LimitedResource::Document(DocumentKind::Invoice) => self.max_invoices,
            LimitedResource::Document(DocumentKind::Estimate) => self.max_estimates,
            LimitedResource::Document(DocumentKind::CreditNote) => self.max_credit_notes,
            LimitedResource::Document(DocumentKind::DeliveryNote) => self.max_delivery_notes,
            LimitedResource::Document(DocumentKind::PurchaseOrder) => self.max_purchase_orders,
        }
    }
}

/// Outcome of a limit check, serialized as the gate's response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitDecision {
    /// Whether the create may proceed.
    pub ok: bool,
    /// Upgrade prompt when denied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LimitDecision {
    /// A passing decision.
    #[must_use]
    pub const fn allowed() -> Self {
        Self {
            ok: true,
            message: None,
        }
    }

    /// A denial carrying a message for the user.
    #[must_use]
    pub fn denied(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
        }
    }
}

/// Current usage of one resource, as reported on the billing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUsage {
    /// Resource noun, e.g. `"invoices"`.
    pub resource: String,
    /// Rows owned.
    pub used: u64,
    /// Ceiling, `None` when on an active plan.
    pub limit: Option<u64>,
}
