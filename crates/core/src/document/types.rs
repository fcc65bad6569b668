//! Document domain types.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The kind of business document stored in the shared documents table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKind {
    /// Sales invoice. Also the kind of legacy rows without a type.
    Invoice,
    /// Quote sent before work is agreed.
    Estimate,
    /// Credit issued against an earlier invoice.
    CreditNote,
    /// Proof of delivery.
    DeliveryNote,
    /// Order placed with a supplier.
    PurchaseOrder,
}

impl DocumentKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 5] = [
        Self::Invoice,
        Self::Estimate,
        Self::CreditNote,
        Self::DeliveryNote,
        Self::PurchaseOrder,
    ];

    /// The tag stored in the `document_type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "Invoice",
            Self::Estimate => "Estimate",
            Self::CreditNote => "Credit note",
            Self::DeliveryNote => "Delivery note",
            Self::PurchaseOrder => "Purchase order",
        }
    }

    /// Prefix used for generated document numbers.
    #[must_use]
    pub const fn number_prefix(self) -> &'static str {
        match self {
            Self::Invoice => "INV",
            Self::Estimate => "EST",
            Self::CreditNote => "CN",
            Self::DeliveryNote => "DN",
            Self::PurchaseOrder => "PO",
        }
    }

    /// Plural noun used in user-facing messages.
    #[must_use]
    pub const fn plural_noun(self) -> &'static str {
        match self {
            Self::Invoice => "invoices",
            Self::Estimate => "estimates",
            Self::CreditNote => "credit notes",
            Self::DeliveryNote => "delivery notes",
            Self::PurchaseOrder => "purchase orders",
        }
    }

    /// Resolves the kind of a stored row.
    ///
    /// Rows written before the `document_type` column existed have no tag and
    /// are invoices.
    ///
    /// # Errors
    ///
    /// Returns the unrecognized tag.
    pub fn from_stored(tag: Option<&str>) -> Result<Self, UnknownDocumentKind> {
        tag.map_or(Ok(Self::Invoice), str::parse)
    }

    /// True when listing this kind must also include untagged legacy rows.
    #[must_use]
    pub const fn includes_legacy_rows(self) -> bool {
        matches!(self, Self::Invoice)
    }
}

/// Error returned for an unrecognized document type tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown document type: {0}")]
pub struct UnknownDocumentKind(pub String);

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = UnknownDocumentKind;

    /// Accepts the stored tag in any case, with spaces, dashes or
    /// underscores between words ("Credit note", "credit_note", "credit-note").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "invoice" => Ok(Self::Invoice),
            "estimate" => Ok(Self::Estimate),
            "creditnote" => Ok(Self::CreditNote),
            "deliverynote" => Ok(Self::DeliveryNote),
            "purchaseorder" => Ok(Self::PurchaseOrder),
            _ => Err(UnknownDocumentKind(s.to_string())),
        }
    }
}

impl Serialize for DocumentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DocumentKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Lifecycle status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Being prepared; the only editable status.
    Draft,
    /// Delivered to the client.
    Sent,
    /// Settled.
    Paid,
    /// Past its due date without payment. Set manually.
    Overdue,
}

impl DocumentStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Draft, Self::Sent, Self::Paid, Self::Overdue];

    /// The value stored in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        }
    }

    /// Label-cased name for charts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Sent => "Sent",
            Self::Paid => "Paid",
            Self::Overdue => "Overdue",
        }
    }

    /// Only drafts accept content edits.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            _ => Err(format!("Unknown document status: {s}")),
        }
    }
}

/// A line on a document as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemInput {
    /// What is being billed.
    pub description: String,
    /// Number of units.
    pub quantity: Decimal,
    /// Price per unit.
    pub rate: Decimal,
}

impl LineItemInput {
    /// Creates a line item.
    #[must_use]
    pub fn new(description: impl Into<String>, quantity: Decimal, rate: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            rate,
        }
    }

    /// Line amount: quantity × rate.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.quantity * self.rate
    }
}

/// Computed money fields of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Sum of line amounts.
    pub subtotal: Decimal,
    /// Discount taken off the subtotal.
    pub discount_amount: Decimal,
    /// Subtotal after discount; the tax base.
    pub taxable_amount: Decimal,
    /// Tax on the taxable amount.
    pub tax_amount: Decimal,
    /// Amount due.
    pub total: Decimal,
}
