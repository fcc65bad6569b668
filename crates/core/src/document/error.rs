//! Document error types.

use thiserror::Error;

use super::types::{DocumentKind, DocumentStatus};

/// Document-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// A document needs at least one line item.
    #[error("Document must have at least one line item")]
    NoLineItems,

    /// Line item has no description.
    #[error("Line item {line} must have a description")]
    EmptyDescription {
        /// One-based line number.
        line: usize,
    },

    /// Line item quantity is negative.
    #[error("Line item {line} has a negative quantity")]
    NegativeQuantity {
        /// One-based line number.
        line: usize,
    },

    /// Line item rate is negative.
    #[error("Line item {line} has a negative rate")]
    NegativeRate {
        /// One-based line number.
        line: usize,
    },

    /// Percentage outside `0..=100`.
    #[error("{field} must be between 0 and 100")]
    InvalidPercentage {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Document number is blank.
    #[error("Document number cannot be empty")]
    EmptyNumber,

    /// Due date precedes the issue date.
    #[error("Due date cannot be before the issue date")]
    DueBeforeIssue,

    /// Content edits are only allowed on drafts.
    #[error("Only draft documents can be edited (status is {0})")]
    NotEditable(DocumentStatus),

    /// A document keeps the kind it was created with.
    #[error("Document type cannot change from {from} to {to}")]
    KindChange {
        /// Stored kind.
        from: DocumentKind,
        /// Requested kind.
        to: DocumentKind,
    },
}
