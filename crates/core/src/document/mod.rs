//! Business documents: invoices, estimates, credit notes, delivery notes and
//! purchase orders.
//!
//! All kinds share one table and one set of rules:
//! - totals are computed with exact decimals, discount before tax
//! - only drafts accept content edits; status changes are otherwise free
//! - generated numbers are `<PREFIX>-<NNNN>` per kind

pub mod error;
pub mod numbering;
pub mod service;
pub mod totals;
pub mod types;

#[cfg(test)]
mod totals_props;

pub use error::DocumentError;
pub use numbering::next_document_number;
pub use service::DocumentService;
pub use totals::calculate_totals;
pub use types::{
    DocumentKind, DocumentStatus, DocumentTotals, LineItemInput, UnknownDocumentKind,
};
