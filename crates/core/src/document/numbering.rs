//! Document numbering.
//!
//! Numbers look like `INV-0007`: a per-kind prefix and a zero-padded
//! sequence. The next number is one past the highest sequence already used
//! by the owner for that kind, so deleting a document never reissues a
//! number that is still in use elsewhere.

use super::types::DocumentKind;

/// Width the sequence is padded to.
const SEQUENCE_WIDTH: usize = 4;

/// Extracts the sequence of a number generated for `kind`.
///
/// Custom numbers typed by the user (`"2026/A"`) yield `None`.
#[must_use]
pub fn parse_sequence(kind: DocumentKind, number: &str) -> Option<u64> {
    number
        .trim()
        .strip_prefix(kind.number_prefix())?
        .strip_prefix('-')?
        .parse()
        .ok()
}

/// Returns the next document number for `kind` given the owner's existing
/// numbers of that kind.
#[must_use]
pub fn next_document_number<'a>(
    kind: DocumentKind,
    existing: impl IntoIterator<Item = &'a str>,
) -> String {
    let next = existing
        .into_iter()
        .filter_map(|n| parse_sequence(kind, n))
        .max()
        .map_or(1, |max| max.saturating_add(1));

    format!("{}-{next:0SEQUENCE_WIDTH$}", kind.number_prefix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number() {
        assert_eq!(next_document_number(DocumentKind::Invoice, []), "INV-0001");
        assert_eq!(
            next_document_number(DocumentKind::PurchaseOrder, []),
            "PO-0001"
        );
    }

    #[test]
    fn test_next_after_highest() {
        let existing = ["INV-0003", "INV-0010", "INV-0002"];
        assert_eq!(
            next_document_number(DocumentKind::Invoice, existing),
            "INV-0011"
        );
    }

    #[test]
    fn test_ignores_custom_and_foreign_numbers() {
        let existing = ["2026/A", "EST-0042", "INV-abc", "CN-0005"];
        assert_eq!(
            next_document_number(DocumentKind::CreditNote, existing),
            "CN-0006"
        );
        assert_eq!(
            next_document_number(DocumentKind::Invoice, existing),
            "INV-0001"
        );
    }

    #[test]
    fn test_sequence_grows_past_padding() {
        assert_eq!(
            next_document_number(DocumentKind::Estimate, ["EST-9999"]),
            "EST-10000"
        );
    }

    #[test]
    fn test_parse_sequence() {
        assert_eq!(parse_sequence(DocumentKind::Invoice, "INV-0042"), Some(42));
        assert_eq!(parse_sequence(DocumentKind::Invoice, "EST-0042"), None);
        assert_eq!(parse_sequence(DocumentKind::Invoice, "INV0042"), None);
    }
}
