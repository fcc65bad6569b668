//! Document validation and derived values.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::DocumentError;
use super::totals::calculate_totals;
use super::types::{DocumentKind, DocumentStatus, DocumentTotals, LineItemInput};

/// Document service for business logic.
pub struct DocumentService;

impl DocumentService {
    /// Validates line items and rates.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: no items, a blank description, a
    /// negative quantity or rate, or a percentage outside `0..=100`.
    pub fn validate(
        items: &[LineItemInput],
        discount_rate: Decimal,
        tax_rate: Decimal,
    ) -> Result<(), DocumentError> {
        if items.is_empty() {
            return Err(DocumentError::NoLineItems);
        }

        for (idx, item) in items.iter().enumerate() {
            let line = idx + 1;
            if item.description.trim().is_empty() {
                return Err(DocumentError::EmptyDescription { line });
            }
            if item.quantity < Decimal::ZERO {
                return Err(DocumentError::NegativeQuantity { line });
            }
            if item.rate < Decimal::ZERO {
                return Err(DocumentError::NegativeRate { line });
            }
        }

        Self::validate_percentage("discount_rate", discount_rate)?;
        Self::validate_percentage("tax_rate", tax_rate)?;

        Ok(())
    }

    fn validate_percentage(field: &'static str, value: Decimal) -> Result<(), DocumentError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(DocumentError::InvalidPercentage { field });
        }
        Ok(())
    }

    /// Validates the dates of a document.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::DueBeforeIssue` when the due date is earlier
    /// than the issue date.
    pub fn validate_dates(
        issue_date: NaiveDate,
        due_date: Option<NaiveDate>,
    ) -> Result<(), DocumentError> {
        match due_date {
            Some(due) if due < issue_date => Err(DocumentError::DueBeforeIssue),
            _ => Ok(()),
        }
    }

    /// Validates the input and computes the totals in one step.
    ///
    /// # Errors
    ///
    /// See [`DocumentService::validate`].
    pub fn prepare(
        items: &[LineItemInput],
        discount_rate: Decimal,
        tax_rate: Decimal,
    ) -> Result<DocumentTotals, DocumentError> {
        Self::validate(items, discount_rate, tax_rate)?;
        Ok(calculate_totals(items, discount_rate, tax_rate))
    }

    /// Rejects content edits on anything but a draft.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NotEditable` for sent, paid and overdue documents.
    pub const fn ensure_editable(status: DocumentStatus) -> Result<(), DocumentError> {
        if status.is_editable() {
            Ok(())
        } else {
            Err(DocumentError::NotEditable(status))
        }
    }

    /// Rejects an update that would change the document kind. Numbers and
    /// free-tier counts are per kind, so the kind is fixed at creation.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::KindChange` when the kinds differ.
    pub fn ensure_same_kind(
        current: DocumentKind,
        requested: DocumentKind,
    ) -> Result<(), DocumentError> {
        if current == requested {
            Ok(())
        } else {
            Err(DocumentError::KindChange {
                from: current,
                to: requested,
            })
        }
    }

    /// True when an unpaid document is past its due date.
    ///
    /// Display only; nothing moves documents to `overdue` automatically.
    #[must_use]
    pub fn is_overdue(status: DocumentStatus, due_date: Option<NaiveDate>, today: NaiveDate) -> bool {
        match status {
            DocumentStatus::Paid | DocumentStatus::Draft => false,
            DocumentStatus::Overdue => true,
            DocumentStatus::Sent => due_date.is_some_and(|due| due < today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn items() -> Vec<LineItemInput> {
        vec![
            LineItemInput::new("Design", dec!(2), dec!(50)),
            LineItemInput::new("Print", dec!(1), dec!(20)),
        ]
    }

    #[test]
    fn test_prepare_computes_totals() {
        let totals = DocumentService::prepare(&items(), dec!(10), dec!(8)).unwrap();
        assert_eq!(totals.total, dec!(116.64));
    }

    #[test]
    fn test_validate_requires_items() {
        assert_eq!(
            DocumentService::validate(&[], dec!(0), dec!(0)),
            Err(DocumentError::NoLineItems)
        );
    }

    #[test]
    fn test_validate_rejects_bad_lines() {
        let mut lines = items();
        lines[1].description = "   ".to_string();
        assert_eq!(
            DocumentService::validate(&lines, dec!(0), dec!(0)),
            Err(DocumentError::EmptyDescription { line: 2 })
        );

        let mut lines = items();
        lines[0].quantity = dec!(-1);
        assert_eq!(
            DocumentService::validate(&lines, dec!(0), dec!(0)),
            Err(DocumentError::NegativeQuantity { line: 1 })
        );

        let mut lines = items();
        lines[1].rate = dec!(-0.01);
        assert_eq!(
            DocumentService::validate(&lines, dec!(0), dec!(0)),
            Err(DocumentError::NegativeRate { line: 2 })
        );
    }

    #[test]
    fn test_validate_allows_zero_rate() {
        let lines = vec![LineItemInput::new("Free sample", dec!(3), dec!(0))];
        assert!(DocumentService::validate(&lines, dec!(0), dec!(100)).is_ok());
    }

    #[rstest]
    #[case(dec!(-1), dec!(8), "discount_rate")]
    #[case(dec!(100.01), dec!(8), "discount_rate")]
    #[case(dec!(10), dec!(-5), "tax_rate")]
    #[case(dec!(10), dec!(250), "tax_rate")]
    fn test_validate_rejects_bad_percentages(
        #[case] discount: Decimal,
        #[case] tax: Decimal,
        #[case] field: &'static str,
    ) {
        assert_eq!(
            DocumentService::validate(&items(), discount, tax),
            Err(DocumentError::InvalidPercentage { field })
        );
    }

    #[test]
    fn test_ensure_editable() {
        assert!(DocumentService::ensure_editable(DocumentStatus::Draft).is_ok());
        for status in [DocumentStatus::Sent, DocumentStatus::Paid, DocumentStatus::Overdue] {
            assert_eq!(
                DocumentService::ensure_editable(status),
                Err(DocumentError::NotEditable(status))
            );
        }
    }

    #[test]
    fn test_kind_is_fixed_after_creation() {
        assert!(DocumentService::ensure_same_kind(DocumentKind::Invoice, DocumentKind::Invoice).is_ok());
        assert_eq!(
            DocumentService::ensure_same_kind(DocumentKind::Estimate, DocumentKind::Invoice),
            Err(DocumentError::KindChange {
                from: DocumentKind::Estimate,
                to: DocumentKind::Invoice,
            })
        );
        assert_eq!(
            DocumentError::KindChange {
                from: DocumentKind::Estimate,
                to: DocumentKind::Invoice,
            }
            .to_string(),
            "Document type cannot change from Estimate to Invoice"
        );
    }

    #[test]
    fn test_validate_dates() {
        let issue = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert!(DocumentService::validate_dates(issue, None).is_ok());
        assert!(DocumentService::validate_dates(issue, Some(issue)).is_ok());
        assert_eq!(
            DocumentService::validate_dates(issue, NaiveDate::from_ymd_opt(2026, 3, 9)),
            Err(DocumentError::DueBeforeIssue)
        );
    }

    #[rstest]
    #[case(DocumentStatus::Sent, Some((2026, 3, 1)), true)]
    #[case(DocumentStatus::Sent, Some((2026, 3, 10)), false)]
    #[case(DocumentStatus::Sent, None, false)]
    #[case(DocumentStatus::Paid, Some((2026, 1, 1)), false)]
    #[case(DocumentStatus::Draft, Some((2026, 1, 1)), false)]
    #[case(DocumentStatus::Overdue, None, true)]
    fn test_is_overdue(
        #[case] status: DocumentStatus,
        #[case] due: Option<(i32, u32, u32)>,
        #[case] expected: bool,
    ) {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let due = due.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        assert_eq!(DocumentService::is_overdue(status, due, today), expected);
    }
}
