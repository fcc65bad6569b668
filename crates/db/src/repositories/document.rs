//! Document repository.
//!
//! Documents and their line items are always written in one database
//! transaction. Invoices also match legacy rows whose `document_type` is null.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use invoxa_core::document::{
    DocumentError, DocumentKind, DocumentService, DocumentStatus, DocumentTotals, LineItemInput,
    UnknownDocumentKind, next_document_number,
};
use invoxa_shared::types::{PageRequest, PageResponse};

use crate::entities::{clients, invoice_items, invoices, sea_orm_active_enums};

/// Error types for document operations.
#[derive(Debug, thiserror::Error)]
pub enum DocumentRepoError {
    /// Document not found (or owned by someone else).
    #[error("Document not found: {0}")]
    NotFound(Uuid),

    /// Referenced client does not belong to the caller.
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    /// Business rule violation.
    #[error(transparent)]
    Invalid(#[from] DocumentError),

    /// Stored row carries a type tag this build does not know.
    #[error(transparent)]
    UnknownKind(#[from] UnknownDocumentKind),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or replacing a document.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    /// Document kind.
    pub kind: DocumentKind,
    /// Client, if any.
    pub client_id: Option<Uuid>,
    /// Explicit number; generated when `None`.
    pub number: Option<String>,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// ISO 4217 currency.
    pub currency: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Tax percentage.
    pub tax_rate: Decimal,
    /// Discount percentage.
    pub discount_rate: Decimal,
    /// Line items, in display order.
    pub items: Vec<LineItemInput>,
}

/// Filter options for listing documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    /// Restrict to one kind.
    pub kind: Option<DocumentKind>,
    /// Restrict to one status.
    pub status: Option<DocumentStatus>,
}

/// Document row with its client's name, for lists.
#[derive(Debug, Clone)]
pub struct DocumentListEntry {
    /// The document.
    pub document: invoices::Model,
    /// Client name, if a client is attached.
    pub client_name: Option<String>,
}

/// Document with line items and client.
#[derive(Debug, Clone)]
pub struct DocumentWithItems {
    /// The document.
    pub document: invoices::Model,
    /// Line items ordered by position.
    pub items: Vec<invoice_items::Model>,
    /// Attached client.
    pub client: Option<clients::Model>,
}

/// Condition matching documents of `kind`, including untagged legacy rows
/// for invoices.
#[must_use]
pub fn kind_condition(kind: DocumentKind) -> Condition {
    let tagged = invoices::Column::DocumentType.eq(kind.as_str());
    if kind.includes_legacy_rows() {
        Condition::any()
            .add(tagged)
            .add(invoices::Column::DocumentType.is_null())
    } else {
        Condition::all().add(tagged)
    }
}

/// Document repository.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists documents newest first, with client names.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: &DocumentFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<DocumentListEntry>, DocumentRepoError> {
        let page = page.normalized();

        let mut query = invoices::Entity::find().filter(invoices::Column::UserId.eq(user_id));
        if let Some(kind) = filter.kind {
            query = query.filter(kind_condition(kind));
        }
        if let Some(status) = filter.status {
            query = query
                .filter(invoices::Column::Status.eq(sea_orm_active_enums::DocumentStatus::from(status)));
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(invoices::Column::IssueDate)
            .order_by_desc(invoices::Column::CreatedAt)
            .find_also_related(clients::Entity)
            .offset(page.index() * page.limit())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let entries = rows
            .into_iter()
            .map(|(document, client)| DocumentListEntry {
                document,
                client_name: client.map(|c| c.name),
            })
            .collect();

        Ok(PageResponse::new(entries, page.page, page.per_page, total))
    }

    /// Gets a document with its items and client.
    ///
    /// # Errors
    ///
    /// Returns `DocumentRepoError::NotFound` if the user has no such document.
    pub async fn get(
        &self,
        user_id: Uuid,
        document_id: Uuid,
    ) -> Result<DocumentWithItems, DocumentRepoError> {
        let document = Self::find_owned(&self.db, user_id, document_id).await?;
        Self::load_children(&self.db, document).await
    }

    /// Creates a draft document and its items.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the client is not the
    /// caller's, or the database write fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: DocumentInput,
    ) -> Result<DocumentWithItems, DocumentRepoError> {
        let totals = DocumentService::prepare(&input.items, input.discount_rate, input.tax_rate)?;
        DocumentService::validate_dates(input.issue_date, input.due_date)?;
        let number = Self::explicit_number(input.number.as_deref())?;

        let txn = self.db.begin().await?;

        let client = Self::owned_client(&txn, user_id, input.client_id).await?;
        let number = match number {
            Some(n) => n,
            None => Self::next_number_in(&txn, user_id, input.kind).await?,
        };

        let now = Utc::now().into();
        let document = invoices::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            client_id: Set(input.client_id),
            document_type: Set(Some(input.kind.as_str().to_string())),
            invoice_number: Set(number),
            status: Set(sea_orm_active_enums::DocumentStatus::Draft),
            issue_date: Set(input.issue_date),
            due_date: Set(input.due_date),
            currency: Set(input.currency.to_uppercase()),
            notes: Set(input.notes),
            tax_rate: Set(input.tax_rate),
            discount_rate: Set(input.discount_rate),
            subtotal: Set(totals.subtotal),
            discount_amount: Set(totals.discount_amount),
            tax_amount: Set(totals.tax_amount),
            total: Set(totals.total),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let items = Self::insert_items(&txn, document.id, &input.items).await?;

        txn.commit().await?;

        Ok(DocumentWithItems {
            document,
            items,
            client,
        })
    }

    /// Replaces a draft document and all of its items.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NotEditable` (wrapped) when the document is not
    /// a draft, `DocumentError::KindChange` when `input.kind` differs from the
    /// stored kind, plus the errors of [`DocumentRepository::create`].
    pub async fn update(
        &self,
        user_id: Uuid,
        document_id: Uuid,
        input: DocumentInput,
    ) -> Result<DocumentWithItems, DocumentRepoError> {
        let totals = DocumentService::prepare(&input.items, input.discount_rate, input.tax_rate)?;
        DocumentService::validate_dates(input.issue_date, input.due_date)?;
        let number = Self::explicit_number(input.number.as_deref())?;

        let txn = self.db.begin().await?;

        let existing = Self::find_owned(&txn, user_id, document_id).await?;
        DocumentService::ensure_editable(existing.status.into())?;
        DocumentService::ensure_same_kind(existing.kind()?, input.kind)?;
        let client = Self::owned_client(&txn, user_id, input.client_id).await?;

        let current_number = existing.invoice_number.clone();
        let mut active: invoices::ActiveModel = existing.into();
        active.client_id = Set(input.client_id);
        active.invoice_number = Set(number.unwrap_or(current_number));
        active.issue_date = Set(input.issue_date);
        active.due_date = Set(input.due_date);
        active.currency = Set(input.currency.to_uppercase());
        active.notes = Set(input.notes);
        active.tax_rate = Set(input.tax_rate);
        active.discount_rate = Set(input.discount_rate);
        Self::set_totals(&mut active, &totals);
        active.updated_at = Set(Utc::now().into());
        let document = active.update(&txn).await?;

        invoice_items::Entity::delete_many()
            .filter(invoice_items::Column::InvoiceId.eq(document_id))
            .exec(&txn)
            .await?;
        let items = Self::insert_items(&txn, document_id, &input.items).await?;

        txn.commit().await?;

        Ok(DocumentWithItems {
            document,
            items,
            client,
        })
    }

    /// Sets the status. Any status may follow any other.
    ///
    /// # Errors
    ///
    /// Returns `DocumentRepoError::NotFound` if the user has no such document.
    pub async fn set_status(
        &self,
        user_id: Uuid,
        document_id: Uuid,
        status: DocumentStatus,
    ) -> Result<invoices::Model, DocumentRepoError> {
        let document = Self::find_owned(&self.db, user_id, document_id).await?;

        let mut active: invoices::ActiveModel = document.into();
        active.status = Set(status.into());
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a document in any status, with its items.
    ///
    /// # Errors
    ///
    /// Returns `DocumentRepoError::NotFound` if the user has no such document.
    pub async fn delete(&self, user_id: Uuid, document_id: Uuid) -> Result<(), DocumentRepoError> {
        let txn = self.db.begin().await?;

        Self::find_owned(&txn, user_id, document_id).await?;

        invoice_items::Entity::delete_many()
            .filter(invoice_items::Column::InvoiceId.eq(document_id))
            .exec(&txn)
            .await?;
        invoices::Entity::delete_by_id(document_id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// The number the next document of `kind` would get.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn next_number(
        &self,
        user_id: Uuid,
        kind: DocumentKind,
    ) -> Result<String, DocumentRepoError> {
        Ok(Self::next_number_in(&self.db, user_id, kind).await?)
    }

    fn explicit_number(number: Option<&str>) -> Result<Option<String>, DocumentError> {
        match number.map(str::trim) {
            None => Ok(None),
            Some("") => Err(DocumentError::EmptyNumber),
            Some(n) => Ok(Some(n.to_string())),
        }
    }

    async fn next_number_in<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        kind: DocumentKind,
    ) -> Result<String, DbErr> {
        let numbers: Vec<String> = invoices::Entity::find()
            .select_only()
            .column(invoices::Column::InvoiceNumber)
            .filter(invoices::Column::UserId.eq(user_id))
            .filter(kind_condition(kind))
            .into_tuple()
            .all(conn)
            .await?;

        Ok(next_document_number(kind, numbers.iter().map(String::as_str)))
    }

    async fn find_owned<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        document_id: Uuid,
    ) -> Result<invoices::Model, DocumentRepoError> {
        invoices::Entity::find_by_id(document_id)
            .filter(invoices::Column::UserId.eq(user_id))
            .one(conn)
            .await?
            .ok_or(DocumentRepoError::NotFound(document_id))
    }

    async fn owned_client(
        txn: &DatabaseTransaction,
        user_id: Uuid,
        client_id: Option<Uuid>,
    ) -> Result<Option<clients::Model>, DocumentRepoError> {
        let Some(client_id) = client_id else {
            return Ok(None);
        };

        clients::Entity::find_by_id(client_id)
            .filter(clients::Column::UserId.eq(user_id))
            .one(txn)
            .await?
            .map(Some)
            .ok_or(DocumentRepoError::ClientNotFound(client_id))
    }

    async fn load_children<C: ConnectionTrait>(
        conn: &C,
        document: invoices::Model,
    ) -> Result<DocumentWithItems, DocumentRepoError> {
        let items = invoice_items::Entity::find()
            .filter(invoice_items::Column::InvoiceId.eq(document.id))
            .order_by_asc(invoice_items::Column::Position)
            .all(conn)
            .await?;

        let client = match document.client_id {
            Some(client_id) => clients::Entity::find_by_id(client_id).one(conn).await?,
            None => None,
        };

        Ok(DocumentWithItems {
            document,
            items,
            client,
        })
    }

    async fn insert_items(
        txn: &DatabaseTransaction,
        document_id: Uuid,
        items: &[LineItemInput],
    ) -> Result<Vec<invoice_items::Model>, DbErr> {
        let mut inserted = Vec::with_capacity(items.len());

        for (position, item) in (0i32..).zip(items) {
            let model = invoice_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(document_id),
                description: Set(item.description.trim().to_string()),
                quantity: Set(item.quantity),
                rate: Set(item.rate),
                amount: Set(item.amount()),
                position: Set(position),
            }
            .insert(txn)
            .await?;
            inserted.push(model);
        }

        Ok(inserted)
    }

    fn set_totals(active: &mut invoices::ActiveModel, totals: &DocumentTotals) {
        active.subtotal = Set(totals.subtotal);
        active.discount_amount = Set(totals.discount_amount);
        active.tax_amount = Set(totals.tax_amount);
        active.total = Set(totals.total);
    }
}
