//! Document routes: invoices, estimates, credit notes, delivery notes and
//! purchase orders share one set of endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::routes::limits;
use invoxa_core::document::{DocumentKind, DocumentService, DocumentStatus, LineItemInput};
use invoxa_core::limits::LimitedResource;
use invoxa_db::entities::{clients, invoice_items, invoices};
use invoxa_db::repositories::{
    DocumentFilter, DocumentInput, DocumentListEntry, DocumentRepository, DocumentWithItems,
    ProfileRepository, user::DEFAULT_CURRENCY,
};
use invoxa_shared::DocumentEmail;
use invoxa_shared::types::{PageRequest, PageResponse};

/// Creates the document routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents", get(list_documents).post(create_document))
        .route(
            "/documents/{document_id}",
            get(get_document).put(update_document).delete(delete_document),
        )
        .route("/documents/{document_id}/status", patch(update_status))
        .route("/documents/{document_id}/send", post(send_document))
}

/// Query parameters for listing documents.
#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    /// Restrict to one kind; `Invoice` includes untyped legacy rows.
    #[serde(rename = "type")]
    pub kind: Option<DocumentKind>,
    /// Restrict to one status.
    pub status: Option<DocumentStatus>,
    /// Page number (1-indexed, default: 1).
    pub page: Option<u32>,
    /// Items per page (default: 20, max: 100).
    pub per_page: Option<u32>,
}

/// Request body for creating or replacing a document.
#[derive(Debug, Deserialize, Validate)]
pub struct DocumentRequest {
    /// Kind; defaults to invoice on create and to the current kind on update.
    #[serde(rename = "type")]
    pub kind: Option<DocumentKind>,
    /// Client, if any.
    pub client_id: Option<Uuid>,
    /// Explicit number; generated when absent.
    #[validate(length(min = 1, max = 50))]
    pub number: Option<String>,
    /// Issue date; defaults to today.
    pub issue_date: Option<NaiveDate>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// ISO 4217 code; defaults to the profile currency.
    #[validate(length(equal = 3, message = "must be a 3-letter ISO code"))]
    pub currency: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Tax percentage.
    #[serde(default)]
    pub tax_rate: Decimal,
    /// Discount percentage.
    #[serde(default)]
    pub discount_rate: Decimal,
    /// Line items, in display order.
    pub items: Vec<LineItemInput>,
}

impl DocumentRequest {
    fn into_input(self, kind: DocumentKind, currency: String, today: NaiveDate) -> DocumentInput {
        DocumentInput {
            kind: self.kind.unwrap_or(kind),
            client_id: self.client_id,
            number: self.number,
            issue_date: self.issue_date.unwrap_or(today),
            due_date: self.due_date,
            currency: self.currency.unwrap_or(currency),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            tax_rate: self.tax_rate,
            discount_rate: self.discount_rate,
            items: self.items,
        }
    }
}

/// Request body for `PATCH /documents/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// New status.
    pub status: DocumentStatus,
}

/// A line item in responses.
#[derive(Debug, Serialize)]
pub struct LineItemResponse {
    /// Item ID.
    pub id: Uuid,
    /// Description.
    pub description: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub rate: Decimal,
    /// quantity × rate.
    pub amount: Decimal,
}

impl From<invoice_items::Model> for LineItemResponse {
    fn from(item: invoice_items::Model) -> Self {
        Self {
            id: item.id,
            description: item.description,
            quantity: item.quantity,
            rate: item.rate,
            amount: item.amount,
        }
    }
}

/// A document in responses. Lists omit `items` and `client`.
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    /// Document ID.
    pub id: Uuid,
    /// Kind.
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    /// Document number.
    pub number: String,
    /// Status.
    pub status: DocumentStatus,
    /// Client ID.
    pub client_id: Option<Uuid>,
    /// Client name.
    pub client_name: Option<String>,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Sent and past due, or marked overdue.
    pub is_overdue: bool,
    /// Currency.
    pub currency: String,
    /// Notes.
    pub notes: Option<String>,
    /// Tax percentage.
    pub tax_rate: Decimal,
    /// Discount percentage.
    pub discount_rate: Decimal,
    /// Sum of line amounts.
    pub subtotal: Decimal,
    /// Discount amount.
    pub discount_amount: Decimal,
    /// Tax amount.
    pub tax_amount: Decimal,
    /// Amount due.
    pub total: Decimal,
    /// Creation time.
    pub created_at: DateTime<FixedOffset>,
    /// Last update time.
    pub updated_at: DateTime<FixedOffset>,
    /// Line items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItemResponse>>,
    /// Full client record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<clients::Model>,
}

impl DocumentResponse {
    fn build(document: invoices::Model, client_name: Option<String>, today: NaiveDate) -> ApiResult<Self> {
        let kind = document.kind().map_err(|e| {
            error!(document_id = %document.id, error = %e, "Stored document has an unknown type");
            ApiError::internal(e.to_string())
        })?;
        let status: DocumentStatus = document.status.into();

        Ok(Self {
            id: document.id,
            kind,
            number: document.invoice_number,
            status,
            client_id: document.client_id,
            client_name,
            issue_date: document.issue_date,
            due_date: document.due_date,
            is_overdue: DocumentService::is_overdue(status, document.due_date, today),
            currency: document.currency,
            notes: document.notes,
            tax_rate: document.tax_rate,
            discount_rate: document.discount_rate,
            subtotal: document.subtotal,
            discount_amount: document.discount_amount,
            tax_amount: document.tax_amount,
            total: document.total,
            created_at: document.created_at,
            updated_at: document.updated_at,
            items: None,
            client: None,
        })
    }

    fn from_entry(entry: DocumentListEntry, today: NaiveDate) -> ApiResult<Self> {
        Self::build(entry.document, entry.client_name, today)
    }

    fn from_detail(detail: DocumentWithItems, today: NaiveDate) -> ApiResult<Self> {
        let client_name = detail.client.as_ref().map(|c| c.name.clone());
        let mut response = Self::build(detail.document, client_name, today)?;
        response.items = Some(detail.items.into_iter().map(Into::into).collect());
        response.client = detail.client;
        Ok(response)
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// GET /documents
async fn list_documents(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListDocumentsQuery>,
) -> ApiResult<Json<PageResponse<DocumentResponse>>> {
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = DocumentFilter {
        kind: query.kind,
        status: query.status,
    };

    let listed = DocumentRepository::new((*state.db).clone())
        .list(auth.user_id(), &filter, &page)
        .await?;

    let today = today();
    let data = listed
        .data
        .into_iter()
        .map(|entry| DocumentResponse::from_entry(entry, today))
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(Json(PageResponse {
        data,
        meta: listed.meta,
    }))
}

/// POST /documents - Subject to the free-tier limit of the document kind.
async fn create_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<DocumentRequest>,
) -> ApiResult<(StatusCode, Json<DocumentResponse>)> {
    payload.validate()?;
    let user_id = auth.user_id();
    let kind = payload.kind.unwrap_or(DocumentKind::Invoice);

    limits::enforce(&state, user_id, LimitedResource::Document(kind)).await?;

    let currency = match &payload.currency {
        Some(c) => c.clone(),
        None => ProfileRepository::new((*state.db).clone())
            .find_by_user(user_id)
            .await?
            .map_or_else(|| DEFAULT_CURRENCY.to_string(), |p| p.currency),
    };

    let today = today();
    let created = DocumentRepository::new((*state.db).clone())
        .create(user_id, payload.into_input(kind, currency, today))
        .await?;

    info!(
        user_id = %user_id,
        document_id = %created.document.id,
        number = %created.document.invoice_number,
        "Document created"
    );
    Ok((StatusCode::CREATED, Json(DocumentResponse::from_detail(created, today)?)))
}

/// GET /documents/{document_id}
async fn get_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(document_id): Path<Uuid>,
) -> ApiResult<Json<DocumentResponse>> {
    let detail = DocumentRepository::new((*state.db).clone())
        .get(auth.user_id(), document_id)
        .await?;
    Ok(Json(DocumentResponse::from_detail(detail, today())?))
}

/// PUT /documents/{document_id} - Drafts only; items are replaced wholesale.
async fn update_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(document_id): Path<Uuid>,
    Json(payload): Json<DocumentRequest>,
) -> ApiResult<Json<DocumentResponse>> {
    payload.validate()?;
    let repo = DocumentRepository::new((*state.db).clone());

    let current = repo.get(auth.user_id(), document_id).await?.document;
    let kind = current
        .kind()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let today = today();
    let updated = repo
        .update(
            auth.user_id(),
            document_id,
            payload.into_input(kind, current.currency, today),
        )
        .await?;

    info!(user_id = %auth.user_id(), document_id = %document_id, "Document updated");
    Ok(Json(DocumentResponse::from_detail(updated, today)?))
}

/// PATCH /documents/{document_id}/status - Any status may follow any other.
async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(document_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<Json<DocumentResponse>> {
    let repo = DocumentRepository::new((*state.db).clone());
    repo.set_status(auth.user_id(), document_id, payload.status)
        .await?;

    info!(
        user_id = %auth.user_id(),
        document_id = %document_id,
        status = %payload.status,
        "Document status changed"
    );
    let detail = repo.get(auth.user_id(), document_id).await?;
    Ok(Json(DocumentResponse::from_detail(detail, today())?))
}

/// DELETE /documents/{document_id}
async fn delete_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(document_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    DocumentRepository::new((*state.db).clone())
        .delete(auth.user_id(), document_id)
        .await?;

    info!(user_id = %auth.user_id(), document_id = %document_id, "Document deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /documents/{document_id}/send - Emails the client and marks it sent.
async fn send_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(document_id): Path<Uuid>,
) -> ApiResult<Json<DocumentResponse>> {
    let user_id = auth.user_id();
    let repo = DocumentRepository::new((*state.db).clone());

    let detail = repo.get(user_id, document_id).await?;
    let client = detail
        .client
        .as_ref()
        .ok_or_else(|| ApiError::validation("Document has no client to send to"))?;
    let to = client
        .email
        .as_deref()
        .ok_or_else(|| ApiError::validation("Client has no email address"))?;

    let profile = ProfileRepository::new((*state.db).clone())
        .find_by_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    let document = &detail.document;
    let kind = document
        .kind()
        .map_err(|e| ApiError::internal(e.to_string()))?;
    let email = DocumentEmail {
        business_name: &profile.business_name,
        client_name: &client.name,
        kind_label: kind.as_str(),
        number: &document.invoice_number,
        total: format!("{} {}", document.currency, document.total.round_dp(2)),
        due_date: document.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
    };
    // Marked sent first and restored if delivery fails.
    let previous = DocumentStatus::from(document.status);
    let sent = repo
        .set_status(user_id, document_id, DocumentStatus::Sent)
        .await?;
    if let Err(e) = state.email_service.send_document(to, &email).await {
        if let Err(restore) = repo.set_status(user_id, document_id, previous).await {
            error!(
                user_id = %user_id,
                document_id = %document_id,
                error = %restore,
                "Document email failed and its status could not be restored"
            );
        }
        return Err(e.into());
    }
    info!(user_id = %user_id, document_id = %document_id, "Document sent");

    let response = DocumentResponse::from_detail(
        DocumentWithItems {
            document: sent,
            ..detail
        },
        today(),
    )?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_document_request_defaults() {
        let request: DocumentRequest = serde_json::from_str(
            r#"{"items": [{"description": "Labour", "quantity": "2", "rate": "50"}]}"#,
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        let input = request.into_input(DocumentKind::Estimate, "GHS".to_string(), today);
        assert_eq!(input.kind, DocumentKind::Estimate);
        assert_eq!(input.issue_date, today);
        assert_eq!(input.currency, "GHS");
        assert_eq!(input.tax_rate, Decimal::ZERO);
        assert_eq!(input.items[0].amount(), dec!(100));
    }

    #[test]
    fn test_document_request_reads_type_tag() {
        let request: DocumentRequest = serde_json::from_str(
            r#"{"type": "Credit note", "items": [], "tax_rate": "8"}"#,
        )
        .unwrap();
        assert_eq!(request.kind, Some(DocumentKind::CreditNote));
        assert_eq!(request.tax_rate, dec!(8));
    }

    #[test]
    fn test_list_query_parses_status() {
        let query: ListDocumentsQuery =
            serde_json::from_str(r#"{"type": "invoice", "status": "paid"}"#).unwrap();
        assert_eq!(query.kind, Some(DocumentKind::Invoice));
        assert_eq!(query.status, Some(DocumentStatus::Paid));
    }
}
