//! Mapping of domain errors onto HTTP responses.
//!
//! Every error body is `{"error": <code>, "message": <text>}`, except a
//! refused limit check which answers 402 with the gate's own
//! `{"ok": false, "message": ...}` decision.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::{error, warn};
use validator::ValidationErrors;

use crate::gateways::GatewayError;
use invoxa_core::auth::PasswordError;
use invoxa_core::billing::BillingError;
use invoxa_core::document::DocumentError;
use invoxa_core::limits::LimitDecision;
use invoxa_db::repositories::{
    ClientError, DocumentRepoError, ItemError, SubscriptionError,
};
use invoxa_shared::{AppError, EmailError, JwtError};

/// Error returned by route handlers.
#[derive(Debug)]
pub enum ApiError {
    /// A categorized application error.
    App(AppError),
    /// The free-tier limit refused a create.
    LimitReached(LimitDecision),
}

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// 404 with a message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::App(AppError::NotFound(message.into()))
    }

    /// 400 with a message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::App(AppError::Validation(message.into()))
    }

    /// 401 with a message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::App(AppError::Unauthorized(message.into()))
    }

    /// 500 with a message that is safe to show.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::App(AppError::Internal(message.into()))
    }

    /// HTTP status of this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::App(e) => StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::LimitReached(_) => StatusCode::PAYMENT_REQUIRED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::LimitReached(decision) => (status, Json(decision)).into_response(),
            Self::App(e) => {
                // Details of server-side failures stay in the log.
                let message = if e.is_server_error() {
                    error!(error = %e, "Request failed");
                    "An internal error occurred".to_string()
                } else {
                    e.message().to_string()
                };
                (
                    status,
                    Json(json!({
                        "error": e.error_code(),
                        "message": message
                    })),
                )
                    .into_response()
            }
        }
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self::App(e)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        Self::App(e.into())
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        Self::App(AppError::Database(e.to_string()))
    }
}

impl From<DocumentError> for ApiError {
    fn from(e: DocumentError) -> Self {
        match e {
            DocumentError::NotEditable(_) | DocumentError::KindChange { .. } => {
                Self::App(AppError::Conflict(e.to_string()))
            }
            _ => Self::validation(e.to_string()),
        }
    }
}

impl From<DocumentRepoError> for ApiError {
    fn from(e: DocumentRepoError) -> Self {
        match e {
            DocumentRepoError::NotFound(_) | DocumentRepoError::ClientNotFound(_) => {
                Self::not_found(e.to_string())
            }
            DocumentRepoError::Invalid(inner) => inner.into(),
            DocumentRepoError::UnknownKind(_) => Self::internal(e.to_string()),
            DocumentRepoError::Database(db) => db.into(),
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::NotFound(_) => Self::not_found(e.to_string()),
            ClientError::Database(db) => db.into(),
        }
    }
}

impl From<ItemError> for ApiError {
    fn from(e: ItemError) -> Self {
        match e {
            ItemError::NotFound(_) => Self::not_found(e.to_string()),
            ItemError::NegativeRate => Self::validation(e.to_string()),
            ItemError::Database(db) => db.into(),
        }
    }
}

impl From<SubscriptionError> for ApiError {
    fn from(e: SubscriptionError) -> Self {
        match e {
            SubscriptionError::UnknownUser(ref who) => {
                warn!(user = %who, "Webhook for unknown user");
                Self::not_found(e.to_string())
            }
            SubscriptionError::Database(db) => db.into(),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(e: BillingError) -> Self {
        match e {
            BillingError::InvalidSignature => {
                warn!("Rejected webhook with invalid signature");
                Self::unauthorized(e.to_string())
            }
            BillingError::MalformedPayload(_)
            | BillingError::MissingField(_)
            | BillingError::InvalidUserId(_) => {
                warn!(error = %e, "Rejected malformed webhook");
                Self::validation(e.to_string())
            }
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::Expired => Self::unauthorized("Token has expired"),
            JwtError::DecodingError(_) => Self::unauthorized("Invalid or malformed token"),
            JwtError::EncodingError(_) => Self::internal(e.to_string()),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(e: PasswordError) -> Self {
        Self::internal(e.to_string())
    }
}

impl From<EmailError> for ApiError {
    fn from(e: EmailError) -> Self {
        match e {
            EmailError::InvalidAddress(_) => Self::validation(e.to_string()),
            EmailError::BuildError(_) | EmailError::SendError(_) => {
                Self::App(AppError::ExternalService(e.to_string()))
            }
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::NotConfigured(_) => Self::internal(e.to_string()),
            GatewayError::InvalidReference { .. } => Self::validation(e.to_string()),
            GatewayError::Rejected { .. } => Self::App(AppError::BusinessRule(e.to_string())),
            GatewayError::Http(_) | GatewayError::UnexpectedResponse(_) => {
                Self::App(AppError::ExternalService(e.to_string()))
            }
        }
    }
}
