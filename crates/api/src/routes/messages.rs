//! Contact form and support requests.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use invoxa_core::auth::normalize_email;
use invoxa_db::repositories::{ContactInput, MessageRepository};

/// Public routes: the marketing-site contact form.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/contact", post(submit_contact))
}

/// Routes for signed-in users.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/support", post(submit_support))
}

/// Request body for `POST /contact`.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    /// Sender name.
    #[validate(length(min = 1, max = 200, message = "is required"))]
    pub name: String,
    /// Sender email.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Optional subject.
    #[validate(length(max = 200))]
    pub subject: Option<String>,
    /// Message body.
    #[validate(length(min = 1, max = 5000, message = "must be 1-5000 characters"))]
    pub message: String,
}

/// Request body for `POST /support`.
#[derive(Debug, Deserialize, Validate)]
pub struct SupportRequest {
    /// Subject line.
    #[validate(length(min = 1, max = 200, message = "is required"))]
    pub subject: String,
    /// Message body.
    #[validate(length(min = 1, max = 5000, message = "must be 1-5000 characters"))]
    pub message: String,
}

/// Receipt for a stored message.
#[derive(Debug, Serialize)]
pub struct MessageReceipt {
    /// Stored message ID.
    pub id: Uuid,
}

/// POST /contact
async fn submit_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> ApiResult<(StatusCode, Json<MessageReceipt>)> {
    payload.validate()?;

    let stored = MessageRepository::new((*state.db).clone())
        .create_contact(ContactInput {
            name: payload.name.trim().to_string(),
            email: normalize_email(&payload.email),
            subject: payload.subject.filter(|s| !s.trim().is_empty()),
            message: payload.message,
        })
        .await?;

    info!(message_id = %stored.id, "Contact message received");
    Ok((StatusCode::CREATED, Json(MessageReceipt { id: stored.id })))
}

/// POST /support
async fn submit_support(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SupportRequest>,
) -> ApiResult<(StatusCode, Json<MessageReceipt>)> {
    payload.validate()?;

    let stored = MessageRepository::new((*state.db).clone())
        .create_support(auth.user_id(), payload.subject, payload.message)
        .await?;

    info!(user_id = %auth.user_id(), message_id = %stored.id, "Support request opened");
    Ok((StatusCode::CREATED, Json(MessageReceipt { id: stored.id })))
}
