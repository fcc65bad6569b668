//! Client management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::routes::limits;
use invoxa_core::limits::LimitedResource;
use invoxa_db::entities::clients;
use invoxa_db::repositories::{ClientInput, ClientRepository};

/// Creates the client routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/{client_id}",
            get(get_client).put(update_client).delete(delete_client),
        )
}

/// Request body for creating or replacing a client.
#[derive(Debug, Deserialize, Validate)]
pub struct ClientRequest {
    /// Display name.
    #[validate(length(min = 1, max = 200, message = "is required"))]
    pub name: String,
    /// Email documents are sent to.
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    /// Phone number.
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Tax identifier.
    #[validate(length(max = 50))]
    pub tax_id: Option<String>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl From<ClientRequest> for ClientInput {
    fn from(request: ClientRequest) -> Self {
        Self {
            name: request.name.trim().to_string(),
            email: blank_to_none(request.email),
            phone: blank_to_none(request.phone),
            address: blank_to_none(request.address),
            tax_id: blank_to_none(request.tax_id),
        }
    }
}

/// GET /clients
async fn list_clients(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<clients::Model>>> {
    let clients = ClientRepository::new((*state.db).clone())
        .list(auth.user_id())
        .await?;
    Ok(Json(clients))
}

/// POST /clients - Subject to the free-tier client limit.
async fn create_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ClientRequest>,
) -> ApiResult<(StatusCode, Json<clients::Model>)> {
    payload.validate()?;
    limits::enforce(&state, auth.user_id(), LimitedResource::Client).await?;

    let client = ClientRepository::new((*state.db).clone())
        .create(auth.user_id(), payload.into())
        .await?;

    info!(user_id = %auth.user_id(), client_id = %client.id, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /clients/{client_id}
async fn get_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(client_id): Path<Uuid>,
) -> ApiResult<Json<clients::Model>> {
    let client = ClientRepository::new((*state.db).clone())
        .get(auth.user_id(), client_id)
        .await?;
    Ok(Json(client))
}

/// PUT /clients/{client_id}
async fn update_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(client_id): Path<Uuid>,
    Json(payload): Json<ClientRequest>,
) -> ApiResult<Json<clients::Model>> {
    payload.validate()?;
    let client = ClientRepository::new((*state.db).clone())
        .update(auth.user_id(), client_id, payload.into())
        .await?;
    Ok(Json(client))
}

/// DELETE /clients/{client_id} - Documents keep their data but lose the client.
async fn delete_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(client_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ClientRepository::new((*state.db).clone())
        .delete(auth.user_id(), client_id)
        .await?;

    info!(user_id = %auth.user_id(), client_id = %client_id, "Client deleted");
    Ok(StatusCode::NO_CONTENT)
}
