//! Free-tier limit checks.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use invoxa_core::document::DocumentKind;
use invoxa_core::limits::{LimitDecision, LimitedResource};
use invoxa_db::repositories::SubscriptionRepository;

/// Creates the limit routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/limits/check", get(check))
}

/// Query for `GET /limits/check`.
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    /// `client` or `document`.
    pub resource: String,
    /// Document kind when `resource` is `document`; defaults to invoices.
    #[serde(rename = "type")]
    pub kind: Option<DocumentKind>,
}

impl LimitQuery {
    fn resource(&self) -> ApiResult<LimitedResource> {
        match self.resource.trim().to_lowercase().as_str() {
            "client" | "clients" => Ok(LimitedResource::Client),
            "document" | "documents" => Ok(LimitedResource::Document(
                self.kind.unwrap_or(DocumentKind::Invoice),
            )),
            other => Err(ApiError::validation(format!("Unknown resource: {other}"))),
        }
    }
}

/// Refuses the create with 402 when the user is at their ceiling.
pub(crate) async fn enforce(
    state: &AppState,
    user_id: Uuid,
    resource: LimitedResource,
) -> ApiResult<()> {
    let decision = SubscriptionRepository::check_limit(&state.db, user_id, resource).await;
    if decision.ok {
        Ok(())
    } else {
        info!(user_id = %user_id, resource = resource.plural_noun(), "Free-tier limit reached");
        Err(ApiError::LimitReached(decision))
    }
}

/// GET /limits/check - Whether one more resource may be created.
async fn check(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<LimitDecision>> {
    let resource = query.resource()?;
    Ok(Json(
        SubscriptionRepository::check_limit(&state.db, auth.user_id(), resource).await,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("client", None, LimitedResource::Client)]
    #[case("document", None, LimitedResource::Document(DocumentKind::Invoice))]
    #[case(
        "Documents",
        Some(DocumentKind::CreditNote),
        LimitedResource::Document(DocumentKind::CreditNote)
    )]
    fn test_limit_query_resource(
        #[case] resource: &str,
        #[case] kind: Option<DocumentKind>,
        #[case] expected: LimitedResource,
    ) {
        let query = LimitQuery {
            resource: resource.to_string(),
            kind,
        };
        assert_eq!(query.resource().unwrap(), expected);
    }

    #[test]
    fn test_limit_query_unknown_resource() {
        let query = LimitQuery {
            resource: "expenses".to_string(),
            kind: None,
        };
        assert!(query.resource().is_err());
    }
}
