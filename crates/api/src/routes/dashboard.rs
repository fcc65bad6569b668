//! Dashboard analytics.

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use invoxa_core::dashboard::DashboardSummary;
use invoxa_db::repositories::DashboardRepository;

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

/// GET /dashboard - Totals, revenue trend, status mix, top clients and growth.
async fn get_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DashboardSummary>> {
    let today = Utc::now().date_naive();
    let summary = DashboardRepository::new((*state.db).clone())
        .summary(auth.user_id(), today)
        .await?;
    Ok(Json(summary))
}
