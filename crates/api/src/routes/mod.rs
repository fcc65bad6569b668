//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod billing;
pub mod clients;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod items;
pub mod limits;
pub mod messages;
pub mod profile;
pub mod webhooks;

/// Creates the API router. Protected routes get the auth middleware, which
/// needs the state up front.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(profile::routes())
        .merge(clients::routes())
        .merge(items::routes())
        .merge(documents::routes())
        .merge(dashboard::routes())
        .merge(limits::routes())
        .merge(billing::routes())
        .merge(messages::protected_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(webhooks::routes())
        .merge(messages::public_routes())
        .merge(protected_routes)
}
