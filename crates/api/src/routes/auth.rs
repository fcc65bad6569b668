//! Registration and login.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use tracing::info;
use validator::Validate;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use invoxa_core::auth::{hash_password, normalize_email, verify_password};
use invoxa_db::entities::users;
use invoxa_db::repositories::{CreateUserInput, UserRepository};
use invoxa_shared::AppError;
use invoxa_shared::auth::{AuthResponse, LoginRequest, RegisterRequest, UserInfo};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

fn auth_response(state: &AppState, user: users::Model) -> ApiResult<AuthResponse> {
    let access_token = state
        .jwt_service
        .generate_access_token(user.id, &user.email)?;

    Ok(AuthResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
        },
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    })
}

/// POST /auth/login - Authenticate and return an access token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    payload.validate()?;
    let email = normalize_email(&payload.email);
    let invalid = || ApiError::unauthorized("Invalid email or password");

    let user_repo = UserRepository::new((*state.db).clone());
    let Some(user) = user_repo.find_by_email(&email).await? else {
        info!("Login attempt for non-existent user");
        return Err(invalid());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(invalid());
    }

    info!(user_id = %user.id, "User logged in");
    Ok(Json(auth_response(&state, user)?))
}

/// POST /auth/register - Create a user with an empty business profile.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    payload.validate()?;
    let email = normalize_email(&payload.email);

    let user_repo = UserRepository::new((*state.db).clone());
    if user_repo.email_exists(&email).await? {
        return Err(AppError::Conflict("An account with this email already exists".into()).into());
    }

    let password_hash = hash_password(&payload.password)?;
    let business_name = payload
        .business_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| payload.full_name.clone());

    let (user, _profile) = user_repo
        .create_with_profile(CreateUserInput {
            email,
            password_hash,
            full_name: payload.full_name,
            business_name,
        })
        .await?;

    info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(auth_response(&state, user)?)))
}
