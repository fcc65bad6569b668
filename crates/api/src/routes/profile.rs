//! Business profile settings.

use axum::{Json, Router, extract::State, routing::get};
use serde::Deserialize;
use validator::Validate;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use invoxa_db::entities::profiles;
use invoxa_db::repositories::{ProfileRepository, UpdateProfileInput};

/// Creates the profile routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

/// Request body for updating the profile. Absent fields are left alone;
/// nullable fields are cleared with an explicit `null`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// Business name.
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub business_name: Option<String>,
    /// Postal address.
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub address: Option<Option<String>>,
    /// Contact email.
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub email: Option<Option<String>>,
    /// Phone number.
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub phone: Option<Option<String>>,
    /// Logo URL.
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub logo_url: Option<Option<String>>,
    /// Brand color.
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub accent_color: Option<Option<String>>,
    /// ISO 4217 code.
    #[validate(length(equal = 3, message = "must be a 3-letter ISO code"))]
    pub currency: Option<String>,
    /// IANA timezone.
    #[validate(length(min = 1, max = 64))]
    pub timezone: Option<String>,
}

/// Distinguishes a missing field from an explicit `null`.
mod nullable {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Option<String>>, D::Error> {
        Option::<String>::deserialize(deserializer).map(Some)
    }
}

/// GET /profile
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<profiles::Model>> {
    ProfileRepository::new((*state.db).clone())
        .find_by_user(auth.user_id())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Profile not found"))
}

/// PUT /profile
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<profiles::Model>> {
    payload.validate()?;

    let input = UpdateProfileInput {
        business_name: payload.business_name,
        address: payload.address,
        email: payload.email,
        phone: payload.phone,
        logo_url: payload.logo_url,
        accent_color: payload.accent_color,
        currency: payload.currency,
        timezone: payload.timezone,
    };

    ProfileRepository::new((*state.db).clone())
        .update(auth.user_id(), input)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Profile not found"))
}
