//! Business profile repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::profiles;

/// Fields a user may change on their profile. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    /// Business name.
    pub business_name: Option<String>,
    /// Postal address.
    pub address: Option<Option<String>>,
    /// Contact email.
    pub email: Option<Option<String>>,
    /// Phone number.
    pub phone: Option<Option<String>>,
    /// Logo URL.
    pub logo_url: Option<Option<String>>,
    /// Brand color, e.g. `#1d4ed8`.
    pub accent_color: Option<Option<String>>,
    /// ISO 4217 code.
    pub currency: Option<String>,
    /// IANA timezone.
    pub timezone: Option<String>,
}

/// Profile repository.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    db: DatabaseConnection,
}

impl ProfileRepository {
    /// Creates a new profile repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the profile of a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<profiles::Model>, DbErr> {
        profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Applies changes to a user's profile. Returns `None` if the user has
    /// no profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<Option<profiles::Model>, DbErr> {
        let Some(profile) = self.find_by_user(user_id).await? else {
            return Ok(None);
        };

        let mut active: profiles::ActiveModel = profile.into();
        if let Some(name) = input.business_name {
            active.business_name = Set(name);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(logo_url) = input.logo_url {
            active.logo_url = Set(logo_url);
        }
        if let Some(color) = input.accent_color {
            active.accent_color = Set(color);
        }
        if let Some(currency) = input.currency {
            active.currency = Set(currency.to_uppercase());
        }
        if let Some(timezone) = input.timezone {
            active.timezone = Set(timezone);
        }
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await.map(Some)
    }
}
