//! `SeaORM` Entity for subscriptions table.
//!
//! `status` is a string so rows written by older clients (`ACTIVE`) still
//! load; it is interpreted through `invoxa_core::billing::SubscriptionStatus`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub plan_id: String,
    pub status: String,
    pub provider: Option<String>,
    pub paypal_subscription_id: Option<String>,
    pub paystack_reference: Option<String>,
    pub paystack_subscription_code: Option<String>,
    pub paystack_customer_code: Option<String>,
    pub yoco_charge_id: Option<String>,
    pub current_period_start: Option<DateTimeWithTimeZone>,
    pub current_period_end: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
