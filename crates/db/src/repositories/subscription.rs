//! Subscription and free-tier limit repository.
//!
//! Owns the single subscription row per user and the limit gate that reads
//! it. The gate fails open: if anything goes wrong while evaluating, the
//! create is allowed and a warning is logged.

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set,
    sea_query::{Expr, OnConflict},
};
use tracing::{info, warn};
use uuid::Uuid;

use invoxa_core::auth::normalize_email;
use invoxa_core::billing::{
    Activation, CancelTarget, Cancellation, SubscriptionStatus, UserRef, WebhookAction,
};
use invoxa_core::limits::{self, LimitDecision, LimitedResource, ResourceUsage, UsageLimits};

use super::document::kind_condition;
use crate::entities::{clients, invoices, subscriptions, user_limits, users};

/// Error types for subscription operations.
#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    /// The webhook's user does not exist.
    #[error("No user matches {0}")]
    UnknownUser(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// What applying a webhook action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Subscription upserted to active.
    Activated {
        /// Subscriber.
        user_id: Uuid,
    },
    /// The charge was already recorded; nothing changed.
    AlreadyApplied {
        /// Subscriber.
        user_id: Uuid,
    },
    /// Matching rows marked cancelled.
    Cancelled {
        /// Rows updated.
        rows: u64,
    },
    /// Event acknowledged without changes.
    Ignored(String),
}

/// Repository for subscription and limit operations.
pub struct SubscriptionRepository;

impl SubscriptionRepository {
    /// Gets the subscription row of a user.
    pub async fn find_for_user(
        db: &DatabaseConnection,
        user_id: Uuid,
    ) -> Result<Option<subscriptions::Model>, DbErr> {
        subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .one(db)
            .await
    }

    /// Gets the row that already holds a PayPal subscription id.
    pub async fn find_by_paypal_subscription(
        db: &DatabaseConnection,
        paypal_subscription_id: &str,
    ) -> Result<Option<subscriptions::Model>, DbErr> {
        subscriptions::Entity::find()
            .filter(subscriptions::Column::PaypalSubscriptionId.eq(paypal_subscription_id))
            .one(db)
            .await
    }

    /// Whether the user is on an active (or trialing) plan.
    pub async fn is_plan_active(db: &DatabaseConnection, user_id: Uuid) -> Result<bool, DbErr> {
        Ok(Self::find_for_user(db, user_id)
            .await?
            .is_some_and(|s| SubscriptionStatus::is_active_value(&s.status)))
    }

    /// Loads the user's ceilings, falling back to the free-tier defaults.
    pub async fn load_limits(
        db: &DatabaseConnection,
        user_id: Uuid,
    ) -> Result<UsageLimits, DbErr> {
        let Some(row) = user_limits::Entity::find_by_id(user_id).one(db).await? else {
            return Ok(UsageLimits::default());
        };

        let ceiling = |v: i32| u64::try_from(v).unwrap_or(0);
        Ok(UsageLimits {
            max_invoices: ceiling(row.max_invoices),
            max_estimates: ceiling(row.max_estimates),
            max_credit_notes: ceiling(row.max_credit_notes),
            max_delivery_notes: ceiling(row.max_delivery_notes),
            max_purchase_orders: ceiling(row.max_purchase_orders),
            max_clients: ceiling(row.max_clients),
        })
    }

    /// Counts the rows of `resource` the user owns.
    pub async fn count_resource(
        db: &DatabaseConnection,
        user_id: Uuid,
        resource: LimitedResource,
    ) -> Result<u64, DbErr> {
        match resource {
            LimitedResource::Client => {
                clients::Entity::find()
                    .filter(clients::Column::UserId.eq(user_id))
                    .count(db)
                    .await
            }
            LimitedResource::Document(kind) => {
                invoices::Entity::find()
                    .filter(invoices::Column::UserId.eq(user_id))
                    .filter(kind_condition(kind))
                    .count(db)
                    .await
            }
        }
    }

    /// Decides whether the user may create one more `resource`.
    ///
    /// Never fails: backend errors allow the create.
    pub async fn check_limit(
        db: &DatabaseConnection,
        user_id: Uuid,
        resource: LimitedResource,
    ) -> LimitDecision {
        match Self::try_check_limit(db, user_id, resource).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    resource = resource.plural_noun(),
                    error = %e,
                    "Limit check failed, allowing"
                );
                LimitDecision::allowed()
            }
        }
    }

    async fn try_check_limit(
        db: &DatabaseConnection,
        user_id: Uuid,
        resource: LimitedResource,
    ) -> Result<LimitDecision, DbErr> {
        if Self::is_plan_active(db, user_id).await? {
            return Ok(LimitDecision::allowed());
        }

        let limits = Self::load_limits(db, user_id).await?;
        let count = Self::count_resource(db, user_id, resource).await?;
        Ok(limits::evaluate(false, &limits, resource, count))
    }

    /// Current usage of every limited resource.
    pub async fn usage(
        db: &DatabaseConnection,
        user_id: Uuid,
    ) -> Result<Vec<ResourceUsage>, DbErr> {
        let active = Self::is_plan_active(db, user_id).await?;
        let limits = Self::load_limits(db, user_id).await?;

        let mut usage = Vec::new();
        for resource in LimitedResource::all() {
            let used = Self::count_resource(db, user_id, resource).await?;
            usage.push(limits::usage(active, &limits, resource, used));
        }
        Ok(usage)
    }

    /// Applies a webhook action.
    pub async fn apply(
        db: &DatabaseConnection,
        action: WebhookAction,
    ) -> Result<ReconcileOutcome, SubscriptionError> {
        match action {
            WebhookAction::Activate(activation) => Self::activate(db, activation).await,
            WebhookAction::Cancel(cancellation) => Self::cancel(db, cancellation).await,
            WebhookAction::Ignore(reason) => Ok(ReconcileOutcome::Ignored(reason)),
        }
    }

    /// Resolves a webhook's user reference to a user id.
    pub async fn resolve_user(
        db: &DatabaseConnection,
        user: &UserRef,
    ) -> Result<Uuid, SubscriptionError> {
        let found = match user {
            UserRef::Id(id) => users::Entity::find_by_id(*id).one(db).await?,
            UserRef::Email(email) => {
                users::Entity::find()
                    .filter(users::Column::Email.eq(normalize_email(email)))
                    .one(db)
                    .await?
            }
        };

        found.map(|u| u.id).ok_or_else(|| {
            SubscriptionError::UnknownUser(match user {
                UserRef::Id(id) => format!("user id {id}"),
                UserRef::Email(email) => format!("email {email}"),
            })
        })
    }

    /// Upserts the user's subscription to active.
    ///
    /// Keyed on `user_id`, so replays converge on one row. Yoco charges are
    /// additionally deduplicated by charge id.
    pub async fn activate(
        db: &DatabaseConnection,
        activation: Activation,
    ) -> Result<ReconcileOutcome, SubscriptionError> {
        let user_id = Self::resolve_user(db, &activation.user).await?;

        if let Some(charge_id) = activation.refs.yoco_charge_id.as_deref() {
            let seen = subscriptions::Entity::find()
                .filter(subscriptions::Column::YocoChargeId.eq(charge_id))
                .count(db)
                .await?;
            if seen > 0 {
                info!(user_id = %user_id, charge_id, "Yoco charge already applied");
                return Ok(ReconcileOutcome::AlreadyApplied { user_id });
            }
        }

        let now: DateTime<Utc> = Utc::now();
        let refs = activation.refs;

        let mut update_columns = vec![
            subscriptions::Column::PlanId,
            subscriptions::Column::Status,
            subscriptions::Column::Provider,
            subscriptions::Column::CurrentPeriodStart,
            subscriptions::Column::CurrentPeriodEnd,
            subscriptions::Column::UpdatedAt,
        ];
        // Keep identifiers from other gateways unless this event carries one.
        for (value, column) in [
            (&refs.paypal_subscription_id, subscriptions::Column::PaypalSubscriptionId),
            (&refs.paystack_reference, subscriptions::Column::PaystackReference),
            (
                &refs.paystack_subscription_code,
                subscriptions::Column::PaystackSubscriptionCode,
            ),
            (
                &refs.paystack_customer_code,
                subscriptions::Column::PaystackCustomerCode,
            ),
            (&refs.yoco_charge_id, subscriptions::Column::YocoChargeId),
        ] {
            if value.is_some() {
                update_columns.push(column);
            }
        }

        let row = subscriptions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            plan_id: Set(activation.plan_id),
            status: Set(SubscriptionStatus::Active.as_str().to_string()),
            provider: Set(Some(activation.provider.as_str().to_string())),
            paypal_subscription_id: Set(refs.paypal_subscription_id),
            paystack_reference: Set(refs.paystack_reference),
            paystack_subscription_code: Set(refs.paystack_subscription_code),
            paystack_customer_code: Set(refs.paystack_customer_code),
            yoco_charge_id: Set(refs.yoco_charge_id),
            current_period_start: Set(Some(activation.period_start.into())),
            current_period_end: Set(activation.period_end.map(Into::into)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        subscriptions::Entity::insert(row)
            .on_conflict(
                OnConflict::column(subscriptions::Column::UserId)
                    .update_columns(update_columns)
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        info!(
            user_id = %user_id,
            provider = %activation.provider,
            "Subscription activated"
        );
        Ok(ReconcileOutcome::Activated { user_id })
    }

    /// Marks the targeted subscription cancelled.
    pub async fn cancel(
        db: &DatabaseConnection,
        cancellation: Cancellation,
    ) -> Result<ReconcileOutcome, SubscriptionError> {
        let condition = match &cancellation.target {
            CancelTarget::User(user) => {
                let user_id = Self::resolve_user(db, user).await?;
                subscriptions::Column::UserId.eq(user_id)
            }
            CancelTarget::PayPalSubscription(id) => {
                subscriptions::Column::PaypalSubscriptionId.eq(id.as_str())
            }
            CancelTarget::PaystackSubscription(code) => {
                subscriptions::Column::PaystackSubscriptionCode.eq(code.as_str())
            }
        };

        let now: DateTime<Utc> = Utc::now();
        let result = subscriptions::Entity::update_many()
            .col_expr(
                subscriptions::Column::Status,
                Expr::value(SubscriptionStatus::Cancelled.as_str()),
            )
            .col_expr(
                subscriptions::Column::UpdatedAt,
                Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(now)),
            )
            .filter(condition)
            .exec(db)
            .await?;

        info!(
            provider = %cancellation.provider,
            rows = result.rows_affected,
            "Subscription cancelled"
        );
        Ok(ReconcileOutcome::Cancelled {
            rows: result.rows_affected,
        })
    }
}
