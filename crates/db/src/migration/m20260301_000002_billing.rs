//! Billing and messaging migration.
//!
//! Creates subscriptions, per-user limit overrides, and the contact and
//! support inboxes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(SUBSCRIPTIONS_SQL).await?;
        db.execute_unprepared(USER_LIMITS_SQL).await?;
        db.execute_unprepared(MESSAGES_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
            DROP TABLE IF EXISTS support_messages CASCADE;
            DROP TABLE IF EXISTS contact_messages CASCADE;
            DROP TABLE IF EXISTS user_limits CASCADE;
            DROP TABLE IF EXISTS subscriptions CASCADE;
            ",
        )
        .await?;
        Ok(())
    }
}

const SUBSCRIPTIONS_SQL: &str = r"
-- One row per user; webhooks upsert ON CONFLICT (user_id)
CREATE TABLE subscriptions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    plan_id VARCHAR(50) NOT NULL,
    status VARCHAR(20) NOT NULL,
    provider VARCHAR(20),
    paypal_subscription_id VARCHAR(100),
    paystack_reference VARCHAR(100),
    paystack_subscription_code VARCHAR(100),
    paystack_customer_code VARCHAR(100),
    yoco_charge_id VARCHAR(100),
    current_period_start TIMESTAMPTZ,
    current_period_end TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_subscriptions_paypal ON subscriptions(paypal_subscription_id)
    WHERE paypal_subscription_id IS NOT NULL;
CREATE INDEX idx_subscriptions_paystack ON subscriptions(paystack_subscription_code)
    WHERE paystack_subscription_code IS NOT NULL;
CREATE INDEX idx_subscriptions_yoco ON subscriptions(yoco_charge_id)
    WHERE yoco_charge_id IS NOT NULL;
";

const USER_LIMITS_SQL: &str = r"
CREATE TABLE user_limits (
    user_id UUID PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    max_invoices INTEGER NOT NULL DEFAULT 2,
    max_estimates INTEGER NOT NULL DEFAULT 2,
    max_credit_notes INTEGER NOT NULL DEFAULT 2,
    max_delivery_notes INTEGER NOT NULL DEFAULT 2,
    max_purchase_orders INTEGER NOT NULL DEFAULT 2,
    max_clients INTEGER NOT NULL DEFAULT 2,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const MESSAGES_SQL: &str = r"
CREATE TABLE contact_messages (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(200) NOT NULL,
    email VARCHAR(255) NOT NULL,
    subject VARCHAR(200),
    message TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE support_messages (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    subject VARCHAR(200) NOT NULL,
    message TEXT NOT NULL,
    status VARCHAR(20) NOT NULL DEFAULT 'open',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_support_messages_user ON support_messages(user_id, created_at DESC);
";
