//! Integration tests for webhook reconciliation.

mod common;

use chrono::Utc;
use serde_json::json;

use invoxa_core::billing::{
    PayPalEvent, PaystackEvent, SubscriptionStatus, WebhookAction, YocoEvent,
};
use invoxa_db::repositories::{ReconcileOutcome, SubscriptionError, SubscriptionRepository};
use sea_orm::{EntityTrait, PaginatorTrait};

use invoxa_db::entities::subscriptions;

use common::{create_user_with_email, setup_db};

fn paypal_sale(email: &str) -> WebhookAction {
    let body = json!({
        "event_type": "PAYMENT.SALE.COMPLETED",
        "resource": {
            "id": "SALE-1",
            "billing_agreement_id": "I-SUB123",
            "payer": { "payer_info": { "email": email } }
        }
    });
    PayPalEvent::parse(body.to_string().as_bytes())
        .unwrap()
        .into_action(Utc::now())
        .unwrap()
}

#[tokio::test]
async fn test_paypal_replay_converges_on_one_row() {
    let db = setup_db().await;
    let user = create_user_with_email(&db, "owner@shop.test").await;

    for _ in 0..2 {
        let outcome = SubscriptionRepository::apply(&db, paypal_sale("Owner@Shop.test"))
            .await
            .unwrap();
        assert_eq!(outcome, ReconcileOutcome::Activated { user_id: user.id });
    }

    assert_eq!(subscriptions::Entity::find().count(&db).await.unwrap(), 1);

    let row = SubscriptionRepository::find_for_user(&db, user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.plan_id, "Professional");
    assert_eq!(row.status, SubscriptionStatus::Active.as_str());
    assert_eq!(row.provider.as_deref(), Some("paypal"));
    assert_eq!(row.paypal_subscription_id.as_deref(), Some("I-SUB123"));
    assert!(SubscriptionRepository::is_plan_active(&db, user.id).await.unwrap());
}

#[tokio::test]
async fn test_paypal_subscription_lookup_by_id() {
    let db = setup_db().await;
    let user = create_user_with_email(&db, "owner@shop.test").await;

    assert!(
        SubscriptionRepository::find_by_paypal_subscription(&db, "I-SUB123")
            .await
            .unwrap()
            .is_none()
    );

    SubscriptionRepository::apply(&db, paypal_sale("owner@shop.test"))
        .await
        .unwrap();

    let holder = SubscriptionRepository::find_by_paypal_subscription(&db, "I-SUB123")
        .await
        .unwrap()
        .expect("subscription id recorded");
    assert_eq!(holder.user_id, user.id);
    assert!(
        SubscriptionRepository::find_by_paypal_subscription(&db, "I-OTHER")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_yoco_charge_is_applied_once() {
    let db = setup_db().await;
    let user = create_user_with_email(&db, "owner@shop.test").await;

    let body = json!({
        "type": "payment.succeeded",
        "payload": {
            "id": "ch_123",
            "metadata": { "userId": user.id.to_string(), "billingCycle": "monthly" }
        }
    })
    .to_string();
    let action = || {
        YocoEvent::parse(body.as_bytes())
            .unwrap()
            .into_action(Utc::now())
            .unwrap()
    };

    assert_eq!(
        SubscriptionRepository::apply(&db, action()).await.unwrap(),
        ReconcileOutcome::Activated { user_id: user.id }
    );
    assert_eq!(
        SubscriptionRepository::apply(&db, action()).await.unwrap(),
        ReconcileOutcome::AlreadyApplied { user_id: user.id }
    );

    let row = SubscriptionRepository::find_for_user(&db, user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.yoco_charge_id.as_deref(), Some("ch_123"));
    assert!(row.current_period_end.is_some());
}

#[tokio::test]
async fn test_unknown_user_is_reported() {
    let db = setup_db().await;

    let result = SubscriptionRepository::apply(&db, paypal_sale("nobody@shop.test")).await;
    assert!(matches!(result, Err(SubscriptionError::UnknownUser(_))));
    assert_eq!(subscriptions::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_paystack_charge_then_disable() {
    let db = setup_db().await;
    let user = create_user_with_email(&db, "owner@shop.test").await;

    let charge = json!({
        "event": "charge.success",
        "data": {
            "reference": "ref_1",
            "subscription_code": "SUB_abc",
            "customer": { "email": "owner@shop.test", "customer_code": "CUS_1" },
            "metadata": { "user_id": user.id.to_string(), "billing_cycle": "annual" }
        }
    });
    let action = PaystackEvent::parse(charge.to_string().as_bytes())
        .unwrap()
        .into_action(Utc::now())
        .unwrap();
    SubscriptionRepository::apply(&db, action).await.unwrap();
    assert!(SubscriptionRepository::is_plan_active(&db, user.id).await.unwrap());

    // No email: the subscription code locates the row.
    let disable = json!({
        "event": "subscription.disable",
        "data": { "subscription_code": "SUB_abc" }
    });
    let action = PaystackEvent::parse(disable.to_string().as_bytes())
        .unwrap()
        .into_action(Utc::now())
        .unwrap();
    let outcome = SubscriptionRepository::apply(&db, action).await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::Cancelled { rows: 1 });

    let row = SubscriptionRepository::find_for_user(&db, user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "cancelled");
    assert!(!SubscriptionRepository::is_plan_active(&db, user.id).await.unwrap());
}

#[tokio::test]
async fn test_reactivation_keeps_other_gateway_refs() {
    let db = setup_db().await;
    let user = create_user_with_email(&db, "owner@shop.test").await;

    SubscriptionRepository::apply(&db, paypal_sale("owner@shop.test"))
        .await
        .unwrap();

    let body = json!({
        "type": "payment.succeeded",
        "payload": { "id": "ch_9", "metadata": { "email": "owner@shop.test" } }
    });
    let action = YocoEvent::parse(body.to_string().as_bytes())
        .unwrap()
        .into_action(Utc::now())
        .unwrap();
    SubscriptionRepository::apply(&db, action).await.unwrap();

    let row = SubscriptionRepository::find_for_user(&db, user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.provider.as_deref(), Some("yoco"));
    assert_eq!(row.paypal_subscription_id.as_deref(), Some("I-SUB123"));
    assert_eq!(row.yoco_charge_id.as_deref(), Some("ch_9"));
}

#[tokio::test]
async fn test_ignored_event_changes_nothing() {
    let db = setup_db().await;

    let outcome = SubscriptionRepository::apply(&db, WebhookAction::Ignore("ping".into()))
        .await
        .unwrap();
    assert_eq!(outcome, ReconcileOutcome::Ignored("ping".into()));
}
