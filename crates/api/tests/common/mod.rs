//! Test harness: the full router over an in-memory SQLite database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{NaiveDate, Utc};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend,
    EntityTrait, Schema, Set,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use invoxa_api::{AppState, GatewayClient, create_router};
use invoxa_db::UserRepository;
use invoxa_db::entities::{
    clients, contact_messages, invoice_items, invoices, items, profiles, sea_orm_active_enums,
    subscriptions, support_messages, user_limits, users,
};
use invoxa_core::billing::{Activation, BillingProvider, UserRef};
use invoxa_db::repositories::SubscriptionRepository;
use invoxa_shared::config::{
    AppSettings, DatabaseConfig, JwtSettings, PayPalConfig, PaymentsConfig, PaystackConfig,
    ServerConfig,
};
use invoxa_shared::{AppConfig, EmailConfig, EmailService, JwtConfig, JwtService};

/// Paystack secret configured for tests.
pub const PAYSTACK_SECRET: &str = "sk_test_invoxa";

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) {
    let backend = DbBackend::Sqlite;
    let statement = Schema::new(backend).create_table_from_entity(entity);
    db.execute(backend.build(&statement))
        .await
        .expect("Failed to create table");
}

async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");

    create_table(&db, users::Entity).await;
    create_table(&db, profiles::Entity).await;
    create_table(&db, clients::Entity).await;
    create_table(&db, items::Entity).await;
    create_table(&db, invoices::Entity).await;
    create_table(&db, invoice_items::Entity).await;
    create_table(&db, subscriptions::Entity).await;
    create_table(&db, user_limits::Entity).await;
    create_table(&db, contact_messages::Entity).await;
    create_table(&db, support_messages::Entity).await;

    db
}

fn test_config(payments: PaymentsConfig) -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        jwt: JwtSettings {
            secret: "test-secret-key-for-testing".to_string(),
            access_token_expiry_secs: 900,
        },
        // Nothing listens on the discard port, so delivery fails fast.
        email: EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 9,
            ..EmailConfig::default()
        },
        payments,
        app: AppSettings::default(),
    }
}

/// Paystack configured, PayPal and Yoco not.
pub fn paystack_payments() -> PaymentsConfig {
    PaymentsConfig {
        paystack: Some(PaystackConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            secret_key: PAYSTACK_SECRET.to_string(),
        }),
        ..PaymentsConfig::default()
    }
}

/// PayPal configured against an address nothing listens on.
pub fn paypal_payments() -> PaymentsConfig {
    PaymentsConfig {
        paypal: Some(PayPalConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
        }),
        ..PaymentsConfig::default()
    }
}

/// Router plus its database.
pub struct TestApp {
    /// The router under test.
    pub router: Router,
    /// Direct handle for assertions.
    pub db: DatabaseConnection,
}

/// Builds the app with the given gateway configuration.
pub async fn spawn_app_with(payments: PaymentsConfig) -> TestApp {
    let db = setup_db().await;
    let config = test_config(payments);

    let state = AppState {
        db: Arc::new(db.clone()),
        jwt_service: Arc::new(JwtService::new(JwtConfig::from(&config.jwt))),
        email_service: Arc::new(EmailService::new(config.email.clone())),
        gateways: Arc::new(GatewayClient::new().expect("Failed to build gateway client")),
        config: Arc::new(config),
    };

    TestApp {
        router: create_router(state),
        db,
    }
}

/// Builds the app with Paystack configured.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(paystack_payments()).await
}

/// A response with its body parsed as JSON (`Null` when empty).
pub struct TestResponse {
    /// Status code.
    pub status: StatusCode,
    /// Parsed body.
    pub body: Value,
}

impl TestApp {
    /// Sends a request through the router.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Body is not JSON")
        };

        TestResponse { status, body }
    }

    /// Sends a JSON request, optionally authenticated.
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    /// Registers a user and returns their access token.
    pub async fn register(&self, email: &str) -> String {
        let response = self
            .json(
                Method::POST,
                "/api/auth/register",
                None,
                Some(&serde_json::json!({
                    "email": email,
                    "password": "correct-horse-battery",
                    "full_name": "Ama Mensah",
                    "business_name": "Mensah Carpentry"
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["access_token"]
            .as_str()
            .expect("No access token")
            .to_string()
    }
}

impl TestApp {
    /// Records a PayPal subscription id against the user.
    pub async fn link_paypal_subscription(&self, user_id: Uuid, subscription_id: &str) {
        let mut activation =
            Activation::professional(UserRef::Id(user_id), BillingProvider::PayPal, Utc::now());
        activation.refs.paypal_subscription_id = Some(subscription_id.to_string());
        SubscriptionRepository::activate(&self.db, activation)
            .await
            .expect("Failed to link PayPal subscription");
    }

    /// Looks up a registered user's id.
    pub async fn user_id(&self, email: &str) -> Uuid {
        UserRepository::new(self.db.clone())
            .find_by_email(email)
            .await
            .expect("Failed to query users")
            .expect("User not registered")
            .id
    }

    /// Inserts a paid document without a type, as rows written before the
    /// `document_type` column existed.
    pub async fn insert_legacy_paid_invoice(
        &self,
        user_id: Uuid,
        issue_date: NaiveDate,
        total: Decimal,
    ) {
        let now = Utc::now().into();
        invoices::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            client_id: Set(None),
            document_type: Set(None),
            invoice_number: Set("0001".to_string()),
            status: Set(sea_orm_active_enums::DocumentStatus::Paid),
            issue_date: Set(issue_date),
            due_date: Set(None),
            currency: Set("USD".to_string()),
            notes: Set(None),
            tax_rate: Set(Decimal::ZERO),
            discount_rate: Set(Decimal::ZERO),
            subtotal: Set(total),
            discount_amount: Set(Decimal::ZERO),
            tax_amount: Set(Decimal::ZERO),
            total: Set(total),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .expect("Failed to insert legacy document");
    }
}
