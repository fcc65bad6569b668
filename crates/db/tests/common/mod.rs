//! Shared helpers for repository tests.
//!
//! Each test gets a private in-memory SQLite database whose schema is built
//! from the entities. The pool holds exactly one connection so the database
//! lives as long as the pool.

#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend,
    EntityTrait, Schema, Set,
};
use uuid::Uuid;

use invoxa_db::entities::{
    clients, contact_messages, invoice_items, invoices, items, profiles, sea_orm_active_enums,
    subscriptions, support_messages, user_limits, users,
};
use invoxa_db::repositories::{CreateUserInput, UserRepository};

/// Opens an empty in-memory database.
pub async fn connect_memory() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    Database::connect(options)
        .await
        .expect("Failed to open in-memory database")
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) {
    let backend = DbBackend::Sqlite;
    let statement = Schema::new(backend).create_table_from_entity(entity);
    db.execute(backend.build(&statement))
        .await
        .expect("Failed to create table");
}

/// Opens an in-memory database with every table created.
pub async fn setup_db() -> DatabaseConnection {
    let db = connect_memory().await;

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

/// Registers a user with a unique email and returns it.
pub async fn create_user(db: &DatabaseConnection) -> users::Model {
    let email = format!("owner-{}@shop.test", Uuid::new_v4());
    create_user_with_email(db, &email).await
}

/// Registers a user with the given email.
pub async fn create_user_with_email(db: &DatabaseConnection, email: &str) -> users::Model {
    let (user, _profile) = UserRepository::new(db.clone())
        .create_with_profile(CreateUserInput {
            email: email.to_string(),
            password_hash: "$argon2id$test_hash".to_string(),
            full_name: "Ama Mensah".to_string(),
            business_name: "Mensah Carpentry".to_string(),
        })
        .await
        .expect("Failed to create user");
    user
}

/// Inserts a document row directly, bypassing the repository.
///
/// `document_type = None` models rows written before the column existed.
pub async fn insert_raw_document(
    db: &DatabaseConnection,
    user_id: Uuid,
    document_type: Option<&str>,
    number: &str,
    status: sea_orm_active_enums::DocumentStatus,
    issue_date: NaiveDate,
    total: Decimal,
) -> invoices::Model {
    let now = Utc::now().into();
    invoices::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        client_id: Set(None),
        document_type: Set(document_type.map(str::to_string)),
        invoice_number: Set(number.to_string()),
        status: Set(status),
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
    .insert(db)
    .await
    .expect("Failed to insert document")
}

/// Puts a subscription row with the given raw status.
pub async fn insert_subscription(db: &DatabaseConnection, user_id: Uuid, status: &str) {
    let now = Utc::now().into();
    subscriptions::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        plan_id: Set("Professional".to_string()),
        status: Set(status.to_string()),
        provider: Set(None),
        paypal_subscription_id: Set(None),
        paystack_reference: Set(None),
        paystack_subscription_code: Set(None),
        paystack_customer_code: Set(None),
        yoco_charge_id: Set(None),
        current_period_start: Set(None),
        current_period_end: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert subscription");
}

/// Today's date for tests that do not care about it.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
