//! Database seeder for Invoxa development and testing.
//!
//! Seeds a demo account with a business profile, two clients, an item
//! catalogue and a handful of documents in different states.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use invoxa_core::auth::{hash_password, normalize_email};
use invoxa_core::document::{DocumentKind, DocumentStatus, LineItemInput};
use invoxa_db::repositories::{
    ClientInput, CreateUserInput, DocumentInput, ProfileRepository, UpdateProfileInput,
};
use invoxa_db::{ClientRepository, DocumentRepository, ItemRepository, UserRepository};

/// Demo login.
const DEMO_EMAIL: &str = "demo@invoxa.dev";
const DEMO_PASSWORD: &str = "demo-password";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = invoxa_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let users = UserRepository::new(db.clone());
    let email = normalize_email(DEMO_EMAIL);
    if users.email_exists(&email).await? {
        println!("  Demo user already exists, skipping...");
        return Ok(());
    }

    println!("Seeding demo user...");
    let (user, _) = users
        .create_with_profile(CreateUserInput {
            email,
            password_hash: hash_password(DEMO_PASSWORD)?,
            full_name: "Ama Mensah".to_string(),
            business_name: "Mensah Carpentry".to_string(),
        })
        .await?;

    ProfileRepository::new(db.clone())
        .update(
            user.id,
            UpdateProfileInput {
                address: Some(Some("14 Ring Road, Accra".to_string())),
                phone: Some(Some("+233 20 000 0000".to_string())),
                accent_color: Some(Some("#8B5A2B".to_string())),
                ..UpdateProfileInput::default()
            },
        )
        .await?;

    println!("Seeding clients...");
    let clients = ClientRepository::new(db.clone());
    let kofi = clients
        .create(
            user.id,
            ClientInput {
                name: "Kofi Boateng".to_string(),
                email: Some("kofi@example.com".to_string()),
                phone: None,
                address: Some("3 Osu Avenue, Accra".to_string()),
                tax_id: None,
            },
        )
        .await?;
    let esi = clients
        .create(
            user.id,
            ClientInput {
                name: "Esi Owusu Interiors".to_string(),
                email: Some("accounts@owusu.example.com".to_string()),
                phone: Some("+233 24 111 2222".to_string()),
                address: None,
                tax_id: Some("GH-778812".to_string()),
            },
        )
        .await?;

    println!("Seeding item catalogue...");
    let items = ItemRepository::new(db.clone());
    let catalogue = [
        ("Kitchen cabinet door", Decimal::new(4500, 2)),
        ("Oak shelf, per metre", Decimal::new(3000, 2)),
        ("Labour, per hour", Decimal::new(2500, 2)),
    ];
    for (description, rate) in catalogue {
        items.create(user.id, description.to_string(), rate).await?;
    }

    println!("Seeding documents...");
    let documents = DocumentRepository::new(db);
    let today = Utc::now().date_naive();

    let draft = |kind: DocumentKind, client_id, days_ago: i64, lines: Vec<LineItemInput>| {
        let issue_date = today - Duration::days(days_ago);
        DocumentInput {
            kind,
            client_id: Some(client_id),
            number: None,
            issue_date,
            due_date: Some(issue_date + Duration::days(30)),
            currency: "USD".to_string(),
            notes: None,
            tax_rate: Decimal::new(15, 0),
            discount_rate: Decimal::ZERO,
            items: lines,
        }
    };

    let paid = documents
        .create(
            user.id,
            draft(
                DocumentKind::Invoice,
                kofi.id,
                45,
                vec![
                    LineItemInput::new("Kitchen cabinet door", Decimal::new(6, 0), Decimal::new(4500, 2)),
                    LineItemInput::new("Labour, per hour", Decimal::new(8, 0), Decimal::new(2500, 2)),
                ],
            ),
        )
        .await?;
    documents
        .set_status(user.id, paid.document.id, DocumentStatus::Paid)
        .await?;

    let sent = documents
        .create(
            user.id,
            draft(
                DocumentKind::Invoice,
                esi.id,
                10,
                vec![LineItemInput::new(
                    "Oak shelf, per metre",
                    Decimal::new(12, 0),
                    Decimal::new(3000, 2),
                )],
            ),
        )
        .await?;
    documents
        .set_status(user.id, sent.document.id, DocumentStatus::Sent)
        .await?;

    documents
        .create(
            user.id,
            draft(
                DocumentKind::Estimate,
                esi.id,
                2,
                vec![LineItemInput::new(
                    "Built-in wardrobe",
                    Decimal::ONE,
                    Decimal::new(120_000, 2),
                )],
            ),
        )
        .await?;

    println!("Seeding complete! Log in as {DEMO_EMAIL} / {DEMO_PASSWORD}");
    Ok(())
}
