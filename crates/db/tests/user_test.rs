//! Integration tests for the user, profile, client and item repositories.

mod common;

use rust_decimal_macros::dec;
use uuid::Uuid;

use invoxa_db::repositories::{ClientError, ClientInput, ItemError, UpdateProfileInput};
use invoxa_db::{ClientRepository, ItemRepository, ProfileRepository, UserRepository};

use common::{create_user, create_user_with_email, setup_db};

fn client_input(name: &str) -> ClientInput {
    ClientInput {
        name: name.to_string(),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        phone: None,
        address: None,
        tax_id: None,
    }
}

#[tokio::test]
async fn test_user_create_and_find() {
    let db = setup_db().await;
    let user = create_user_with_email(&db, "owner@shop.test").await;

    let repo = UserRepository::new(db.clone());
    let by_email = repo.find_by_email("owner@shop.test").await.unwrap().unwrap();
    assert_eq!(by_email.id, user.id);

    let by_id = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(by_id.full_name, "Ama Mensah");

    assert!(repo.email_exists("owner@shop.test").await.unwrap());
    assert!(!repo.email_exists("nobody@shop.test").await.unwrap());
    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_registration_creates_profile_with_defaults() {
    let db = setup_db().await;
    let user = create_user_with_email(&db, "owner@shop.test").await;

    let profile = ProfileRepository::new(db.clone())
        .find_by_user(user.id)
        .await
        .unwrap()
        .expect("profile created with user");

    assert_eq!(profile.business_name, "Mensah Carpentry");
    assert_eq!(profile.email.as_deref(), Some("owner@shop.test"));
    assert_eq!(profile.currency, "USD");
    assert_eq!(profile.timezone, "UTC");
}

#[tokio::test]
async fn test_profile_update_is_partial() {
    let db = setup_db().await;
    let user = create_user(&db).await;
    let repo = ProfileRepository::new(db.clone());

    let updated = repo
        .update(
            user.id,
            UpdateProfileInput {
                phone: Some(Some("+233 20 000 0000".to_string())),
                currency: Some("ghs".to_string()),
                ..UpdateProfileInput::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.phone.as_deref(), Some("+233 20 000 0000"));
    assert_eq!(updated.currency, "GHS");
    assert_eq!(updated.business_name, "Mensah Carpentry");

    let cleared = repo
        .update(
            user.id,
            UpdateProfileInput {
                phone: Some(None),
                ..UpdateProfileInput::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cleared.phone, None);
    assert_eq!(cleared.currency, "GHS");

    assert!(
        repo.update(Uuid::new_v4(), UpdateProfileInput::default())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_clients_are_scoped_to_their_owner() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let other = create_user(&db).await;
    let repo = ClientRepository::new(db.clone());

    let esi = repo.create(owner.id, client_input("Esi")).await.unwrap();
    repo.create(owner.id, client_input("Akua")).await.unwrap();
    repo.create(other.id, client_input("Yaw")).await.unwrap();

    let listed = repo.list(owner.id).await.unwrap();
    let names: Vec<_> = listed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Akua", "Esi"]);

    assert!(matches!(
        repo.get(other.id, esi.id).await,
        Err(ClientError::NotFound(_))
    ));
    assert!(matches!(
        repo.update(other.id, esi.id, client_input("Stolen")).await,
        Err(ClientError::NotFound(_))
    ));

    let renamed = repo
        .update(owner.id, esi.id, client_input("Esi Owusu"))
        .await
        .unwrap();
    assert_eq!(renamed.name, "Esi Owusu");
}

#[tokio::test]
async fn test_item_catalogue() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let other = create_user(&db).await;
    let repo = ItemRepository::new(db.clone());

    let item = repo
        .create(owner.id, "Labour, per hour".to_string(), dec!(25))
        .await
        .unwrap();
    assert!(matches!(
        repo.create(owner.id, "Refund".to_string(), dec!(-1)).await,
        Err(ItemError::NegativeRate)
    ));

    let updated = repo
        .update(owner.id, item.id, "Labour, per hour".to_string(), dec!(30))
        .await
        .unwrap();
    assert_eq!(updated.rate, dec!(30));

    assert!(matches!(
        repo.update(other.id, item.id, "x".to_string(), dec!(1)).await,
        Err(ItemError::NotFound(_))
    ));
    assert_eq!(repo.list(other.id).await.unwrap().len(), 0);
    assert_eq!(repo.list(owner.id).await.unwrap().len(), 1);
}
