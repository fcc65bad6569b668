//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every query on user data is filtered by the owning user.

pub mod client;
pub mod dashboard;
pub mod document;
pub mod item;
pub mod message;
pub mod profile;
pub mod subscription;
pub mod user;

pub use client::{ClientError, ClientInput, ClientRepository};
pub use dashboard::DashboardRepository;
pub use document::{
    DocumentFilter, DocumentInput, DocumentListEntry, DocumentRepoError, DocumentRepository,
    DocumentWithItems, kind_condition,
};
pub use item::{ItemError, ItemRepository};
pub use message::{ContactInput, MessageRepository};
pub use profile::{ProfileRepository, UpdateProfileInput};
pub use subscription::{ReconcileOutcome, SubscriptionError, SubscriptionRepository};
pub use user::{CreateUserInput, UserRepository};
