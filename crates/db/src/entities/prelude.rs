//! Entity re-exports.

pub use super::clients::Entity as Clients;
pub use super::contact_messages::Entity as ContactMessages;
pub use super::invoice_items::Entity as InvoiceItems;
pub use super::invoices::Entity as Invoices;
pub use super::items::Entity as Items;
pub use super::profiles::Entity as Profiles;
pub use super::subscriptions::Entity as Subscriptions;
pub use super::support_messages::Entity as SupportMessages;
pub use super::user_limits::Entity as UserLimits;
pub use super::users::Entity as Users;
