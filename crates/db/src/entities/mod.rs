//! `SeaORM` entity definitions.

pub mod prelude;

pub mod clients;
pub mod contact_messages;
pub mod invoice_items;
pub mod invoices;
pub mod items;
pub mod profiles;
pub mod sea_orm_active_enums;
pub mod subscriptions;
pub mod support_messages;
pub mod user_limits;
pub mod users;
