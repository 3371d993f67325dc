//! Database access layer

pub mod categories;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod quotes;
pub mod rfqs;
pub mod social_accounts;
pub mod supplier_profiles;
pub mod users;
