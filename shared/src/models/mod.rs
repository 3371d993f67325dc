//! Domain status enums and their transition rules
//!
//! Statuses are stored as their canonical SCREAMING_SNAKE_CASE strings in
//! the database and on the wire; `as_str`/`from_db` are the single source
//! of truth for that mapping.

mod notification;
mod order;
mod provider;
mod quote;
mod rfq;
mod role;

pub use notification::NotificationKind;
pub use order::OrderStatus;
pub use provider::{OAuthFlow, Provider};
pub use quote::QuoteStatus;
pub use rfq::RfqStatus;
pub use role::Role;
