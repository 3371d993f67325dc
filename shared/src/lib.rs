//! Shared types for the procurement platform
//!
//! Common types used by the server and any future clients: the unified
//! error system, domain status enums with their transition rules, and
//! small utility helpers.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
