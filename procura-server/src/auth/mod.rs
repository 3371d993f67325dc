//! Authentication: JWT sessions and the OAuth broker

pub mod jwt;
pub mod oauth;

pub use jwt::{AuthUser, auth_middleware, create_token};
