//! OAuth broker: state tokens and provider code exchange

pub mod providers;
pub mod state_store;

pub use providers::{SocialIdentity, wechat_demo_identity};
pub use state_store::StateStore;
