//! OAuth providers and broker flows

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported identity providers.
///
/// `wechat` only works in demo mode (simulated redirect round-trip); the
/// real integration is not implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Facebook,
    Wechat,
}

impl Provider {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Facebook => "facebook",
            Self::Wechat => "wechat",
        }
    }
}

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Self::Google),
            "facebook" => Ok(Self::Facebook),
            "wechat" => Ok(Self::Wechat),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProvider(pub String);

impl fmt::Display for UnknownProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown provider: {}", self.0)
    }
}

impl std::error::Error for UnknownProvider {}

/// Which broker flow a state token was minted for. A token minted for one
/// flow cannot be consumed by the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthFlow {
    Login,
    Link,
}

impl OAuthFlow {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Link => "link",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse() {
        assert_eq!("google".parse::<Provider>(), Ok(Provider::Google));
        assert_eq!("facebook".parse::<Provider>(), Ok(Provider::Facebook));
        assert_eq!("wechat".parse::<Provider>(), Ok(Provider::Wechat));
        assert!("github".parse::<Provider>().is_err());
        assert!("Google".parse::<Provider>().is_err());
    }

    #[test]
    fn test_provider_display() {
        assert_eq!(Provider::Google.to_string(), "google");
        assert_eq!(
            serde_json::to_string(&Provider::Facebook).unwrap(),
            "\"facebook\""
        );
    }

    #[test]
    fn test_flow_str() {
        assert_eq!(OAuthFlow::Login.as_str(), "login");
        assert_eq!(OAuthFlow::Link.as_str(), "link");
        assert_ne!(OAuthFlow::Login, OAuthFlow::Link);
    }
}
