//! Quote status

use serde::{Deserialize, Serialize};

/// Quote status. A quote is immutable after creation except for status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    Pending,
    Accepted,
    Rejected,
}

impl QuoteStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(Self::Pending),
            "ACCEPTED" => Some(Self::Accepted),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_status_roundtrip() {
        for status in [
            QuoteStatus::Pending,
            QuoteStatus::Accepted,
            QuoteStatus::Rejected,
        ] {
            assert_eq!(QuoteStatus::from_db(status.as_str()), Some(status));
        }
        assert_eq!(QuoteStatus::from_db("OPEN"), None);
    }
}
