//! RFQ lifecycle status

use serde::{Deserialize, Serialize};

/// RFQ lifecycle: created DRAFT, item mutation allowed; submitted to OPEN
/// for quoting; CLOSED or CANCELLED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RfqStatus {
    Draft,
    Open,
    Closed,
    Cancelled,
}

impl RfqStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "DRAFT" => Some(Self::Draft),
            "OPEN" => Some(Self::Open),
            "CLOSED" => Some(Self::Closed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Item mutation (append/update) is only allowed while drafting.
    pub const fn allows_item_mutation(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfq_status_roundtrip() {
        for status in [
            RfqStatus::Draft,
            RfqStatus::Open,
            RfqStatus::Closed,
            RfqStatus::Cancelled,
        ] {
            assert_eq!(RfqStatus::from_db(status.as_str()), Some(status));
        }
        assert_eq!(RfqStatus::from_db("draft"), None);
    }

    #[test]
    fn test_item_mutation_only_in_draft() {
        assert!(RfqStatus::Draft.allows_item_mutation());
        assert!(!RfqStatus::Open.allows_item_mutation());
        assert!(!RfqStatus::Closed.allows_item_mutation());
        assert!(!RfqStatus::Cancelled.allows_item_mutation());
    }
}
