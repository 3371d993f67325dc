//! Order fulfillment state machine

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
///
/// Suppliers move orders along a closed transition table (see
/// [`OrderStatus::supplier_can_transition`]); admins may set any value.
/// No supplier path reaches CANCELLED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Supplier-driven transition table:
    /// PENDING -> IN_PROGRESS, CONFIRMED -> IN_PROGRESS, IN_PROGRESS -> COMPLETED.
    /// Everything else is rejected.
    pub const fn supplier_can_transition(&self, to: OrderStatus) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::InProgress)
                | (Self::Confirmed, Self::InProgress)
                | (Self::InProgress, Self::Completed)
        )
    }

    /// A buyer may delete their own order only while it is still PENDING.
    pub const fn buyer_can_delete(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    const ALL: [OrderStatus; 5] = [Pending, Confirmed, InProgress, Completed, Cancelled];

    #[test]
    fn test_order_status_roundtrip() {
        for status in ALL {
            assert_eq!(OrderStatus::from_db(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::from_db("in_progress"), None);
        assert_eq!(OrderStatus::from_db("SHIPPED"), None);
    }

    #[test]
    fn test_supplier_transition_table_allowed() {
        assert!(Pending.supplier_can_transition(InProgress));
        assert!(Confirmed.supplier_can_transition(InProgress));
        assert!(InProgress.supplier_can_transition(Completed));
    }

    #[test]
    fn test_supplier_transition_table_closed() {
        // Everything outside the three allowed pairs must be rejected,
        // including self-transitions and any path to CANCELLED.
        for from in ALL {
            for to in ALL {
                let allowed = matches!(
                    (from, to),
                    (Pending, InProgress) | (Confirmed, InProgress) | (InProgress, Completed)
                );
                assert_eq!(
                    from.supplier_can_transition(to),
                    allowed,
                    "transition {} -> {}",
                    from.as_str(),
                    to.as_str()
                );
            }
        }
    }

    #[test]
    fn test_no_supplier_path_to_cancelled() {
        for from in ALL {
            assert!(!from.supplier_can_transition(Cancelled));
        }
    }

    #[test]
    fn test_buyer_can_delete_only_pending() {
        assert!(Pending.buyer_can_delete());
        assert!(!Confirmed.buyer_can_delete());
        assert!(!InProgress.buyer_can_delete());
        assert!(!Completed.buyer_can_delete());
        assert!(!Cancelled.buyer_can_delete());
    }

    #[test]
    fn test_serialize_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"CANCELLED\"").unwrap(),
            Cancelled
        );
    }
}
