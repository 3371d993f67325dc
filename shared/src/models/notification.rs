//! Notification kinds

use serde::{Deserialize, Serialize};

/// Notification kind, emitted by the order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    OrderCreated,
    OrderStatusUpdated,
}

impl NotificationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OrderCreated => "ORDER_CREATED",
            Self::OrderStatusUpdated => "ORDER_STATUS_UPDATED",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "ORDER_CREATED" => Some(Self::OrderCreated),
            "ORDER_STATUS_UPDATED" => Some(Self::OrderStatusUpdated),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_kind_roundtrip() {
        for kind in [
            NotificationKind::OrderCreated,
            NotificationKind::OrderStatusUpdated,
        ] {
            assert_eq!(NotificationKind::from_db(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::from_db("ORDER_DELETED"), None);
    }
}
