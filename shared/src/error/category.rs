//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Account linking / OAuth errors
/// - 4xxx: RFQ errors
/// - 5xxx: Quote errors
/// - 6xxx: Order errors
/// - 7xxx: Catalog errors
/// - 8xxx: Notification errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Account linking / OAuth errors (3xxx)
    Linking,
    /// RFQ errors (4xxx)
    Rfq,
    /// Quote errors (5xxx)
    Quote,
    /// Order errors (6xxx)
    Order,
    /// Catalog errors (7xxx)
    Catalog,
    /// Notification errors (8xxx)
    Notification,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Linking,
            4000..5000 => Self::Rfq,
            5000..6000 => Self::Quote,
            6000..7000 => Self::Order,
            7000..8000 => Self::Catalog,
            8000..9000 => Self::Notification,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Linking => "linking",
            Self::Rfq => "rfq",
            Self::Quote => "quote",
            Self::Order => "order",
            Self::Catalog => "catalog",
            Self::Notification => "notification",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Linking);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Rfq);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Quote);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Order);
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::Catalog);
        assert_eq!(ErrorCategory::from_code(8001), ErrorCategory::Notification);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::NotAuthenticated.category(), ErrorCategory::Auth);
        assert_eq!(
            ErrorCode::PermissionDenied.category(),
            ErrorCategory::Permission
        );
        assert_eq!(ErrorCode::AlreadyLinked.category(), ErrorCategory::Linking);
        assert_eq!(ErrorCode::RfqNotFound.category(), ErrorCategory::Rfq);
        assert_eq!(ErrorCode::QuoteNotFound.category(), ErrorCategory::Quote);
        assert_eq!(ErrorCode::OrderNotFound.category(), ErrorCategory::Order);
        assert_eq!(
            ErrorCode::SupplierNotFound.category(),
            ErrorCategory::Catalog
        );
        assert_eq!(
            ErrorCode::NotificationNotFound.category(),
            ErrorCategory::Notification
        );
        assert_eq!(ErrorCode::InternalError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_name() {
        assert_eq!(ErrorCategory::General.name(), "general");
        assert_eq!(ErrorCategory::Linking.name(), "linking");
        assert_eq!(ErrorCategory::Rfq.name(), "rfq");
        assert_eq!(ErrorCategory::Quote.name(), "quote");
        assert_eq!(ErrorCategory::Order.name(), "order");
        assert_eq!(ErrorCategory::System.name(), "system");
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Linking).unwrap();
        assert_eq!(json, "\"linking\"");

        let category: ErrorCategory = serde_json::from_str("\"order\"").unwrap();
        assert_eq!(category, ErrorCategory::Order);
    }
}
