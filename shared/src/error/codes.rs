//! Unified error codes for the procurement platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account linking / OAuth errors
//! - 4xxx: RFQ errors
//! - 5xxx: Quote errors
//! - 6xxx: Order errors
//! - 7xxx: Catalog errors
//! - 8xxx: Notification errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,
    /// Email already registered
    EmailTaken = 1006,
    /// Password too short
    PasswordTooShort = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Account linking / OAuth ====================
    /// OAuth provider not supported
    ProviderNotSupported = 3001,
    /// OAuth provider unavailable (not configured or disabled)
    ProviderUnavailable = 3002,
    /// OAuth state token unknown, expired, or already used
    StateInvalid = 3003,
    /// OAuth code exchange with the provider failed
    ExchangeFailed = 3004,
    /// Social account already linked to a different user
    AlreadyLinked = 3005,
    /// Link flow state record carries no user
    LinkUserMissing = 3006,
    /// Social account link not found
    SocialAccountNotFound = 3007,

    // ==================== 4xxx: RFQ ====================
    /// RFQ not found
    RfqNotFound = 4001,
    /// RFQ item not found
    RfqItemNotFound = 4002,
    /// RFQ is not in DRAFT status
    RfqNotDraft = 4003,
    /// RFQ item is invalid (empty description/unit or non-positive quantity)
    RfqInvalidItem = 4004,

    // ==================== 5xxx: Quote ====================
    /// Quote not found
    QuoteNotFound = 5001,
    /// Quote submission carries no items
    QuoteEmptyItems = 5002,
    /// Quote references an item outside the target RFQ
    QuoteItemForeign = 5003,
    /// Quote unit price is invalid
    QuoteInvalidPrice = 5004,
    /// Quote validity date is invalid or in the past
    QuoteValidityInvalid = 5005,

    // ==================== 6xxx: Order ====================
    /// Order not found
    OrderNotFound = 6001,
    /// Order status transition not allowed
    InvalidStatusTransition = 6002,
    /// Order patch carries no fields
    NoFieldsToUpdate = 6003,
    /// An order already exists for this quote
    OrderExistsForQuote = 6004,
    /// Order amount is invalid
    OrderInvalidAmount = 6005,

    // ==================== 7xxx: Catalog ====================
    /// Supplier not found
    SupplierNotFound = 7001,
    /// Caller has no supplier profile
    SupplierProfileRequired = 7002,
    /// Product not found
    ProductNotFound = 7003,
    /// Material category not found
    CategoryNotFound = 7004,
    /// Material category name already exists
    CategoryNameExists = 7005,

    // ==================== 8xxx: Notification ====================
    /// Notification not found
    NotificationNotFound = 8001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Configuration error
    ConfigError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::EmailTaken => "Email already registered",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Account linking / OAuth
            ErrorCode::ProviderNotSupported => "OAuth provider not supported",
            ErrorCode::ProviderUnavailable => "OAuth provider unavailable",
            ErrorCode::StateInvalid => "OAuth state is unknown, expired, or already used",
            ErrorCode::ExchangeFailed => "OAuth code exchange failed",
            ErrorCode::AlreadyLinked => "Social account already linked to another user",
            ErrorCode::LinkUserMissing => "Link flow carries no user",
            ErrorCode::SocialAccountNotFound => "Social account link not found",

            // RFQ
            ErrorCode::RfqNotFound => "RFQ not found",
            ErrorCode::RfqItemNotFound => "RFQ item not found",
            ErrorCode::RfqNotDraft => "RFQ is not in DRAFT status",
            ErrorCode::RfqInvalidItem => "RFQ item is invalid",

            // Quote
            ErrorCode::QuoteNotFound => "Quote not found",
            ErrorCode::QuoteEmptyItems => "Quote submission carries no items",
            ErrorCode::QuoteItemForeign => "Quote references an item outside the RFQ",
            ErrorCode::QuoteInvalidPrice => "Quote unit price is invalid",
            ErrorCode::QuoteValidityInvalid => "Quote validity date is invalid",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InvalidStatusTransition => "Order status transition not allowed",
            ErrorCode::NoFieldsToUpdate => "No fields to update",
            ErrorCode::OrderExistsForQuote => "An order already exists for this quote",
            ErrorCode::OrderInvalidAmount => "Order amount is invalid",

            // Catalog
            ErrorCode::SupplierNotFound => "Supplier not found",
            ErrorCode::SupplierProfileRequired => "Caller has no supplier profile",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::CategoryNotFound => "Material category not found",
            ErrorCode::CategoryNameExists => "Material category name already exists",

            // Notification
            ErrorCode::NotificationNotFound => "Notification not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),
            1006 => Ok(ErrorCode::EmailTaken),
            1007 => Ok(ErrorCode::PasswordTooShort),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),

            // Account linking / OAuth
            3001 => Ok(ErrorCode::ProviderNotSupported),
            3002 => Ok(ErrorCode::ProviderUnavailable),
            3003 => Ok(ErrorCode::StateInvalid),
            3004 => Ok(ErrorCode::ExchangeFailed),
            3005 => Ok(ErrorCode::AlreadyLinked),
            3006 => Ok(ErrorCode::LinkUserMissing),
            3007 => Ok(ErrorCode::SocialAccountNotFound),

            // RFQ
            4001 => Ok(ErrorCode::RfqNotFound),
            4002 => Ok(ErrorCode::RfqItemNotFound),
            4003 => Ok(ErrorCode::RfqNotDraft),
            4004 => Ok(ErrorCode::RfqInvalidItem),

            // Quote
            5001 => Ok(ErrorCode::QuoteNotFound),
            5002 => Ok(ErrorCode::QuoteEmptyItems),
            5003 => Ok(ErrorCode::QuoteItemForeign),
            5004 => Ok(ErrorCode::QuoteInvalidPrice),
            5005 => Ok(ErrorCode::QuoteValidityInvalid),

            // Order
            6001 => Ok(ErrorCode::OrderNotFound),
            6002 => Ok(ErrorCode::InvalidStatusTransition),
            6003 => Ok(ErrorCode::NoFieldsToUpdate),
            6004 => Ok(ErrorCode::OrderExistsForQuote),
            6005 => Ok(ErrorCode::OrderInvalidAmount),

            // Catalog
            7001 => Ok(ErrorCode::SupplierNotFound),
            7002 => Ok(ErrorCode::SupplierProfileRequired),
            7003 => Ok(ErrorCode::ProductNotFound),
            7004 => Ok(ErrorCode::CategoryNotFound),
            7005 => Ok(ErrorCode::CategoryNameExists),

            // Notification
            8001 => Ok(ErrorCode::NotificationNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        // General
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::AlreadyExists.code(), 4);

        // Auth
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::TokenExpired.code(), 1003);
        assert_eq!(ErrorCode::EmailTaken.code(), 1006);

        // Permission
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);

        // Linking
        assert_eq!(ErrorCode::ProviderNotSupported.code(), 3001);
        assert_eq!(ErrorCode::StateInvalid.code(), 3003);
        assert_eq!(ErrorCode::AlreadyLinked.code(), 3005);

        // RFQ
        assert_eq!(ErrorCode::RfqNotFound.code(), 4001);
        assert_eq!(ErrorCode::RfqNotDraft.code(), 4003);

        // Quote
        assert_eq!(ErrorCode::QuoteNotFound.code(), 5001);
        assert_eq!(ErrorCode::QuoteItemForeign.code(), 5003);

        // Order
        assert_eq!(ErrorCode::OrderNotFound.code(), 6001);
        assert_eq!(ErrorCode::InvalidStatusTransition.code(), 6002);
        assert_eq!(ErrorCode::NoFieldsToUpdate.code(), 6003);
        assert_eq!(ErrorCode::OrderExistsForQuote.code(), 6004);

        // Catalog
        assert_eq!(ErrorCode::SupplierNotFound.code(), 7001);
        assert_eq!(ErrorCode::CategoryNameExists.code(), 7005);

        // Notification
        assert_eq!(ErrorCode::NotificationNotFound.code(), 8001);

        // System
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
        assert_eq!(ErrorCode::ConfigError.code(), 9004);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::OrderNotFound.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::NotAuthenticated));
        assert_eq!(ErrorCode::try_from(4001), Ok(ErrorCode::RfqNotFound));
        assert_eq!(
            ErrorCode::try_from(6002),
            Ok(ErrorCode::InvalidStatusTransition)
        );
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::NotFound).unwrap();
        assert_eq!(json, "3");

        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "6001");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("6001").unwrap();
        assert_eq!(code, ErrorCode::OrderNotFound);

        let code: ErrorCode = serde_json::from_str("3003").unwrap();
        assert_eq!(code, ErrorCode::StateInvalid);

        let result: Result<ErrorCode, _> = serde_json::from_str("1234");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_and_message() {
        assert_eq!(format!("{}", ErrorCode::OrderNotFound), "6001");
        assert_eq!(ErrorCode::OrderNotFound.message(), "Order not found");
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(
            ErrorCode::NoFieldsToUpdate.message(),
            "No fields to update"
        );
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::NotAuthenticated,
            ErrorCode::PermissionDenied,
            ErrorCode::AlreadyLinked,
            ErrorCode::RfqNotFound,
            ErrorCode::QuoteItemForeign,
            ErrorCode::InvalidStatusTransition,
            ErrorCode::InternalError,
        ];

        for code in codes {
            let json = serde_json::to_string(&code).unwrap();
            let parsed: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(code, parsed);
        }
    }
}
