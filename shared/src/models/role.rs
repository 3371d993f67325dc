//! User roles

use serde::{Deserialize, Serialize};

/// Platform role attached to every user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Buyer,
    Supplier,
    Admin,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "BUYER",
            Self::Supplier => "SUPPLIER",
            Self::Admin => "ADMIN",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "BUYER" => Some(Self::Buyer),
            "SUPPLIER" => Some(Self::Supplier),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }

    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    pub const fn is_buyer(&self) -> bool {
        matches!(self, Self::Buyer)
    }

    pub const fn is_supplier(&self) -> bool {
        matches!(self, Self::Supplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Buyer, Role::Supplier, Role::Admin] {
            assert_eq!(Role::from_db(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_db("buyer"), None);
        assert_eq!(Role::from_db(""), None);
    }

    #[test]
    fn test_role_serialize() {
        assert_eq!(serde_json::to_string(&Role::Buyer).unwrap(), "\"BUYER\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"SUPPLIER\"").unwrap(),
            Role::Supplier
        );
    }

    #[test]
    fn test_role_predicates() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Buyer.is_admin());
        assert!(Role::Buyer.is_buyer());
        assert!(Role::Supplier.is_supplier());
    }
}
