//! User attribute declarations and their typed symbols.
//!
//! The Rust enums below only name members; persisted codes always come
//! from [`user_attributes`], the one mapping table for `User`.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::enumerated::{declare, AttributeRegistry, AttributeValue, Representation};
use crate::config::{
    ATTR_HOBBIES, ATTR_ROLE, ATTR_STATUS, DEFAULT_ROLE, DEFAULT_STATUS, HOBBY_VALUES, ROLE_VALUES,
    STATUS_CODES, STATUS_VALUES,
};
use crate::errors::AppError;

static USER_ATTRIBUTES: Lazy<AttributeRegistry> = Lazy::new(|| {
    AttributeRegistry::builder()
        .declare(
            declare(ATTR_ROLE, ROLE_VALUES, Representation::Positional)
                .default(DEFAULT_ROLE)
                .predicates(),
        )
        .declare(
            declare(
                ATTR_STATUS,
                STATUS_VALUES,
                Representation::Explicit(STATUS_CODES.to_vec()),
            )
            .default(DEFAULT_STATUS)
            .scope(),
        )
        .declare(declare(ATTR_HOBBIES, HOBBY_VALUES, Representation::Positional).multiple())
        .build()
        .unwrap_or_else(|e| panic!("User attribute declarations are invalid: {}", e))
});

/// Enumerated attribute table for `User`, built on first use.
pub fn user_attributes() -> &'static AttributeRegistry {
    &USER_ATTRIBUTES
}

/// Defines a symbol enum whose string forms match the declared members.
macro_rules! symbol_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $attribute:expr, { $($variant:ident => $symbol:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $symbol),+
                }
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($symbol => Ok($name::$variant),)+
                    _ => Err(AppError::invalid_member($attribute, s)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for AttributeValue {
            fn from(value: $name) -> Self {
                AttributeValue::from(value.as_str())
            }
        }
    };
}

symbol_enum!(
    /// User roles, persisted by position.
    UserRole, ATTR_ROLE, {
        Admin => "admin",
        Manager => "manager",
        Employee => "employee",
        Intern => "intern",
    }
);

symbol_enum!(
    /// Account status, persisted with explicit codes.
    UserStatus, ATTR_STATUS, {
        Active => "active",
        Inactive => "inactive",
        Suspended => "suspended",
    }
);

symbol_enum!(
    Hobby, ATTR_HOBBIES, {
        Reading => "reading",
        Sports => "sports",
        Cooking => "cooking",
        Gaming => "gaming",
        Music => "music",
        Travel => "travel",
    }
);

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Employee
    }
}

impl Default for UserStatus {
    fn default() -> Self {
        UserStatus::Active
    }
}

impl From<Vec<Hobby>> for AttributeValue {
    fn from(hobbies: Vec<Hobby>) -> Self {
        AttributeValue::from(hobbies.iter().map(Hobby::as_str).collect::<Vec<_>>())
    }
}

impl<const N: usize> From<[Hobby; N]> for AttributeValue {
    fn from(hobbies: [Hobby; N]) -> Self {
        AttributeValue::from(hobbies.to_vec())
    }
}
