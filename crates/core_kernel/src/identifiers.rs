//! Strongly-typed identifiers for domain entities
//!
//! Record ids are assigned by the external store and may have gaps; newtype
//! wrappers prevent accidental mixing of order, installment, and observation
//! ids. Customers are identified by their fiscal id string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! define_record_id {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps an externally-assigned row id
            pub fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the underlying row id
            pub fn value(&self) -> i64 {
                self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Strip prefix if present
                let raw = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(raw.parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_record_id!(OrderId, "ORD");
define_record_id!(InstallmentId, "ABO");
define_record_id!(ObservationId, "BCV");

/// A customer's fiscal identifier (cédula or RIF), normalized
///
/// The store records these as free text; normalization (trimming, upper-case)
/// keeps `V-12345678` and ` v-12345678 ` aggregating to the same customer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CustomerId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for CustomerId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}
