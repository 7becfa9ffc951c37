//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are small sequential integers: users come from a fixed seed
//! list and products are numbered by the catalog's allocator.

use serde::{Deserialize, Serialize};

/// Identifier of a user (actor identity).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

/// Identifier of a product in the catalog.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

macro_rules! impl_int_newtype {
    ($t:ty) => {
        impl $t {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

impl_int_newtype!(UserId);
impl_int_newtype!(ProductId);

impl ProductId {
    /// The identifier the allocator hands out after this one.
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}
