//! User records held by the credential store.

use stockroom_core::{Entity, UserId};

use crate::Identity;

/// A user account.
///
/// Users are created once at startup from a seed list and never change.
/// `password_hash` is a bcrypt hash and must never leave the credential store;
/// this type deliberately does not implement `Serialize`.
#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub(crate) password_hash: String,
}

impl User {
    pub fn public_profile(&self) -> Identity {
        Identity::new(self.id, self.email.clone(), self.name.clone())
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

impl core::fmt::Debug for User {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Plain-text seed entry, hashed when the store is built.
#[derive(Debug, Clone, Copy)]
pub struct SeedUser {
    pub id: u64,
    pub email: &'static str,
    pub password: &'static str,
    pub name: &'static str,
}

/// Accounts available out of the box.
pub const DEFAULT_USERS: &[SeedUser] = &[
    SeedUser {
        id: 1,
        email: "admin@example.com",
        password: "123456",
        name: "Administrator",
    },
    SeedUser {
        id: 2,
        email: "user@example.com",
        password: "password",
        name: "Regular User",
    },
];
