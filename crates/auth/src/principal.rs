use serde::{Deserialize, Serialize};

use stockroom_core::UserId;

/// Identity of an authenticated user.
///
/// This is what a verified token decodes to and what login hands back as the
/// public profile. It never carries credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

impl Identity {
    pub fn new(id: UserId, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            name: name.into(),
        }
    }
}
