//! Credential store and the login flow.
//!
//! Login is one async pipeline: validate the request, look the user up, run the
//! bcrypt comparison on the blocking pool, then issue a token. Unknown emails
//! and wrong passwords produce the same error (and roughly the same latency).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use stockroom_core::UserId;

use crate::token::TokenService;
use crate::user::{SeedUser, User};
use crate::{Identity, TokenError};

/// Hashed when the store is built and compared against when the email is
/// unknown, so a miss costs as much as a wrong password.
const DUMMY_PASSWORD: &str = "stockroom-timing-equalizer";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email and password are required")]
    MissingFields,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("credential check did not complete: {0}")]
    Task(String),

    #[error("token issuance failed: {0}")]
    Token(#[from] TokenError),

    #[error("invalid seed data: {0}")]
    Seed(String),
}

/// Login request body. Fields are optional so a missing field is reported as
/// `MissingFields` rather than as a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Identity,
}

/// Read-only user records, keyed by exact (case-sensitive) email.
#[derive(Debug)]
pub struct CredentialStore {
    users: Vec<User>,
    dummy_hash: String,
}

impl CredentialStore {
    /// Build a store from plain-text seeds, hashing each password with `cost`.
    ///
    /// Fails if two seeds share an id or an email.
    pub fn from_seed(seed: &[SeedUser], cost: u32) -> Result<Self, AuthError> {
        let mut ids = HashSet::new();
        let mut emails = HashSet::new();
        let mut users = Vec::with_capacity(seed.len());

        for s in seed {
            if !ids.insert(s.id) {
                return Err(AuthError::Seed(format!("duplicate user id {}", s.id)));
            }
            if !emails.insert(s.email) {
                return Err(AuthError::Seed(format!("duplicate email {}", s.email)));
            }
            users.push(User {
                id: UserId::new(s.id),
                email: s.email.to_string(),
                name: s.name.to_string(),
                password_hash: bcrypt::hash(s.password, cost)?,
            });
        }

        let dummy_hash = bcrypt::hash(DUMMY_PASSWORD, cost)?;
        debug!(users = users.len(), cost, "credential store seeded");

        Ok(Self { users, dummy_hash })
    }

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Check an email/password pair and return the user's public profile.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: String,
    ) -> Result<Identity, AuthError> {
        let user = self.find_by_email(email);
        let hash = user
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| self.dummy_hash.clone());

        let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::Task(e.to_string()))??;

        match user {
            Some(user) if matched => Ok(user.public_profile()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}

/// Full login flow: validate the request, verify credentials, issue a token.
pub async fn login(
    store: &CredentialStore,
    tokens: &TokenService,
    request: LoginRequest,
) -> Result<LoginResponse, AuthError> {
    let (email, password) = match (request.email, request.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => return Err(AuthError::MissingFields),
    };

    let identity = match store.verify_credentials(&email, password).await {
        Ok(identity) => identity,
        Err(e) => {
            info!(email = %email, "login rejected");
            return Err(e);
        }
    };

    let token = tokens.issue(&identity)?;
    info!(user_id = %identity.id, "login succeeded");

    Ok(LoginResponse {
        token,
        user: identity,
    })
}
