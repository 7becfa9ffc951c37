//! `stockroom-auth`: credential verification and bearer-token handling.
//!
//! This crate is intentionally decoupled from HTTP: the API crate owns header
//! parsing and status codes, this crate owns the trust decisions.

pub mod claims;
pub mod credentials;
pub mod principal;
pub mod token;
pub mod user;

pub use claims::{TokenClaims, TokenError, validate_claims};
pub use credentials::{AuthError, CredentialStore, LoginRequest, LoginResponse, login};
pub use principal::Identity;
pub use token::{TOKEN_LIFETIME_HOURS, TokenService, TokenValidator};
pub use user::{DEFAULT_USERS, SeedUser, User};
