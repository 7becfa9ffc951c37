use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockroom_core::UserId;

use crate::Identity;

/// Session token claims.
///
/// `iat`/`exp` are JWT numeric dates (seconds since the Unix epoch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: UserId,
    pub email: String,
    pub name: String,

    /// Issued-at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Identity::new(claims.id, claims.email, claims.name)
    }
}

/// Why a token was rejected (or could not be minted).
///
/// Every variant except `Encoding` is an "invalid or expired" rejection from
/// the caller's point of view; the split only exists for logs and tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not match")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

impl TokenError {
    /// True for every outcome of verifying a presented token.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, TokenError::Encoding(_))
    }
}

/// Deterministically validate token claims against `now`.
///
/// Signature verification happens before this, in [`crate::TokenService`].
/// A token is still valid at the exact second of `exp`.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(TokenError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenError::NotYetValid);
    }
    if now > claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn claims_at(iat: DateTime<Utc>, lifetime: Duration) -> TokenClaims {
        TokenClaims {
            id: UserId::new(1),
            email: "admin@example.com".to_string(),
            name: "Administrator".to_string(),
            iat: iat.timestamp(),
            exp: (iat + lifetime).timestamp(),
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn accepts_within_window_including_exp_second() {
        let claims = claims_at(t0(), Duration::hours(24));
        assert_eq!(validate_claims(&claims, t0()), Ok(()));
        assert_eq!(validate_claims(&claims, t0() + Duration::hours(23)), Ok(()));
        assert_eq!(validate_claims(&claims, t0() + Duration::hours(24)), Ok(()));
    }

    #[test]
    fn rejects_after_exp() {
        let claims = claims_at(t0(), Duration::hours(24));
        let later = t0() + Duration::hours(24) + Duration::seconds(1);
        assert_eq!(validate_claims(&claims, later), Err(TokenError::Expired));
    }

    #[test]
    fn rejects_future_iat() {
        let claims = claims_at(t0(), Duration::hours(24));
        let earlier = t0() - Duration::seconds(5);
        assert_eq!(validate_claims(&claims, earlier), Err(TokenError::NotYetValid));
    }

    #[test]
    fn rejects_inverted_window() {
        let claims = claims_at(t0(), Duration::hours(-1));
        assert_eq!(validate_claims(&claims, t0()), Err(TokenError::InvalidTimeWindow));
    }

    #[test]
    fn encoding_failure_is_not_a_rejection() {
        assert!(TokenError::Expired.is_rejection());
        assert!(TokenError::BadSignature.is_rejection());
        assert!(!TokenError::Encoding("boom".to_string()).is_rejection());
    }
}
