//! Bearer token issuance and verification (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::claims::{TokenClaims, TokenError, validate_claims};
use crate::Identity;

/// Fixed token lifetime. Tokens are neither renewable nor revocable.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Verifies presented bearer tokens.
///
/// This is the seam the HTTP gate depends on, so tests can swap in a
/// validator with a different clock or secret.
pub trait TokenValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError>;
}

/// Issues and verifies signed, time-limited session tokens.
///
/// Holds only the process-wide signing secret. Anyone holding the secret can
/// mint tokens, so it is never exposed through `Debug`, logs or responses.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &SecretString) -> Self {
        Self::from_secret(secret.expose_secret().as_bytes())
    }

    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `validate_claims` against an explicit clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetime: Duration::hours(TOKEN_LIFETIME_HOURS),
        }
    }

    /// Issue a token for an already-verified identity.
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = TokenClaims {
            id: identity.id,
            email: identity.email.clone(),
            name: identity.name.clone(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        debug!(user_id = %identity.id, exp = claims.exp, "issuing session token");

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded identity.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        let decoded = decode::<TokenClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            }
        })?;

        validate_claims(&decoded.claims, now)?;
        Ok(decoded.claims.into())
    }
}

impl TokenValidator for TokenService {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        self.verify_at(token, now)
    }
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"[REDACTED]")
            .field("lifetime_hours", &self.lifetime.num_hours())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::UserId;

    fn admin() -> Identity {
        Identity::new(UserId::new(1), "admin@example.com", "Administrator")
    }

    fn service() -> TokenService {
        TokenService::from_secret(b"test-secret-key-12345")
    }

    #[test]
    fn issued_token_verifies_to_same_identity() {
        let tokens = service();
        let token = tokens.issue(&admin()).unwrap();
        assert!(!token.is_empty());

        let identity = tokens.verify(&token).unwrap();
        assert_eq!(identity, admin());
    }

    #[test]
    fn token_expires_after_24_hours() {
        let tokens = service();
        let issued = Utc::now();
        let token = tokens.issue_at(&admin(), issued).unwrap();

        let almost = issued + Duration::hours(24) - Duration::seconds(1);
        assert_eq!(tokens.verify_at(&token, almost).unwrap(), admin());

        let after = issued + Duration::hours(24) + Duration::seconds(2);
        assert_eq!(tokens.verify_at(&token, after), Err(TokenError::Expired));
    }

    #[test]
    fn different_secret_is_rejected() {
        let token = service().issue(&admin()).unwrap();
        let other = TokenService::from_secret(b"another-secret");
        assert_eq!(other.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let tokens = service();
        let token = tokens.issue(&admin()).unwrap();

        let forged = Identity::new(UserId::new(2), "user@example.com", "Regular User");
        let forged_token = TokenService::from_secret(b"attacker").issue(&forged).unwrap();

        // Header + payload from the forged token, signature from the genuine one.
        let genuine_sig = token.rsplit('.').next().unwrap();
        let mut parts: Vec<&str> = forged_token.split('.').collect();
        parts[2] = genuine_sig;
        let spliced = parts.join(".");

        assert_eq!(tokens.verify(&spliced), Err(TokenError::BadSignature));
    }

    #[test]
    fn garbage_input_is_malformed_not_a_panic() {
        let tokens = service();
        for input in ["", "invalid.token.here", "a.b", "....", "Bearer xyz"] {
            let err = tokens.verify(input).unwrap_err();
            assert!(err.is_rejection(), "{input:?} gave {err:?}");
        }
        assert_eq!(tokens.verify("invalid.token.here"), Err(TokenError::Malformed));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", service());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("test-secret-key-12345"));
    }

    #[test]
    fn validator_trait_uses_supplied_clock() {
        let tokens = service();
        let issued = Utc::now();
        let token = tokens.issue_at(&admin(), issued).unwrap();

        let validator: &dyn TokenValidator = &tokens;
        assert!(validator.validate(&token, issued).is_ok());
        assert_eq!(
            validator.validate(&token, issued + Duration::days(2)),
            Err(TokenError::Expired)
        );
    }
}
