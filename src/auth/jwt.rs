//! # JWT Manager
//!
//! HS256 token signing and verification. The manager owns the derived keys;
//! the secret itself is handled only at construction.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Signed token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Identity id.
    pub sub: String,
    /// Identity email.
    pub email: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// The authenticated identity attached to a request after the credential
/// gate verifies its token. Exists only for the duration of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
        }
    }
}

/// Issues and verifies bearer tokens.
pub struct JwtManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtManager {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue a token for the given identity, expiring after the configured
    /// lifetime.
    pub fn issue(&self, id: &str, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify a token's signature and expiry, yielding the principal it
    /// was issued for.
    pub fn verify(&self, token: &str) -> Result<Principal, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new("test-secret", Duration::hours(1))
    }

    #[test]
    fn issue_then_verify_round_trips_the_principal() {
        let jwt = manager();
        let token = jwt.issue("1", "admin@admin.com").unwrap();
        assert!(!token.is_empty());

        let principal = jwt.verify(&token).unwrap();
        assert_eq!(
            principal,
            Principal {
                id: "1".to_string(),
                email: "admin@admin.com".to_string(),
            }
        );
    }

    #[test]
    fn tampered_token_is_rejected() {
        let jwt = manager();
        let token = jwt.issue("1", "admin@admin.com").unwrap();
        let mut tampered = token;
        tampered.push('x');
        assert!(jwt.verify(&tampered).is_err());
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = JwtManager::new("other-secret", Duration::hours(1))
            .issue("1", "admin@admin.com")
            .unwrap();
        assert!(manager().verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Negative lifetime puts the expiry well past the default leeway.
        let jwt = JwtManager::new("test-secret", Duration::hours(-2));
        let token = jwt.issue("1", "admin@admin.com").unwrap();
        assert!(manager().verify(&token).is_err());
    }
}
