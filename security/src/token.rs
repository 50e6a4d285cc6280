// security/src/token.rs

use chrono::Duration;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use models::errors::AuthError;
use models::Role;

/// Signed session credentials last 12 hours; expiry forces
/// re-authentication, there is no refresh path.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 12;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 session tokens. Constructed once at startup
/// with the configured secret and handed down to the HTTP layer.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        TokenIssuer {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn with_default_ttl(secret: &[u8]) -> Self {
        Self::new(secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AuthError::Internal(format!("system time error: {}", e)))?
            .as_secs() as i64;

        let claims = Claims {
            sub: user_id,
            role,
            iat: now,
            exp: now + self.ttl.num_seconds(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Token(format!("failed to encode token: {}", e)))
    }

    /// Rejects both bad signatures and elapsed expiry with the same
    /// generic error.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidOrExpiredToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_round_trip_claims() {
        let issuer = TokenIssuer::with_default_ttl(b"0123456789abcdef0123456789abcdef");
        let user_id = Uuid::new_v4();
        let token = issuer.issue(user_id, Role::Doctor).unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Doctor);
        assert_eq!(
            claims.exp - claims.iat,
            DEFAULT_TOKEN_TTL_HOURS * 3600,
        );
    }

    #[test]
    fn should_reject_expired_token() {
        let issuer = TokenIssuer::new(
            b"0123456789abcdef0123456789abcdef",
            Duration::seconds(-120),
        );
        let token = issuer.issue(Uuid::new_v4(), Role::Nurse).unwrap();
        let err = issuer.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidOrExpiredToken));
    }

    #[test]
    fn should_reject_token_signed_with_other_secret() {
        let issuer = TokenIssuer::with_default_ttl(b"0123456789abcdef0123456789abcdef");
        let other = TokenIssuer::with_default_ttl(b"ffffffffffffffffffffffffffffffff");
        let token = other.issue(Uuid::new_v4(), Role::Administrator).unwrap();
        assert!(matches!(
            issuer.verify(&token),
            Err(AuthError::InvalidOrExpiredToken)
        ));
    }

    #[test]
    fn should_reject_garbage_token() {
        let issuer = TokenIssuer::with_default_ttl(b"0123456789abcdef0123456789abcdef");
        assert!(matches!(
            issuer.verify("not.a.token"),
            Err(AuthError::InvalidOrExpiredToken)
        ));
    }
}
