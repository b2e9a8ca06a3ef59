pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::types::DbId;

/// Distinguishes access tokens from refresh tokens so one cannot stand in
/// for the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: DbId,
    pub user_name: String,
    pub user_email: String,
    pub user_lang_code: String,
    pub token_type: TokenKind,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity embedded into every token.
#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub user_id: DbId,
    pub user_name: String,
    pub user_email: String,
    pub user_lang_code: String,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidToken(String),
    WrongKind { expected: TokenKind, found: TokenKind },
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
            JwtError::WrongKind { expected, found } => {
                write!(f, "Expected {:?} token, got {:?}", expected, found)
            }
        }
    }
}

impl std::error::Error for JwtError {}

/// HS256 signing and verification with the configured shared key.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Option<Duration>,
    refresh_ttl: Option<Duration>,
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.key.as_bytes()),
            decoding: DecodingKey::from_secret(config.key.as_bytes()),
            // Out-of-range lifetimes surface as TokenGeneration when issuing
            access_ttl: Duration::try_minutes(config.access_expiry_minutes),
            refresh_ttl: Duration::try_hours(config.refresh_expiry_hours),
        }
    }

    pub fn issue(&self, subject: &TokenSubject, kind: TokenKind) -> Result<String, JwtError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let ttl = ttl.ok_or_else(|| {
            JwtError::TokenGeneration(format!("{:?} token lifetime out of range", kind))
        })?;
        self.issue_with_ttl(subject, kind, ttl)
    }

    pub fn issue_pair(&self, subject: &TokenSubject) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.issue(subject, TokenKind::Access)?,
            refresh_token: self.issue(subject, TokenKind::Refresh)?,
        })
    }

    fn issue_with_ttl(
        &self,
        subject: &TokenSubject,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| JwtError::TokenGeneration("token expiry out of range".to_string()))?;
        let claims = Claims {
            user_id: subject.user_id,
            user_name: subject.user_name.clone(),
            user_email: subject.user_email.clone(),
            user_lang_code: subject.user_lang_code.clone(),
            token_type: kind,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Verify signature and expiry, then require the expected token kind.
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

        let claims = token_data.claims;
        if claims.token_type != expected {
            return Err(JwtError::WrongKind {
                expected,
                found: claims.token_type,
            });
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            key: secret.to_string(),
            access_expiry_minutes: 15,
            refresh_expiry_hours: 24,
        })
    }

    fn subject() -> TokenSubject {
        TokenSubject {
            user_id: 42,
            user_name: "Ann".to_string(),
            user_email: "ann@x.com".to_string(),
            user_lang_code: "en".to_string(),
        }
    }

    #[test]
    fn access_token_round_trips_identity() {
        let keys = keys("test-secret");
        let token = keys.issue(&subject(), TokenKind::Access).unwrap();
        let claims = keys.validate(&token, TokenKind::Access).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.user_email, "ann@x.com");
        assert_eq!(claims.user_lang_code, "en");
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn refresh_token_outlives_access_token() {
        let keys = keys("test-secret");
        let pair = keys.issue_pair(&subject()).unwrap();
        let access = keys.validate(&pair.access_token, TokenKind::Access).unwrap();
        let refresh = keys.validate(&pair.refresh_token, TokenKind::Refresh).unwrap();
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn tokens_minted_together_differ() {
        let keys = keys("test-secret");
        let first = keys.issue(&subject(), TokenKind::Access).unwrap();
        let second = keys.issue(&subject(), TokenKind::Access).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn kinds_are_not_interchangeable() {
        let keys = keys("test-secret");
        let pair = keys.issue_pair(&subject()).unwrap();

        let err = keys.validate(&pair.refresh_token, TokenKind::Access).unwrap_err();
        assert!(matches!(err, JwtError::WrongKind { expected: TokenKind::Access, .. }));
        assert!(keys.validate(&pair.access_token, TokenKind::Refresh).is_err());
    }

    #[test]
    fn rejects_token_signed_with_other_key() {
        let token = keys("secret-a").issue(&subject(), TokenKind::Access).unwrap();
        let err = keys("secret-b").validate(&token, TokenKind::Access).unwrap_err();
        assert!(matches!(err, JwtError::InvalidToken(_)));
    }

    #[test]
    fn rejects_expired_token() {
        let keys = keys("test-secret");
        // Well past the default leeway
        let token = keys
            .issue_with_ttl(&subject(), TokenKind::Access, Duration::hours(-2))
            .unwrap();
        assert!(matches!(
            keys.validate(&token, TokenKind::Access),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn oversized_lifetimes_fail_instead_of_panicking() {
        let keys = JwtKeys::new(&JwtConfig {
            key: "test-secret".to_string(),
            access_expiry_minutes: 15,
            refresh_expiry_hours: 1_000_000_000_000,
        });
        assert!(keys.issue(&subject(), TokenKind::Access).is_ok());
        assert!(matches!(
            keys.issue_pair(&subject()),
            Err(JwtError::TokenGeneration(_))
        ));

        // Representable as a Duration, but past the end of DateTime
        let keys = keys_with_ttl_hours(24 * 365 * 300_000);
        assert!(matches!(
            keys.issue(&subject(), TokenKind::Refresh),
            Err(JwtError::TokenGeneration(_))
        ));
    }

    fn keys_with_ttl_hours(hours: i64) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            key: "test-secret".to_string(),
            access_expiry_minutes: 15,
            refresh_expiry_hours: hours,
        })
    }

    #[test]
    fn rejects_garbage() {
        let keys = keys("test-secret");
        assert!(keys.validate("not.a.jwt", TokenKind::Access).is_err());
        assert!(keys.validate("", TokenKind::Access).is_err());
    }
}
