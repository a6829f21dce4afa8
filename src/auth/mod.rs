use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Longest token lifetime handed out, whatever the configuration says
pub const MAX_EXPIRY_HOURS: u64 = 24 * 365 * 10;

/// Bearer token claims. `sub` is the owner id every car operation is scoped to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Claims issued now. `expiry_hours` is capped at [`MAX_EXPIRY_HOURS`].
    pub fn new(owner: Uuid, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let hours = expiry_hours.min(MAX_EXPIRY_HOURS) as i64;
        let exp = (now + Duration::hours(hours)).timestamp();

        Self {
            sub: owner,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
    #[error("JWT secret not configured")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, JwtError> {
    let secret = &security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify signature and expiry, returning the claims
pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, JwtError> {
    let secret = &security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn round_trips_owner_id() {
        let security = AppConfig::development().security;
        let owner = Uuid::new_v4();

        let token = generate_jwt(&Claims::new(owner, 1), &security).unwrap();
        let claims = validate_jwt(&token, &security).unwrap();

        assert_eq!(claims.sub, owner);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let mut security = AppConfig::development().security;
        let token = generate_jwt(&Claims::new(Uuid::new_v4(), 1), &security).unwrap();

        security.jwt_secret = "another-secret".to_string();
        assert!(matches!(
            validate_jwt(&token, &security),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let security = AppConfig::development().security;
        let mut claims = Claims::new(Uuid::new_v4(), 1);
        claims.iat -= 7200;
        claims.exp -= 7200;

        let token = generate_jwt(&claims, &security).unwrap();
        assert!(validate_jwt(&token, &security).is_err());
    }

    #[test]
    fn oversized_expiry_is_capped() {
        let claims = Claims::new(Uuid::new_v4(), u64::MAX);
        assert_eq!(claims.exp - claims.iat, MAX_EXPIRY_HOURS as i64 * 3600);

        let security = AppConfig::development().security;
        let token = generate_jwt(&claims, &security).unwrap();
        assert!(validate_jwt(&token, &security).is_ok());
    }

    #[test]
    fn empty_secret_is_refused() {
        let mut security = AppConfig::development().security;
        security.jwt_secret.clear();
        assert!(matches!(
            generate_jwt(&Claims::new(Uuid::new_v4(), 1), &security),
            Err(JwtError::InvalidSecret)
        ));
    }
}
