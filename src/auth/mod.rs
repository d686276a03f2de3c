use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;

/// Session claims: the token identifies a person and nothing else
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub person_id: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(person_id: impl Into<String>) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            person_id: person_id.into(),
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

fn secret() -> Result<&'static str, JwtError> {
    let secret = config::config().security.jwt_secret.as_str();
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }
    Ok(secret)
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let encoding_key = EncodingKey::from_secret(secret()?.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    let decoding_key = DecodingKey::from_secret(secret()?.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;
    Ok(token_data.claims)
}

/// Issue a token for `person_id` using the configured expiry
pub fn issue_token(person_id: &str) -> Result<String, JwtError> {
    generate_jwt(&Claims::new(person_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_person_id() {
        let token = issue_token("a1b2c3").unwrap();
        let claims = validate_jwt(&token).unwrap();
        assert_eq!(claims.person_id, "a1b2c3");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_expired_and_garbage_tokens() {
        let mut claims = Claims::new("a1b2c3");
        claims.exp = Utc::now().timestamp() - 3600;
        let token = generate_jwt(&claims).unwrap();
        assert!(matches!(validate_jwt(&token), Err(JwtError::InvalidToken(_))));
        assert!(validate_jwt("not.a.token").is_err());
    }
}
