use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;
use crate::Result;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,  // Admin ID
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

/// Signs and verifies HS256 tokens carrying an admin id. Stateless: a token
/// stays valid until `exp` whatever happens server-side.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, admin_id: Uuid, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            id: admin_id.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Bad signature, malformed input, a non-UUID id and expiry all yield
    /// `AuthError::InvalidToken`.
    pub fn verify(&self, token: &str) -> std::result::Result<Uuid, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AuthError::InvalidToken)?;

        Uuid::parse_str(&data.claims.id).map_err(|_| AuthError::InvalidToken)
    }
}
