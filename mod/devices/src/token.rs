//! Enrollment credential service.
//!
//! Mints and verifies the signed token a device presents during
//! enrollment. Symmetric HS256 with a process-wide secret; the secret is
//! loaded once at startup and an empty secret refuses to start the
//! server, so `issue` never fails on configuration at request time.

use devlock_core::ServiceError;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Default credential lifetime: 30 days.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Claims carried by an enrollment credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The device this credential was issued for.
    #[serde(rename = "deviceId")]
    pub device_id: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// Issues and verifies enrollment credentials.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            ttl_secs,
        }
    }

    /// Issue a signed credential embedding the device id, expiring
    /// `ttl_secs` from now.
    pub fn issue(&self, device_id: &str) -> Result<String, ServiceError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            device_id: device_id.to_string(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::seconds(self.ttl_secs)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::Internal(format!("token encode failed: {}", e)))
    }

    /// Verify a credential's signature and expiry.
    ///
    /// Tampered signatures, tokens signed under a different secret, and
    /// expired tokens are all rejected with the same Unauthorized error;
    /// callers cannot distinguish them.
    pub fn verify(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| ServiceError::Unauthorized("Token is invalid or expired".into()))
    }
}
