use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// A signed access token together with the claims it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded JWT, opaque to everyone but the issuer
    pub token: String,
    pub claims: Claims,
}

/// Issues and verifies HS256 access tokens.
///
/// The signing key is bound at construction. Neither operation reads the wall
/// clock: callers pass `now` explicitly.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
}

impl TokenIssuer {
    /// Create a new token issuer with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        let algorithm = Algorithm::HS256;

        let mut validation = Validation::new(algorithm);
        // Expiry is checked against the caller's `now`, not the system clock
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            validation,
        }
    }

    /// Issue a token binding `subject` to an expiry of `now + duration`.
    ///
    /// # Arguments
    /// * `subject` - Account identifier placed in the `sub` claim
    /// * `now` - Issue time (millisecond precision)
    /// * `duration` - Validity period (millisecond precision)
    ///
    /// # Errors
    /// * `InvalidDuration` - Duration shorter than one millisecond, or expiry out of range
    /// * `SigningFailed` - Token encoding failed
    pub fn issue(
        &self,
        subject: impl ToString,
        now: DateTime<Utc>,
        duration: Duration,
    ) -> Result<IssuedToken, TokenError> {
        if duration.num_milliseconds() <= 0 || now.checked_add_signed(duration).is_none() {
            return Err(TokenError::InvalidDuration);
        }

        let claims = Claims::new(subject, now, duration);
        let header = Header::new(self.algorithm);

        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))?;

        Ok(IssuedToken { token, claims })
    }

    /// Verify a token's signature, then its expiry at `now`.
    ///
    /// No claim is read before the signature has been recomputed and matched.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature mismatch or unexpected algorithm
    /// * `Expired` - `now` is at or past `exp`
    /// * `Malformed` - Not a JWT, or required claims missing
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
