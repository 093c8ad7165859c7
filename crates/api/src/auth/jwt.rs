//! Session token issuance and verification.
//!
//! Tokens are HS256-signed JWTs containing a [`Claims`] payload. They are
//! valid for exactly [`TOKEN_VALIDITY_SECS`] after issuance and are never
//! revoked server-side; expiry (or rotating `JWT_SECRET`) is the only way a
//! token stops working.

use std::fmt;

use chrono::Utc;
use evendiona_core::roles::Role;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Token lifetime: one day.
pub const TOKEN_VALIDITY_SECS: i64 = 24 * 60 * 60;

/// JWT claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject -- the authenticated identity (the admin username).
    pub sub: String,
    pub role: Role,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Signing configuration shared by the issuer and the verifier.
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
}

impl JwtConfig {
    /// Build a config around `secret`. An empty secret is rejected; there is
    /// no fallback key.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        Ok(Self { secret })
    }

    /// Sign and verify a probe token.
    ///
    /// Run once at startup so a broken signing setup aborts the process
    /// instead of failing every login.
    pub fn self_check(&self) -> Result<(), ConfigError> {
        let token = issue_token("startup-probe", Role::User, self)
            .map_err(|e| ConfigError::Signing(e.to_string()))?;
        verify_token(&token, self).map_err(|e| ConfigError::Signing(e.to_string()))?;
        Ok(())
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.as_bytes())
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.as_bytes())
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Issue a token for `identity` with `role`, valid for 24 hours from now.
pub fn issue_token(
    identity: &str,
    role: Role,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue_token_at(identity, role, Utc::now().timestamp(), config)
}

/// Issue a token as if it had been minted at `issued_at`.
///
/// Output is deterministic for identical inputs, secret, and timestamp.
pub fn issue_token_at(
    identity: &str,
    role: Role,
    issued_at: i64,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: identity.to_string(),
        role,
        iat: issued_at,
        exp: issued_at + TOKEN_VALIDITY_SECS,
    };

    encode(&Header::new(Algorithm::HS256), &claims, &config.encoding_key())
}

/// Verify a token's signature and expiry, returning the embedded [`Claims`].
///
/// No leeway is applied: a token is rejected as soon as `exp` has passed.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "iat", "sub"]);

    let token_data = decode::<Claims>(token, &config.decoding_key(), &validation)?;
    Ok(token_data.claims)
}
