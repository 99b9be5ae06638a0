//! Identity provider seam.
//!
//! The core never sees credentials. It asks an [`IdentityProvider`] for the
//! current user id of a request and, for first-time visitors, to mint an
//! anonymous session. The concrete provider is constructed at startup and
//! injected, so tests can swap in [`FixedIdentity`].

use axum::http::HeaderMap;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{ServiceError, new_id};

/// A freshly created anonymous session.
#[derive(Debug, Clone, Serialize)]
pub struct AnonymousSession {
    /// Newly issued user id.
    pub user_id: String,
    /// Bearer token to send as `Authorization: Bearer <token>`.
    pub access_token: String,
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Pluggable identity provider.
pub trait IdentityProvider: Send + Sync + 'static {
    /// Resolve the authenticated user id from request headers, if any.
    fn current_user_id(&self, headers: &HeaderMap) -> Option<String>;

    /// Create a new anonymous user and a session for it.
    fn create_anonymous_session(&self) -> Result<AnonymousSession, ServiceError>;
}

/// Claims carried by session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id.
    pub sub: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// HS256 bearer-token identity provider.
pub struct JwtIdentity {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl JwtIdentity {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            ttl_secs,
        }
    }

    /// Sign a token for an existing user id.
    pub fn issue(&self, user_id: &str) -> Result<String, ServiceError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::seconds(self.ttl_secs)).timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::Internal(format!("JWT encode failed: {}", e)))
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, ServiceError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| ServiceError::Unauthorized(format!("invalid token: {}", e)))
    }
}

impl IdentityProvider for JwtIdentity {
    fn current_user_id(&self, headers: &HeaderMap) -> Option<String> {
        let token = extract_bearer(headers)?;
        match self.verify(token) {
            Ok(claims) => Some(claims.sub),
            Err(e) => {
                tracing::debug!("rejected bearer token: {}", e);
                None
            }
        }
    }

    fn create_anonymous_session(&self) -> Result<AnonymousSession, ServiceError> {
        let user_id = new_id();
        let access_token = self.issue(&user_id)?;
        Ok(AnonymousSession {
            user_id,
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.ttl_secs,
        })
    }
}

/// Identity provider that reports a fixed actor. Used for testing.
pub struct FixedIdentity(pub Option<String>);

impl IdentityProvider for FixedIdentity {
    fn current_user_id(&self, _headers: &HeaderMap) -> Option<String> {
        self.0.clone()
    }

    fn create_anonymous_session(&self) -> Result<AnonymousSession, ServiceError> {
        let user_id = self.0.clone().unwrap_or_else(new_id);
        Ok(AnonymousSession {
            access_token: format!("fixed-{}", user_id),
            user_id,
            token_type: "Bearer".to_string(),
            expires_in: 0,
        })
    }
}

/// Extract the Bearer token from the Authorization header.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}
