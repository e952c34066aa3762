/// Signed session tokens
///
/// A session is an HS256-signed JWT carrying the account ID and role. Tokens
/// are time-bounded and never stored server-side; whoever holds the signing
/// secret can verify them.
///
/// # Claims
///
/// - `sub`: account ID
/// - `role`: account role at issuance
/// - `iss`: always `"taskboard"`
/// - `iat` / `nbf` / `exp`: Unix timestamps
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use taskboard_shared::auth::session::{Identity, SessionKeys};
/// use taskboard_shared::models::account::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let keys = SessionKeys::new("a-signing-secret-of-at-least-32-bytes", Duration::days(30));
/// let identity = Identity { account_id: Uuid::new_v4(), role: Role::Student };
///
/// let token = keys.issue(&identity)?;
/// assert_eq!(keys.verify(&token)?, identity);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::account::Role;

/// Issuer claim of every session token
pub const ISSUER: &str = "taskboard";

/// Default session lifetime
pub const DEFAULT_TTL_DAYS: i64 = 30;

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to sign a token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature, issuer or format check failed
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Resolved caller identity
///
/// Passed explicitly into every service call; only the route guard reads it
/// off the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub account_id: Uuid,
    pub role: Role,
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - account ID
    pub sub: Uuid,

    pub role: Role,

    /// Issuer - always "taskboard"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Claims for `identity` valid from now for `ttl`
    pub fn new(identity: &Identity, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: identity.account_id,
            role: identity.role,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            account_id: self.sub,
            role: self.role,
        }
    }
}

/// Signing secret plus session lifetime
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Signs a session token for `identity`
    pub fn issue(&self, identity: &Identity) -> Result<String, SessionError> {
        self.sign(&Claims::new(identity, self.ttl))
    }

    /// Signs arbitrary claims
    pub fn sign(&self, claims: &Claims) -> Result<String, SessionError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| SessionError::CreateError(format!("Token encoding failed: {}", e)))
    }

    /// Verifies signature, issuer, `exp` and `nbf`
    pub fn verify(&self, token: &str) -> Result<Identity, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => SessionError::Expired,
            _ => SessionError::Invalid(e.to_string()),
        })?;

        Ok(data.claims.identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-session-secret-at-least-32-bytes";

    fn identity() -> Identity {
        Identity {
            account_id: Uuid::new_v4(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let keys = SessionKeys::new(SECRET, Duration::days(DEFAULT_TTL_DAYS));
        let identity = identity();

        let token = keys.issue(&identity).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), identity);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = SessionKeys::new(SECRET, Duration::days(1)).issue(&identity()).unwrap();
        let other = SessionKeys::new("another-secret-that-is-also-32-bytes", Duration::days(1));

        assert!(matches!(other.verify(&token), Err(SessionError::Invalid(_))));
    }

    #[test]
    fn test_expired_rejected() {
        let keys = SessionKeys::new(SECRET, Duration::days(1));
        let mut claims = Claims::new(&identity(), Duration::days(1));
        claims.iat -= 7200;
        claims.nbf -= 7200;
        claims.exp = Utc::now().timestamp() - 3600;

        let token = keys.sign(&claims).unwrap();
        assert!(matches!(keys.verify(&token), Err(SessionError::Expired)));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let keys = SessionKeys::new(SECRET, Duration::days(1));
        let mut claims = Claims::new(&identity(), Duration::days(1));
        claims.iss = "someone-else".to_string();

        let token = keys.sign(&claims).unwrap();
        assert!(matches!(keys.verify(&token), Err(SessionError::Invalid(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        let keys = SessionKeys::new(SECRET, Duration::days(1));
        assert!(keys.verify("not.a.token").is_err());
        assert!(keys.verify("").is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let keys = SessionKeys::new(SECRET, Duration::days(1));
        assert!(!format!("{:?}", keys).contains(SECRET));
    }
}
