//! # Identity Tokens
//!
//! HMAC-signed JWTs carrying a subject and a role:
//!
//! ```json
//! { "sub": "test", "role": "user", "iat": 1700000000, "nbf": 1700000000, "exp": 1700086400 }
//! ```
//!
//! Verification is stateless: a token is accepted iff its signature verifies
//! against the server secret, its header names an HMAC algorithm
//! (HS256/HS384/HS512), and the current time lies in `[nbf, exp)`. Tokens
//! whose header claims any other algorithm are rejected before signature
//! verification, closing the algorithm-confusion hole.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use quill_core::OwnerId;
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Default token lifetime: 24 hours.
pub const DEFAULT_VALIDITY_SECS: i64 = 24 * 60 * 60;

/// Role assigned to callers authenticated through the login endpoint.
pub const DEFAULT_ROLE: &str = "user";

/// Algorithm used when issuing tokens.
const ISSUE_ALGORITHM: Algorithm = Algorithm::HS256;

/// Algorithms accepted on validation. Anything outside the HMAC family is
/// rejected.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Caller role carried in the token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// The role granted by the login endpoint.
    pub fn user() -> Self {
        Self(DEFAULT_ROLE.to_string())
    }

    /// Return the role as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated caller's identity.
    pub sub: OwnerId,
    pub role: Role,
    /// Issued at (seconds since epoch).
    pub iat: i64,
    /// Not before (seconds since epoch).
    pub nbf: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// A freshly signed token and its lifetime.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWS serialization.
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in_seconds: i64,
}

/// Issues and validates identity tokens with a process-wide HMAC secret.
///
/// Holds no per-token state; the keys are fixed at construction. Custom
/// `Debug` keeps key material out of logs.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validity: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"[REDACTED]")
            .field("validity_secs", &self.validity.num_seconds())
            .finish()
    }
}

impl TokenService {
    /// Create a service with the default 24-hour validity window.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_validity(secret, Duration::seconds(DEFAULT_VALIDITY_SECS))
    }

    /// Create a service with a custom validity window.
    pub fn with_validity(secret: &[u8], validity: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validity,
        }
    }

    /// Issue a token for `subject` valid from now until now + validity.
    pub fn issue(&self, subject: &OwnerId, role: &Role) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, role, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: &OwnerId,
        role: &Role,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = now + self.validity;
        let claims = Claims {
            sub: subject.clone(),
            role: role.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(ISSUE_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at,
            expires_in_seconds: self.validity.num_seconds(),
        })
    }

    /// Verify a token and return its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// The validity window is `[nbf, exp)`: a token is already expired at
    /// `now == exp`. `jsonwebtoken` would still accept it at that second,
    /// so both ends of the window are checked here rather than by the
    /// library.
    fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &validation())?.claims;
        let now = now.timestamp();
        if claims.exp <= now {
            return Err(TokenError::Expired);
        }
        if claims.nbf > now {
            return Err(TokenError::NotYetValid);
        }
        if claims.sub.as_str().trim().is_empty() {
            return Err(TokenError::Malformed("empty subject".into()));
        }
        Ok(claims)
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(ISSUE_ALGORITHM);
    validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
    validation.leeway = 0;
    // Presence of exp/nbf is still enforced below; their values are checked
    // in `validate_at`.
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp", "nbf", "iat", "sub"]);
    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    const SECRET: &[u8] = b"test-secret";

    fn subject() -> OwnerId {
        OwnerId::new("test").unwrap()
    }

    #[test]
    fn issued_token_validates_with_same_subject_and_role() {
        let service = TokenService::new(SECRET);
        let issued = service.issue(&subject(), &Role::user()).unwrap();
        assert!(!issued.token.is_empty());
        assert_eq!(issued.expires_in_seconds, DEFAULT_VALIDITY_SECS);

        let claims = service.validate(&issued.token).unwrap();
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert_eq!(claims.sub, subject());
        assert_eq!(claims.role, Role::user());
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp - claims.iat, DEFAULT_VALIDITY_SECS);
    }

    #[test]
    fn expired_token_rejected() {
        let service = TokenService::new(SECRET);
        let issued = service
            .issue_at(&subject(), &Role::user(), Utc::now() - Duration::hours(25))
            .unwrap();
        assert_eq!(service.validate(&issued.token), Err(TokenError::Expired));
    }

    #[test]
    fn zero_length_window_is_never_valid() {
        let service = TokenService::with_validity(SECRET, Duration::zero());
        let issued = service.issue(&subject(), &Role::user()).unwrap();
        assert_eq!(issued.expires_in_seconds, 0);
        assert_eq!(service.validate(&issued.token), Err(TokenError::Expired));
    }

    #[test]
    fn window_excludes_its_end_second() {
        let service = TokenService::with_validity(SECRET, Duration::seconds(60));
        let issued_at = Utc::now() - Duration::seconds(10);
        let issued = service
            .issue_at(&subject(), &Role::user(), issued_at)
            .unwrap();

        let last_valid = issued.expires_at - Duration::seconds(1);
        assert!(service.validate_at(&issued.token, last_valid).is_ok());
        assert_eq!(
            service.validate_at(&issued.token, issued.expires_at),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn window_includes_its_start_second() {
        let service = TokenService::new(SECRET);
        let issued_at = Utc::now();
        let issued = service
            .issue_at(&subject(), &Role::user(), issued_at)
            .unwrap();
        assert!(service.validate_at(&issued.token, issued_at).is_ok());
    }

    #[test]
    fn token_before_not_before_rejected() {
        let service = TokenService::new(SECRET);
        let issued = service
            .issue_at(&subject(), &Role::user(), Utc::now() + Duration::hours(1))
            .unwrap();
        assert_eq!(service.validate(&issued.token), Err(TokenError::NotYetValid));
    }

    #[test]
    fn token_from_other_secret_rejected() {
        let issuer = TokenService::new(b"some-other-secret");
        let verifier = TokenService::new(SECRET);
        let issued = issuer.issue(&subject(), &Role::user()).unwrap();
        assert_eq!(
            verifier.validate(&issued.token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn other_hmac_variants_accepted() {
        let service = TokenService::new(SECRET);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject(),
            role: Role::user(),
            iat: now,
            nbf: now,
            exp: now + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(service.validate(&token).unwrap(), claims);
    }

    #[test]
    fn non_hmac_algorithm_rejected() {
        let service = TokenService::new(SECRET);
        let issued = service.issue(&subject(), &Role::user()).unwrap();
        let mut parts = issued.token.split('.');
        let _header = parts.next().unwrap();
        let payload = parts.next().unwrap();
        let signature = parts.next().unwrap();

        let forged_header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let forged = format!("{forged_header}.{payload}.{signature}");
        assert_eq!(
            service.validate(&forged),
            Err(TokenError::UnexpectedAlgorithm)
        );
    }

    #[test]
    fn unsigned_token_rejected() {
        let service = TokenService::new(SECRET);
        let issued = service.issue(&subject(), &Role::user()).unwrap();
        let payload = issued.token.split('.').nth(1).unwrap();
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        assert!(service.validate(&format!("{header}.{payload}.")).is_err());
    }

    #[test]
    fn garbage_is_malformed() {
        let service = TokenService::new(SECRET);
        assert!(matches!(
            service.validate("not-a-token"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn missing_claims_rejected() {
        let service = TokenService::new(SECRET);
        let now = Utc::now().timestamp();
        let partial = serde_json::json!({ "sub": "test", "role": "user", "exp": now + 60 });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &partial,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn blank_subject_rejected() {
        let service = TokenService::new(SECRET);
        let now = Utc::now().timestamp();
        let claims = serde_json::json!({
            "sub": " ", "role": "user", "iat": now, "nbf": now, "exp": now + 60
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(matches!(
            service.validate(&token),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn debug_redacts_secret() {
        let service = TokenService::new(b"super-secret-value");
        let debug = format!("{service:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-value"));
    }
}
