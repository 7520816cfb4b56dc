//! Token issuance and validation errors.

use thiserror::Error;

/// Errors produced by the [`TokenService`](crate::TokenService).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token could not be signed.
    #[error("token signing failed: {0}")]
    Signing(String),

    /// Signature verification failed.
    #[error("invalid signature")]
    InvalidSignature,

    /// The token's `exp` has passed.
    #[error("token expired")]
    Expired,

    /// The token's `nbf` is in the future.
    #[error("token not yet valid")]
    NotYetValid,

    /// The header names an algorithm outside the HMAC family.
    #[error("unexpected signing algorithm")]
    UnexpectedAlgorithm,

    /// The token is not a well-formed JWT or is missing required claims.
    #[error("malformed token: {0}")]
    Malformed(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::UnexpectedAlgorithm
            }
            ErrorKind::MissingRequiredClaim(claim) => {
                TokenError::Malformed(format!("missing required claim: {claim}"))
            }
            ErrorKind::InvalidToken => TokenError::Malformed("invalid JWT structure".into()),
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}
