//! # quill-auth: Identity Tokens
//!
//! Issues and validates the bearer tokens that gate the Quill API. Tokens
//! are HMAC-signed JWTs; the service is a pure function of its secret and
//! the system clock.

pub mod error;
pub mod token;

pub use error::TokenError;
pub use token::{Claims, IssuedToken, Role, TokenService, DEFAULT_ROLE, DEFAULT_VALIDITY_SECS};
