//! # Identifier Generation
//!
//! Comment identifiers are the 16 bytes of a random (v4) UUID encoded as
//! unpadded URL-safe base64, giving a fixed 22-character string that can
//! be embedded in a URL path without escaping.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand_core::{OsRng, RngCore};
use uuid::Uuid;

/// Length of every identifier returned by [`generate_id`].
pub const ID_LEN: usize = 22;

/// Generate a URL-safe, globally unique identifier.
pub fn generate_id() -> String {
    URL_SAFE_NO_PAD.encode(Uuid::new_v4().as_bytes())
}

/// Generate `len` bytes of OS randomness, encoded as unpadded URL-safe base64.
///
/// Suitable for signing secrets and other credentials.
pub fn generate_secure_token(len: usize) -> Result<String, rand_core::Error> {
    let mut bytes = vec![0u8; len];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
