//! Informational decode of the token payload
//!
//! Tokens are compact three-segment structures; only the middle segment
//! is decoded, and no signature verification happens client-side. A
//! malformed token yields no identity but never an error.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use super::types::{Claims, Identity};

/// Decode the identity carried in a token payload, if any
pub fn decode_identity(token: &str) -> Option<Identity> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return None;
    }

    let payload = segments[1].trim_end_matches('=');
    let raw = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&raw).ok()?;

    let username = claims.sub?;
    Some(Identity {
        username,
        role: claims.role,
    })
}
