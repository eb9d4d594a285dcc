//! Base64 text framing for envelopes.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::{CryptasticError, Result};

/// Standard alphabet, padded, no line wrapping.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode base64 text. Surrounding ASCII whitespace is ignored.
pub fn decode(text: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    STANDARD
        .decode(text.as_ref().trim_ascii())
        .map_err(|e| CryptasticError::Decode(format!("invalid base64: {e}")))
}
