//! Envelope authentication tags.
//!
//! The tag is PBKDF2 with the message key as password and `iv || ciphertext`
//! as salt. Verification is constant-time over the full tag.

use subtle::ConstantTimeEq;

use super::{KdfParams, TAG_LEN, pbkdf2_into};
use crate::error::{CryptasticError, Result};

/// Compute the tag over `authenticated` (the IV followed by the ciphertext).
pub fn compute_tag(key: &[u8], authenticated: &[u8], params: KdfParams) -> Result<[u8; TAG_LEN]> {
    let mut tag = [0u8; TAG_LEN];
    pbkdf2_into(key, authenticated, params.iterations(), params.hash(), &mut tag)?;
    Ok(tag)
}

/// Compare two tags without short-circuiting on the first differing byte.
pub fn verify_tag(expected: &[u8; TAG_LEN], received: &[u8; TAG_LEN]) -> Result<()> {
    if bool::from(expected.as_slice().ct_eq(received.as_slice())) {
        Ok(())
    } else {
        Err(CryptasticError::AuthenticationFailure)
    }
}
