//! Envelope wire format.
//!
//! ```text
//! IV (32) | CIPHERTEXT (N) | TAG (32)
//! ```
//!
//! There is no magic or version field; the layout is fixed by the [`Suite`](crate::Suite).

use crate::crypto::{IV_LEN, TAG_LEN};
use crate::error::{CryptasticError, Result};

pub mod text;

/// Minimum valid envelope length (empty ciphertext).
pub const MIN_ENVELOPE_LEN: usize = IV_LEN + TAG_LEN;

/// A parsed envelope borrowing from the input buffer.
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a> {
    data: &'a [u8],
    iv: &'a [u8; IV_LEN],
    tag: &'a [u8; TAG_LEN],
}

impl<'a> Envelope<'a> {
    /// Splits `data` into IV, ciphertext and tag.
    ///
    /// # Errors
    ///
    /// Returns [`CryptasticError::MalformedEnvelope`] if `data` is shorter than
    /// [`MIN_ENVELOPE_LEN`].
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let malformed = || CryptasticError::MalformedEnvelope {
            len: data.len(),
            min: MIN_ENVELOPE_LEN,
        };

        if data.len() < MIN_ENVELOPE_LEN {
            return Err(malformed());
        }

        let (iv, _) = data.split_first_chunk::<IV_LEN>().ok_or_else(malformed)?;
        let (_, tag) = data.split_last_chunk::<TAG_LEN>().ok_or_else(malformed)?;

        Ok(Self { data, iv, tag })
    }

    pub fn iv(&self) -> &'a [u8; IV_LEN] {
        self.iv
    }

    pub fn ciphertext(&self) -> &'a [u8] {
        &self.data[IV_LEN..self.data.len() - TAG_LEN]
    }

    pub fn tag(&self) -> &'a [u8; TAG_LEN] {
        self.tag
    }

    /// The bytes covered by the tag: IV followed by ciphertext.
    pub fn authenticated_data(&self) -> &'a [u8] {
        &self.data[..self.data.len() - TAG_LEN]
    }

    pub fn ciphertext_len(&self) -> usize {
        self.data.len() - MIN_ENVELOPE_LEN
    }
}

/// Builds an envelope in one buffer so the keystream and the tag both work
/// on the final layout.
#[derive(Debug)]
pub struct EnvelopeWriter {
    buf: Vec<u8>,
}

impl EnvelopeWriter {
    /// Lay out `iv || plaintext`, leaving room for the tag.
    pub fn new(iv: &[u8; IV_LEN], plaintext: &[u8]) -> Self {
        let mut buf = Vec::with_capacity(MIN_ENVELOPE_LEN + plaintext.len());
        buf.extend_from_slice(iv);
        buf.extend_from_slice(plaintext);
        Self { buf }
    }

    /// The region after the IV, to be encrypted in place.
    pub fn body_mut(&mut self) -> &mut [u8] {
        &mut self.buf[IV_LEN..]
    }

    pub fn authenticated_data(&self) -> &[u8] {
        &self.buf
    }

    pub fn finish(mut self, tag: &[u8; TAG_LEN]) -> Vec<u8> {
        self.buf.extend_from_slice(tag);
        self.buf
    }
}
