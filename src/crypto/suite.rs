use super::{CipherFamily, HashAlgorithm, IV_LEN, KdfParams, TAG_LEN};
use crate::error::Result;

/// Primitive choices for the envelope protocol, bound once at construction.
///
/// IV length, tag length, cipher block size and the tag PRF are coupled; the
/// defaults reproduce the established wire format (AES-CTR, 32-byte IV,
/// PBKDF2-HMAC-SHA256 tag over 1000 iterations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Suite {
    cipher: CipherFamily,
    tag: KdfParams,
}

impl Suite {
    pub fn new(cipher: CipherFamily, hash: HashAlgorithm, mac_iterations: u32) -> Result<Self> {
        Ok(Self {
            cipher,
            tag: KdfParams::new(mac_iterations, TAG_LEN, hash)?,
        })
    }

    pub fn with_hash(self, hash: HashAlgorithm) -> Result<Self> {
        Self::new(self.cipher, hash, self.tag.iterations())
    }

    pub fn with_mac_iterations(self, mac_iterations: u32) -> Result<Self> {
        Self::new(self.cipher, self.tag.hash(), mac_iterations)
    }

    pub fn cipher(&self) -> CipherFamily {
        self.cipher
    }

    pub fn block_len(&self) -> usize {
        self.cipher.block_len()
    }

    pub fn iv_len(&self) -> usize {
        IV_LEN
    }

    pub fn tag_len(&self) -> usize {
        TAG_LEN
    }

    pub fn hash(&self) -> HashAlgorithm {
        self.tag.hash()
    }

    pub fn mac_iterations(&self) -> u32 {
        self.tag.iterations()
    }

    /// PBKDF2 parameters used to derive the tag.
    pub fn tag_params(&self) -> KdfParams {
        self.tag
    }

    /// Smallest possible envelope: IV and tag around an empty ciphertext.
    pub fn min_envelope_len(&self) -> usize {
        self.iv_len() + self.tag_len()
    }
}
