//! Counter-mode stream encryption.
//!
//! The envelope carries a 32-byte IV. AES has a 16-byte block, so the leading
//! block of the IV seeds the big-endian 128-bit counter; the whole IV is still
//! covered by the tag.

use aes::{Aes128, Aes192, Aes256};
use ctr::cipher::{KeyIvInit, StreamCipher};
use getrandom::fill;
use zeroize::Zeroizing;

use super::IV_LEN;
use crate::error::{CryptasticError, Result};

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type Aes192Ctr = ctr::Ctr128BE<Aes192>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// The block cipher family used in counter mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CipherFamily {
    /// AES-128/192/256, chosen by key length.
    #[default]
    AesCtr,
}

impl CipherFamily {
    pub fn block_len(&self) -> usize {
        match self {
            CipherFamily::AesCtr => 16,
        }
    }

    /// Key lengths accepted by the cipher, in bytes.
    pub fn key_lens(&self) -> &'static [usize] {
        match self {
            CipherFamily::AesCtr => &[16, 24, 32],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CipherFamily::AesCtr => "aes-ctr",
        }
    }

    /// Fails with [`CryptasticError::CipherInit`] unless `key` has one of
    /// [`key_lens`](Self::key_lens).
    pub fn check_key(&self, key: &[u8]) -> Result<()> {
        if self.key_lens().contains(&key.len()) {
            Ok(())
        } else {
            Err(CryptasticError::CipherInit(key.len()))
        }
    }

    /// XOR the keystream for (`key`, `iv`) into `data` in place.
    ///
    /// # Errors
    ///
    /// Returns [`CryptasticError::CipherInit`] if the key length is not supported.
    pub fn apply_keystream(&self, key: &[u8], iv: &[u8; IV_LEN], data: &mut [u8]) -> Result<()> {
        let counter = &iv[..self.block_len()];

        match self {
            CipherFamily::AesCtr => match key.len() {
                16 => keystream::<Aes128Ctr>(key, counter, data),
                24 => keystream::<Aes192Ctr>(key, counter, data),
                32 => keystream::<Aes256Ctr>(key, counter, data),
                other => Err(CryptasticError::CipherInit(other)),
            },
        }
    }

    /// Decrypt ciphertext
    pub fn decrypt(
        &self,
        key: &[u8],
        iv: &[u8; IV_LEN],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        let mut buf = Zeroizing::new(ciphertext.to_vec());
        self.apply_keystream(key, iv, &mut buf)?;
        Ok(buf)
    }
}

fn keystream<C>(key: &[u8], counter: &[u8], data: &mut [u8]) -> Result<()>
where
    C: KeyIvInit + StreamCipher,
{
    let mut cipher =
        C::new_from_slices(key, counter).map_err(|_| CryptasticError::CipherInit(key.len()))?;
    cipher.apply_keystream(data);
    Ok(())
}

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|_| CryptasticError::Random)
}

/// Generate a fresh IV
pub fn generate_iv() -> Result<[u8; IV_LEN]> {
    let mut iv = [0u8; IV_LEN];
    secure_random(&mut iv)?;
    Ok(iv)
}
