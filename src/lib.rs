pub mod codec;
pub mod crypto;
mod error;
pub mod format;

pub use crate::codec::{Codec, JsonCodec};
pub use crate::crypto::{CipherFamily, HashAlgorithm, KdfParams, Suite, derive_key, pbkdf2};
pub use crate::error::{CryptasticError, Result};
use crate::crypto::{compute_tag, generate_iv, verify_tag};
use crate::format::{Envelope, EnvelopeWriter};
use serde::{Serialize, de::DeserializeOwned};
use zeroize::Zeroizing;

/// Outer framing of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Binary,
    Base64,
}

/// An envelope in the framing requested from [`Cryptastic::encrypt_as`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Binary(Vec<u8>),
    Text(String),
}

impl Output {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Output::Binary(bytes) => bytes,
            Output::Text(text) => text.as_bytes(),
        }
    }
}

/// Authenticated encryption of serializable values under a shared key.
///
/// Envelope layout is `IV (32) || ciphertext || tag (32)` where the tag is
/// PBKDF2 of `IV || ciphertext` keyed by the message key. Decryption verifies
/// the tag before the ciphertext is touched.
#[derive(Debug, Clone, Default)]
pub struct Cryptastic<C = JsonCodec> {
    suite: Suite,
    codec: C,
}

impl Cryptastic<JsonCodec> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suite(suite: Suite) -> Self {
        Self::with_codec(suite, JsonCodec::default())
    }
}

impl<C: Codec> Cryptastic<C> {
    pub fn with_codec(suite: Suite, codec: C) -> Self {
        Self { suite, codec }
    }

    pub fn suite(&self) -> &Suite {
        &self.suite
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Encode `value` and seal it into a binary envelope.
    ///
    /// # Errors
    ///
    /// - [`CryptasticError::Encode`] if the codec cannot serialize `value`
    /// - [`CryptasticError::CipherInit`] if the cipher rejects `key`
    /// - [`CryptasticError::Random`] if no IV can be drawn
    pub fn encrypt<T: Serialize + ?Sized>(&self, value: &T, key: &[u8]) -> Result<Vec<u8>> {
        let plaintext = Zeroizing::new(self.codec.encode(value)?);
        self.seal(&plaintext, key)
    }

    /// Like [`encrypt`](Self::encrypt), returning the envelope as base64 text.
    pub fn encrypt_text<T: Serialize + ?Sized>(&self, value: &T, key: &[u8]) -> Result<String> {
        Ok(format::text::encode(&self.encrypt(value, key)?))
    }

    pub fn encrypt_as<T: Serialize + ?Sized>(
        &self,
        value: &T,
        key: &[u8],
        encoding: Encoding,
    ) -> Result<Output> {
        match encoding {
            Encoding::Binary => self.encrypt(value, key).map(Output::Binary),
            Encoding::Base64 => self.encrypt_text(value, key).map(Output::Text),
        }
    }

    /// Authenticate, decrypt and decode a binary envelope.
    ///
    /// # Errors
    ///
    /// - [`CryptasticError::MalformedEnvelope`] if `envelope` is shorter than 64 bytes
    /// - [`CryptasticError::AuthenticationFailure`] if the tag does not match
    /// - [`CryptasticError::CipherInit`] if the cipher rejects `key`
    /// - [`CryptasticError::Decode`] if the codec rejects the plaintext
    pub fn decrypt<T: DeserializeOwned>(&self, envelope: &[u8], key: &[u8]) -> Result<T> {
        let plaintext = self.open(envelope, key)?;
        self.codec.decode(&plaintext)
    }

    /// Like [`decrypt`](Self::decrypt) for base64 text produced by
    /// [`encrypt_text`](Self::encrypt_text).
    pub fn decrypt_text<T: DeserializeOwned>(&self, input: &str, key: &[u8]) -> Result<T> {
        let envelope = format::text::decode(input)?;
        self.decrypt(&envelope, key)
    }

    pub fn decrypt_as<T: DeserializeOwned>(
        &self,
        input: &[u8],
        key: &[u8],
        encoding: Encoding,
    ) -> Result<T> {
        match encoding {
            Encoding::Binary => self.decrypt(input, key),
            Encoding::Base64 => self.decrypt(&format::text::decode(input)?, key),
        }
    }

    /// Seal raw bytes without going through the codec.
    ///
    /// The key is checked before the plaintext is copied into the envelope.
    pub fn seal(&self, plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        let cipher = self.suite.cipher();
        cipher.check_key(key)?;
        let iv = generate_iv()?;

        let mut writer = EnvelopeWriter::new(&iv, plaintext);
        cipher.apply_keystream(key, &iv, writer.body_mut())?;

        let tag = compute_tag(key, writer.authenticated_data(), self.suite.tag_params())?;
        Ok(writer.finish(&tag))
    }

    /// Verify and decrypt an envelope into raw bytes.
    ///
    /// Nothing is decrypted unless the tag matches.
    pub fn open(&self, envelope: &[u8], key: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let envelope = Envelope::parse(envelope)?;

        let expected = compute_tag(key, envelope.authenticated_data(), self.suite.tag_params())?;
        verify_tag(&expected, envelope.tag())?;

        self.suite
            .cipher()
            .decrypt(key, envelope.iv(), envelope.ciphertext())
    }
}

/// Encrypt `value` with the default suite and JSON codec.
pub fn encrypt<T: Serialize + ?Sized>(value: &T, key: &[u8]) -> Result<Vec<u8>> {
    Cryptastic::new().encrypt(value, key)
}

pub fn encrypt_text<T: Serialize + ?Sized>(value: &T, key: &[u8]) -> Result<String> {
    Cryptastic::new().encrypt_text(value, key)
}

/// Decrypt an envelope produced by [`encrypt`].
pub fn decrypt<T: DeserializeOwned>(envelope: &[u8], key: &[u8]) -> Result<T> {
    Cryptastic::new().decrypt(envelope, key)
}

pub fn decrypt_text<T: DeserializeOwned>(input: &str, key: &[u8]) -> Result<T> {
    Cryptastic::new().decrypt_text(input, key)
}
