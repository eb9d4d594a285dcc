//! Value codecs: turn application values into plaintext bytes and back.
//!
//! Decoding only ever runs on plaintext whose tag has already been verified.

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{CryptasticError, Result};

pub trait Codec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

/// JSON via `serde_json`.
///
/// Nesting is bounded by serde_json's recursion limit; the input size can be
/// bounded with [`JsonCodec::with_max_len`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    max_len: Option<usize>,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject plaintexts longer than `max_len` bytes before parsing.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            max_len: Some(max_len),
        }
    }

    pub fn max_len(&self) -> Option<usize> {
        self.max_len
    }
}

impl Codec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| CryptasticError::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        if let Some(max) = self.max_len() {
            if bytes.len() > max {
                return Err(CryptasticError::Decode(format!(
                    "plaintext of {} bytes exceeds limit of {max}",
                    bytes.len()
                )));
            }
        }

        serde_json::from_slice(bytes).map_err(|e| CryptasticError::Decode(e.to_string()))
    }
}
