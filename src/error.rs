use thiserror::Error;

/// Errors returned by key derivation and the encryption protocol.
#[derive(Debug, Error)]
pub enum CryptasticError {
    /// The cipher rejected the supplied key (AES accepts 16, 24 or 32 bytes).
    #[error("cipher initialization failed: unsupported key length {0}")]
    CipherInit(usize),

    /// The input is too short to hold an IV and a tag.
    #[error("malformed envelope: {len} bytes, expected at least {min}")]
    MalformedEnvelope { len: usize, min: usize },

    /// Base64 framing or the value codec could not decode the input.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The codec could not serialize the value.
    #[error("encode failed: {0}")]
    Encode(String),

    /// The tag did not match. Carries no detail about where it differed.
    #[error("authentication failed")]
    AuthenticationFailure,

    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("unsupported hash algorithm: '{0}'")]
    UnsupportedAlgorithm(String),

    #[error("OS random generator unavailable")]
    Random,
}

pub type Result<T> = std::result::Result<T, CryptasticError>;
