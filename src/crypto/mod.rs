//! Cryptographic building blocks for the envelope protocol.
//!
//! Provides PBKDF2 key derivation, the counter-mode cipher, tag computation
//! and the [`Suite`] that binds them together.

pub mod cipher;
pub mod kdf;
pub mod suite;
pub mod tag;

pub use cipher::{CipherFamily, generate_iv};
pub use kdf::{HashAlgorithm, KdfParams, derive_key, pbkdf2, pbkdf2_into};
pub use suite::Suite;
pub use tag::{compute_tag, verify_tag};

/// Length of the per-message IV (32 bytes).
pub const IV_LEN: usize = 32;
/// Length of the authentication tag (32 bytes).
pub const TAG_LEN: usize = 32;
/// PBKDF2 iterations used when deriving the tag.
pub const MAC_ITERATIONS: u32 = 1000;
