//! PBKDF2 (RFC 2898) over a selectable HMAC.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac, digest::KeyInit};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use zeroize::{Zeroize, Zeroizing};

use super::{MAC_ITERATIONS, TAG_LEN};
use crate::error::{CryptasticError, Result};

/// Hash function underneath the HMAC used as the PBKDF2 PRF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    Sha1,
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Digest length in bytes (`hLen`).
    pub fn output_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha224 => 28,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha224 => "sha224",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = CryptasticError;

    /// Accepts `sha256`, `SHA-256`, `sha_256` and the like.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha224" => Ok(HashAlgorithm::Sha224),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(CryptasticError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    iterations: u32,
    output_len: usize,
    hash: HashAlgorithm,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: MAC_ITERATIONS,
            output_len: TAG_LEN,
            hash: HashAlgorithm::default(),
        }
    }
}

impl KdfParams {
    pub fn new(iterations: u32, output_len: usize, hash: HashAlgorithm) -> Result<Self> {
        let params = Self {
            iterations,
            output_len,
            hash,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn output_len(&self) -> usize {
        self.output_len
    }

    pub fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations < 1 {
            return Err(CryptasticError::InvalidParameter(
                "pbkdf2 iterations must be >= 1",
            ));
        }
        // RFC 2898 caps the block count at 2^32 - 1.
        let blocks = (self.output_len as u64).div_ceil(self.hash.output_len() as u64);
        if blocks > u64::from(u32::MAX) {
            return Err(CryptasticError::InvalidParameter(
                "pbkdf2 derived key too long",
            ));
        }
        Ok(())
    }
}

/// Derive `params.output_len()` bytes from `password` and `salt`.
pub fn derive_key(password: &[u8], salt: &[u8], params: KdfParams) -> Result<Zeroizing<Vec<u8>>> {
    params.validate()?;

    let mut out = Zeroizing::new(vec![0u8; params.output_len]);
    pbkdf2_into(password, salt, params.iterations, params.hash, &mut out)?;
    Ok(out)
}

/// `deriveKey(password, salt, iterations, length, hash)`.
pub fn pbkdf2(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    output_len: usize,
    hash: HashAlgorithm,
) -> Result<Zeroizing<Vec<u8>>> {
    derive_key(password, salt, KdfParams::new(iterations, output_len, hash)?)
}

/// Fill `out` with PBKDF2 output. The length of `out` is the derived key length.
pub fn pbkdf2_into(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    hash: HashAlgorithm,
    out: &mut [u8],
) -> Result<()> {
    KdfParams {
        iterations,
        output_len: out.len(),
        hash,
    }
    .validate()?;

    let h_len = hash.output_len();
    match hash {
        HashAlgorithm::Sha1 => pbkdf2_with::<Hmac<Sha1>>(password, salt, iterations, h_len, out),
        HashAlgorithm::Sha224 => pbkdf2_with::<Hmac<Sha224>>(password, salt, iterations, h_len, out),
        HashAlgorithm::Sha256 => pbkdf2_with::<Hmac<Sha256>>(password, salt, iterations, h_len, out),
        HashAlgorithm::Sha384 => pbkdf2_with::<Hmac<Sha384>>(password, salt, iterations, h_len, out),
        HashAlgorithm::Sha512 => pbkdf2_with::<Hmac<Sha512>>(password, salt, iterations, h_len, out),
    }
}

fn pbkdf2_with<M>(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    h_len: usize,
    out: &mut [u8],
) -> Result<()>
where
    M: Mac + KeyInit + Clone,
{
    let prf = <M as KeyInit>::new_from_slice(password)
        .map_err(|_| CryptasticError::InvalidParameter("hmac rejected the password"))?;

    for (i, chunk) in out.chunks_mut(h_len).enumerate() {
        // validate() bounds the block count to u32.
        let block_index = (i as u32) + 1;
        pbkdf2_block(&prf, salt, block_index, iterations, chunk);
    }

    Ok(())
}

/// `T_i = U_1 ^ U_2 ^ ... ^ U_c`, truncated into `chunk`.
fn pbkdf2_block<M>(prf: &M, salt: &[u8], block_index: u32, iterations: u32, chunk: &mut [u8])
where
    M: Mac + Clone,
{
    let mut mac = prf.clone();
    mac.update(salt);
    mac.update(&block_index.to_be_bytes());
    let mut u = mac.finalize().into_bytes();
    let mut t = u.clone();

    for _ in 1..iterations {
        let mut mac = prf.clone();
        mac.update(&u);
        u = mac.finalize().into_bytes();
        t.iter_mut().zip(u.iter()).for_each(|(acc, b)| *acc ^= b);
    }

    chunk.copy_from_slice(&t[..chunk.len()]);

    u.as_mut_slice().zeroize();
    t.as_mut_slice().zeroize();
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn rfc6070_sha1_vectors() {
        let cases: [(&[u8], &[u8], u32, &[u8]); 4] = [
            (b"password", b"salt", 1, &hex!("0c60c80f961f0e71f3a9b524af6012062fe037a6")),
            (b"password", b"salt", 2, &hex!("ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957")),
            (b"password", b"salt", 4096, &hex!("4b007901b765489abead49d926f721d065a429c1")),
            (
                b"passwordPASSWORDpassword",
                b"saltSALTsaltSALTsaltSALTsaltSALTsalt",
                4096,
                &hex!("3d2eec4fe41c849b80c8d83662c0e44a8b291a964cf2f07038"),
            ),
        ];

        for (password, salt, iterations, expected) in cases {
            let dk = pbkdf2(password, salt, iterations, expected.len(), HashAlgorithm::Sha1)
                .unwrap();
            assert_eq!(dk.as_slice(), expected, "iterations = {iterations}");
        }
    }

    #[test]
    fn rfc6070_sha1_embedded_nul() {
        let dk = pbkdf2(b"pass\0word", b"sa\0lt", 4096, 16, HashAlgorithm::Sha1).unwrap();
        assert_eq!(dk.as_slice(), hex!("56fa6aa75548099dcc37d7f03425e0c3"));
    }

    #[test]
    fn sha256_vectors() {
        let cases: [(u32, [u8; 32]); 3] = [
            (
                1,
                hex!("120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"),
            ),
            (
                2,
                hex!("ae4d0c95af6b46d32d0adff928f06dd02a303f8ef3c251dfd6e2d85a95474c43"),
            ),
            (
                4096,
                hex!("c5e478d59288c841aa530db6845c4c8d962893a001ce4e11a4963873aa98134a"),
            ),
        ];

        for (iterations, expected) in cases {
            let dk = pbkdf2(b"password", b"salt", iterations, 32, HashAlgorithm::Sha256).unwrap();
            assert_eq!(dk.as_slice(), expected, "iterations = {iterations}");
        }
    }

    #[test]
    fn matches_reference_implementation_across_block_boundaries() {
        let password = b"correct horse battery staple";
        let salt = b"NaCl and pepper";

        for len in [1usize, 20, 31, 32, 33, 64, 65, 100] {
            let mut expected = vec![0u8; len];
            ::pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, 7, &mut expected);
            let dk = pbkdf2(password, salt, 7, len, HashAlgorithm::Sha256).unwrap();
            assert_eq!(dk.as_slice(), expected.as_slice(), "len = {len}");
        }

        let mut expected = vec![0u8; 150];
        ::pbkdf2::pbkdf2_hmac::<Sha512>(password, salt, 3, &mut expected);
        let dk = pbkdf2(password, salt, 3, 150, HashAlgorithm::Sha512).unwrap();
        assert_eq!(dk.as_slice(), expected.as_slice());

        let mut expected = vec![0u8; 50];
        ::pbkdf2::pbkdf2_hmac::<Sha384>(password, salt, 5, &mut expected);
        let dk = pbkdf2(password, salt, 5, 50, HashAlgorithm::Sha384).unwrap();
        assert_eq!(dk.as_slice(), expected.as_slice());

        let mut expected = vec![0u8; 30];
        ::pbkdf2::pbkdf2_hmac::<Sha224>(password, salt, 5, &mut expected);
        let dk = pbkdf2(password, salt, 5, 30, HashAlgorithm::Sha224).unwrap();
        assert_eq!(dk.as_slice(), expected.as_slice());
    }

    #[test]
    fn longer_output_extends_shorter_output() {
        let short = pbkdf2(b"pw", b"salt", 10, 16, HashAlgorithm::Sha256).unwrap();
        let long = pbkdf2(b"pw", b"salt", 10, 80, HashAlgorithm::Sha256).unwrap();
        assert_eq!(&long[..16], short.as_slice());
    }

    #[test]
    fn zero_iterations_is_rejected() {
        assert!(matches!(
            pbkdf2(b"pw", b"salt", 0, 32, HashAlgorithm::Sha256),
            Err(CryptasticError::InvalidParameter(_))
        ));
        assert!(KdfParams::new(0, 32, HashAlgorithm::Sha256).is_err());
    }

    #[test]
    fn zero_length_yields_empty_output() {
        let dk = pbkdf2(b"pw", b"salt", 1000, 0, HashAlgorithm::Sha256).unwrap();
        assert!(dk.is_empty());
    }

    #[test]
    fn empty_password_and_salt_are_accepted() {
        let dk = pbkdf2(b"", b"", 1, 32, HashAlgorithm::Sha256).unwrap();
        let mut expected = [0u8; 32];
        ::pbkdf2::pbkdf2_hmac::<Sha256>(b"", b"", 1, &mut expected);
        assert_eq!(dk.as_slice(), expected);
    }

    #[test]
    fn default_params_are_the_tag_params() {
        let params = KdfParams::default();
        assert_eq!(params.iterations(), 1000);
        assert_eq!(params.output_len(), 32);
        assert_eq!(params.hash(), HashAlgorithm::Sha256);
    }

    #[test]
    fn derive_key_is_deterministic() {
        let params = KdfParams::default();
        let k1 = derive_key(b"password", &[42u8; 16], params).unwrap();
        let k2 = derive_key(b"password", &[42u8; 16], params).unwrap();
        assert_eq!(k1, k2);
    }

    #[test]
    fn hash_choice_affects_output() {
        let a = pbkdf2(b"pw", b"salt", 2, 20, HashAlgorithm::Sha1).unwrap();
        let b = pbkdf2(b"pw", b"salt", 2, 20, HashAlgorithm::Sha256).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hash_names_parse() {
        assert_eq!("sha256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("SHA-512".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha512);
        assert_eq!("sha_1".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha1);
        assert_eq!(HashAlgorithm::Sha384.to_string(), "sha384");
        assert!(matches!(
            "md5".parse::<HashAlgorithm>(),
            Err(CryptasticError::UnsupportedAlgorithm(name)) if name == "md5"
        ));
    }
}
