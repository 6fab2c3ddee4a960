//! Binary envelope layout
//!
//! ```text
//! offset  len  field
//! 0       1    suite id
//! 1       16   salt
//! 17      24   nonce
//! 41      16   tag
//! 57      N    ciphertext
//! ```
//!
//! Every field except the ciphertext has a fixed length, so the ciphertext
//! is simply whatever follows the tag.

use std::fmt;
use std::str::FromStr;

use crate::aead::{AuthTag, NONCE_LEN, Nonce, TAG_LEN};
use crate::error::{ErrorCategory, PassboxError, Result};
use crate::kdf::Kdf;
use crate::random::SALT_LEN;

/// Length of suite id + salt + nonce.
pub const HEADER_LEN: usize = 1 + SALT_LEN + NONCE_LEN;

/// Smallest valid envelope: header and tag around an empty ciphertext.
pub const MIN_LEN: usize = HEADER_LEN + TAG_LEN;

/// Algorithm suite, recorded as the first byte of every envelope.
///
/// Both suites use XChaCha20-Poly1305; they differ only in the KDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Suite {
    #[default]
    Argon2idXChaCha20Poly1305,
    ScryptXChaCha20Poly1305,
}

impl Suite {
    pub const fn id(self) -> u8 {
        match self {
            Suite::Argon2idXChaCha20Poly1305 => 0x01,
            Suite::ScryptXChaCha20Poly1305 => 0x02,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0x01 => Some(Suite::Argon2idXChaCha20Poly1305),
            0x02 => Some(Suite::ScryptXChaCha20Poly1305),
            _ => None,
        }
    }

    pub fn kdf(self) -> Kdf {
        match self {
            Suite::Argon2idXChaCha20Poly1305 => Kdf::Argon2id,
            Suite::ScryptXChaCha20Poly1305 => Kdf::Scrypt,
        }
    }

    /// Associated data actually fed to the AEAD: the suite id followed by
    /// the caller's data, so the suite byte cannot be swapped undetected.
    pub(crate) fn bind_aad(self, aad: Option<&[u8]>) -> Vec<u8> {
        let aad = aad.unwrap_or_default();
        let mut bound = Vec::with_capacity(1 + aad.len());
        bound.push(self.id());
        bound.extend_from_slice(aad);
        bound
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suite::Argon2idXChaCha20Poly1305 => f.write_str("argon2id-xchacha20poly1305"),
            Suite::ScryptXChaCha20Poly1305 => f.write_str("scrypt-xchacha20poly1305"),
        }
    }
}

/// Accepts the KDF name (`argon2id`, `scrypt`) or the full suite name.
impl FromStr for Suite {
    type Err = PassboxError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "argon2id" | "argon2id-xchacha20poly1305" => Ok(Suite::Argon2idXChaCha20Poly1305),
            "scrypt" | "scrypt-xchacha20poly1305" => Ok(Suite::ScryptXChaCha20Poly1305),
            other => Err(PassboxError::new(
                ErrorCategory::User,
                format!("unknown suite '{}' (expected 'argon2id' or 'scrypt')", other),
            )),
        }
    }
}

/// The parsed fields of an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub suite: Suite,
    pub salt: [u8; SALT_LEN],
    pub nonce: Nonce,
    pub tag: AuthTag,
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Serialized length of this envelope.
    pub fn packed_len(&self) -> usize {
        MIN_LEN + self.ciphertext.len()
    }

    /// Serialize to the binary layout.
    pub fn pack(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(self.packed_len());
        output.push(self.suite.id());
        output.extend_from_slice(&self.salt);
        output.extend_from_slice(self.nonce.as_bytes());
        output.extend_from_slice(self.tag.as_bytes());
        output.extend_from_slice(&self.ciphertext);
        output
    }

    /// Parse the binary layout.
    pub fn unpack(input: &[u8]) -> Result<Self> {
        if input.len() < MIN_LEN {
            return Err(PassboxError::malformed(format!(
                "envelope too short: {} bytes (expected at least {})",
                input.len(),
                MIN_LEN
            )));
        }

        let (&id, rest) = input
            .split_first()
            .ok_or_else(|| PassboxError::malformed("empty envelope"))?;
        let suite = Suite::from_id(id)
            .ok_or_else(|| PassboxError::malformed(format!("unsupported envelope suite id 0x{:02x}", id)))?;

        let (salt, rest) = rest.split_at(SALT_LEN);
        let (nonce, rest) = rest.split_at(NONCE_LEN);
        let (tag, ciphertext) = rest.split_at(TAG_LEN);

        Ok(Self {
            suite,
            salt: fixed(salt)?,
            nonce: Nonce::from_bytes(fixed(nonce)?),
            tag: AuthTag::from_bytes(fixed(tag)?),
            ciphertext: ciphertext.to_vec(),
        })
    }
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| PassboxError::malformed("envelope field has the wrong length"))
}
