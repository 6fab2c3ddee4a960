//! Password-based key derivation
//!
//! Two memory-hard KDFs are supported, each with fixed work parameters. The
//! parameters are part of the envelope format (selected by the suite id), so
//! changing them means defining a new suite.
//!
//! - Argon2id v0x13: m = 19456 KiB, t = 2, p = 1
//! - scrypt: N = 2^15, r = 8, p = 1

use std::fmt;

use argon2::{Algorithm, Argon2, Params as Argon2Params, Version};
use scrypt::{Params as ScryptParams, scrypt};
use zeroize::Zeroize;

use crate::error::{ErrorCategory, ErrorKind, PassboxError, Result};
use crate::random::SALT_LEN;
use crate::secret::Password;

/// Length of derived key in bytes
pub const KEY_LEN: usize = 32;

/// Argon2id memory cost in KiB
const ARGON2_M_COST: u32 = 19 * 1024;

/// Argon2id iterations
const ARGON2_T_COST: u32 = 2;

/// Argon2id lanes
const ARGON2_P_COST: u32 = 1;

/// scrypt log2(N) parameter (CPU/memory cost)
const SCRYPT_LOG_N: u8 = 15;

/// scrypt r parameter (block size)
const SCRYPT_R: u32 = 8;

/// scrypt p parameter (parallelization)
const SCRYPT_P: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kdf {
    Argon2id,
    Scrypt,
}

impl Kdf {
    pub fn name(self) -> &'static str {
        match self {
            Kdf::Argon2id => "argon2id",
            Kdf::Scrypt => "scrypt",
        }
    }
}

impl fmt::Display for Kdf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A 256-bit key derived from a password. Zeroized on drop.
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive a 32-byte key from a password and salt.
///
/// The salt must be exactly [`SALT_LEN`] bytes. Derivation is deliberately
/// slow and blocks the calling thread.
pub fn derive(kdf: Kdf, password: &Password, salt: &[u8]) -> Result<DerivedKey> {
    if salt.len() != SALT_LEN {
        return Err(PassboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::Kdf,
            format!("salt must be {} bytes, got {}", SALT_LEN, salt.len()),
        ));
    }

    tracing::debug!(kdf = kdf.name(), "deriving key");

    let mut key = [0u8; KEY_LEN];
    let derived = match kdf {
        Kdf::Argon2id => argon2id(password.as_bytes(), salt, &mut key),
        Kdf::Scrypt => scrypt_into(password.as_bytes(), salt, &mut key),
    };
    if let Err(e) = derived {
        key.zeroize();
        return Err(e);
    }

    Ok(DerivedKey::from_bytes(key))
}

fn argon2id(password: &[u8], salt: &[u8], out: &mut [u8; KEY_LEN]) -> Result<()> {
    let params = Argon2Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, Some(KEY_LEN))
        .map_err(|e| kdf_error("invalid argon2id params", e))?;

    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password_into(password, salt, out)
        .map_err(|e| kdf_error("argon2id key derivation failed", e))
}

fn scrypt_into(password: &[u8], salt: &[u8], out: &mut [u8; KEY_LEN]) -> Result<()> {
    let params = ScryptParams::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LEN)
        .map_err(|e| kdf_error("invalid scrypt params", e))?;

    scrypt(password, salt, &params, out).map_err(|e| kdf_error("scrypt key derivation failed", e))
}

fn kdf_error(msg: &str, source: impl std::error::Error + Send + Sync + 'static) -> PassboxError {
    PassboxError::with_kind_and_source(
        ErrorCategory::Internal,
        ErrorKind::Kdf,
        msg,
        source,
    )
}
