//! Salts and nonces from the operating system's CSPRNG.
//!
//! Failure to read the OS source is fatal. There is no fallback generator.

use std::error::Error as StdError;

use rand::TryCryptoRng;
use rand::rngs::SysRng;

use crate::aead::{NONCE_LEN, Nonce};
use crate::error::{ErrorCategory, ErrorKind, PassboxError, Result};

/// Length of the KDF salt in bytes.
pub const SALT_LEN: usize = 16;

/// Fill `buf` from the OS random source.
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    fill_from(&mut SysRng, buf)
}

/// Fill `buf` from `rng`. A failing source is an error, never a fallback.
pub fn fill_from<R>(rng: &mut R, buf: &mut [u8]) -> Result<()>
where
    R: TryCryptoRng + ?Sized,
    R::Error: StdError + Send + Sync + 'static,
{
    rng.try_fill_bytes(buf).map_err(|e| {
        PassboxError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::RandomSource,
            "secure random source unavailable",
            e,
        )
    })
}

/// A fresh random salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    salt_from(&mut SysRng)
}

/// A fresh random nonce sized for XChaCha20-Poly1305.
pub fn generate_nonce() -> Result<Nonce> {
    nonce_from(&mut SysRng)
}

pub(crate) fn salt_from<R>(rng: &mut R) -> Result<[u8; SALT_LEN]>
where
    R: TryCryptoRng + ?Sized,
    R::Error: StdError + Send + Sync + 'static,
{
    let mut salt = [0u8; SALT_LEN];
    fill_from(rng, &mut salt)?;
    Ok(salt)
}

pub(crate) fn nonce_from<R>(rng: &mut R) -> Result<Nonce>
where
    R: TryCryptoRng + ?Sized,
    R::Error: StdError + Send + Sync + 'static,
{
    let mut nonce = [0u8; NONCE_LEN];
    fill_from(rng, &mut nonce)?;
    Ok(Nonce::from_bytes(nonce))
}

/// A source that always fails, for exercising the error paths.
#[cfg(test)]
pub(crate) struct FailingRng;

#[cfg(test)]
impl rand::TryRng for FailingRng {
    type Error = std::io::Error;

    fn try_next_u32(&mut self) -> std::result::Result<u32, Self::Error> {
        Err(std::io::Error::other("entropy source offline"))
    }

    fn try_next_u64(&mut self) -> std::result::Result<u64, Self::Error> {
        Err(std::io::Error::other("entropy source offline"))
    }

    fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> std::result::Result<(), Self::Error> {
        Err(std::io::Error::other("entropy source offline"))
    }
}

#[cfg(test)]
impl TryCryptoRng for FailingRng {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_salts_differ() {
        let a = generate_salt().unwrap();
        let b = generate_salt().unwrap();
        assert_ne!(a, b, "random salts must differ");
    }

    #[test]
    fn test_no_nonce_repeats_in_sample() {
        let nonces: HashSet<[u8; NONCE_LEN]> = (0..1000)
            .map(|_| *generate_nonce().unwrap().as_bytes())
            .collect();
        assert_eq!(nonces.len(), 1000);
    }

    #[test]
    fn test_fill_random_empty_buffer() {
        let mut empty: [u8; 0] = [];
        fill_random(&mut empty).unwrap();
    }

    #[test]
    fn test_failing_source_is_an_error() {
        let mut buf = [0xAAu8; 8];
        let err = fill_from(&mut FailingRng, &mut buf).unwrap_err();

        assert_eq!(err.kind, Some(ErrorKind::RandomSource));
        assert_eq!(err.category, ErrorCategory::Internal);
        assert_eq!(
            err.source_error().map(|s| s.to_string()),
            Some("entropy source offline".to_string())
        );
    }

    #[test]
    fn test_salt_and_nonce_propagate_failure() {
        let err = salt_from(&mut FailingRng).unwrap_err();
        assert_eq!(err.kind, Some(ErrorKind::RandomSource));

        let err = nonce_from(&mut FailingRng).unwrap_err();
        assert_eq!(err.kind, Some(ErrorKind::RandomSource));
    }
}
