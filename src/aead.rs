//! XChaCha20-Poly1305 with a detached tag.
//!
//! `open` authenticates before it decrypts and never hands back bytes from a
//! failed call; its working buffer is wiped on the error path.

use chacha20poly1305::aead::{AeadInPlace, KeyInit};
use chacha20poly1305::{Tag, XChaCha20Poly1305, XNonce};
use zeroize::{Zeroize, Zeroizing};

use crate::error::{ErrorCategory, ErrorKind, PassboxError, Result};
use crate::kdf::DerivedKey;

/// Length of nonce in bytes
pub const NONCE_LEN: usize = 24;

/// Length of Poly1305 tag in bytes
pub const TAG_LEN: usize = 16;

/// A 24-byte XChaCha20 nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

/// A 16-byte Poly1305 authentication tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthTag([u8; TAG_LEN]);

impl AuthTag {
    pub fn from_bytes(bytes: [u8; TAG_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; TAG_LEN] {
        &self.0
    }
}

/// Encrypt `plaintext`, returning the ciphertext (same length) and its tag.
pub fn seal(
    key: &DerivedKey,
    nonce: &Nonce,
    plaintext: &[u8],
    aad: Option<&[u8]>,
) -> Result<(Vec<u8>, AuthTag)> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    let mut buffer = plaintext.to_vec();

    match cipher.encrypt_in_place_detached(
        XNonce::from_slice(nonce.as_bytes()),
        aad.unwrap_or_default(),
        &mut buffer,
    ) {
        Ok(tag) => Ok((buffer, AuthTag(tag.into()))),
        Err(e) => {
            buffer.zeroize();
            Err(PassboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::InternalInvariant,
                "encryption failed",
                e,
            ))
        }
    }
}

/// Verify `tag` and decrypt `ciphertext`.
///
/// Any mismatch (key, nonce, ciphertext, tag or aad) yields
/// [`ErrorKind::AuthenticationFailed`] and no plaintext.
pub fn open(
    key: &DerivedKey,
    nonce: &Nonce,
    ciphertext: &[u8],
    tag: &AuthTag,
    aad: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    let mut buffer = Zeroizing::new(ciphertext.to_vec());

    cipher
        .decrypt_in_place_detached(
            XNonce::from_slice(nonce.as_bytes()),
            aad.unwrap_or_default(),
            &mut buffer,
            Tag::from_slice(tag.as_bytes()),
        )
        .map_err(|_| PassboxError::authentication_failed())?;

    Ok(std::mem::take(&mut *buffer))
}
