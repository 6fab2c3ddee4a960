//! Passbox - password-based authenticated encryption
//!
//! A password and a random salt go through a memory-hard KDF (Argon2id by
//! default, scrypt optionally); the derived key seals the plaintext with
//! XChaCha20-Poly1305 under a random nonce. Everything needed to decrypt
//! except the password travels in a self-describing envelope.
//!
//! ```no_run
//! let envelope = passbox::encrypt("correct horse", b"attack at dawn", None)?;
//! let plaintext = passbox::decrypt("correct horse", &envelope, None)?;
//! assert_eq!(plaintext, b"attack at dawn");
//! # Ok::<(), passbox::PassboxError>(())
//! ```

#![forbid(unsafe_code)]

pub mod aead;
pub mod armor;
pub mod config;
pub mod envelope;
pub mod error;
pub mod file_ops;
pub mod kdf;
pub mod logging;
pub mod passphrase;
pub mod random;
pub mod sealer;
pub mod secret;

pub use armor::Format;
pub use config::Config;
pub use envelope::{Envelope, Suite};
pub use error::{ErrorCategory, ErrorKind, PassboxError, Result};
pub use sealer::{Sealer, encrypt_deterministic};
pub use secret::Password;

/// Encrypt with the default suite, returning a binary envelope.
pub fn encrypt(
    password: impl Into<Password>,
    plaintext: &[u8],
    aad: Option<&[u8]>,
) -> Result<Vec<u8>> {
    Sealer::default().encrypt(&password.into(), plaintext, aad)
}

/// Decrypt a binary envelope produced by [`encrypt`] or any [`Sealer`].
pub fn decrypt(
    password: impl Into<Password>,
    envelope: &[u8],
    aad: Option<&[u8]>,
) -> Result<Vec<u8>> {
    Sealer::default().decrypt(&password.into(), envelope, aad)
}

fn text_sealer() -> Sealer {
    Sealer::new(Config::default().with_format(Format::Text))
}

/// Encrypt a string into a text (base64url) envelope.
pub fn encrypt_string(password: impl Into<Password>, plaintext: &str) -> Result<String> {
    let encoded = text_sealer().encrypt(&password.into(), plaintext.as_bytes(), None)?;
    String::from_utf8(encoded).map_err(|e| {
        PassboxError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::InternalInvariant,
            "text envelope is not ASCII",
            e,
        )
    })
}

/// Decrypt a text envelope produced by [`encrypt_string`].
///
/// Fails with [`ErrorKind::Encoding`] if the plaintext is not UTF-8.
pub fn decrypt_string(password: impl Into<Password>, envelope: &str) -> Result<String> {
    let plaintext = text_sealer().decrypt(&password.into(), envelope.as_bytes(), None)?;
    String::from_utf8(plaintext).map_err(|e| {
        // Don't echo the plaintext back through the error.
        let valid_up_to = e.utf8_error().valid_up_to();
        zeroize::Zeroize::zeroize(&mut e.into_bytes());
        PassboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::Encoding,
            format!("decrypted data is not valid UTF-8 (invalid byte at offset {})", valid_up_to),
        )
    })
}
