//! Password-based encryption and decryption
//!
//! Encrypt: fresh salt -> KDF -> fresh nonce -> XChaCha20-Poly1305 seal ->
//! pack (-> armor). Decrypt runs the same steps backwards with the salt and
//! suite taken from the envelope.

use std::error::Error as StdError;

use rand::TryCryptoRng;
use rand::rngs::SysRng;

use crate::aead::{self, NONCE_LEN, Nonce};
use crate::config::Config;
use crate::envelope::{Envelope, Suite};
use crate::error::Result;
use crate::kdf;
use crate::random::{self, SALT_LEN};
use crate::secret::Password;

/// Encrypts and decrypts envelopes under one [`Config`].
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sealer {
    config: Config,
}

impl Sealer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Encrypt `plaintext` under `password` with a random salt and nonce.
    ///
    /// Returns the envelope in the configured format (text envelopes are
    /// ASCII bytes).
    pub fn encrypt(
        &self,
        password: &Password,
        plaintext: &[u8],
        aad: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        self.encrypt_with_rng(&mut SysRng, password, plaintext, aad)
    }

    fn encrypt_with_rng<R>(
        &self,
        rng: &mut R,
        password: &Password,
        plaintext: &[u8],
        aad: Option<&[u8]>,
    ) -> Result<Vec<u8>>
    where
        R: TryCryptoRng + ?Sized,
        R::Error: StdError + Send + Sync + 'static,
    {
        password.ensure_not_empty()?;

        // Both draws happen before any key material exists.
        let salt = random::salt_from(rng)?;
        let nonce = random::nonce_from(rng)?;
        let envelope = seal_envelope(self.config.suite, password, plaintext, aad, salt, nonce)?;

        tracing::debug!(
            suite = %self.config.suite,
            format = %self.config.format,
            plaintext_len = plaintext.len(),
            "encrypted envelope"
        );

        Ok(self.config.format.encode(envelope.pack()))
    }

    /// Decrypt an envelope produced by [`Sealer::encrypt`].
    ///
    /// A wrong password, wrong `aad`, and a modified envelope all fail with
    /// [`ErrorKind::AuthenticationFailed`](crate::ErrorKind::AuthenticationFailed).
    pub fn decrypt(
        &self,
        password: &Password,
        envelope: &[u8],
        aad: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        password.ensure_not_empty()?;

        let packed = self.config.format.decode(envelope)?;
        let envelope = Envelope::unpack(&packed)?;

        let key = kdf::derive(envelope.suite.kdf(), password, &envelope.salt)?;
        let plaintext = aead::open(
            &key,
            &envelope.nonce,
            &envelope.ciphertext,
            &envelope.tag,
            Some(&envelope.suite.bind_aad(aad)),
        )
        .inspect_err(|_| tracing::debug!(suite = %envelope.suite, "envelope failed authentication"))?;

        tracing::debug!(suite = %envelope.suite, "decrypted envelope");
        Ok(plaintext)
    }
}

/// Encrypt with caller-provided salt and nonce, returning a binary envelope.
///
/// This function is ONLY for producing reproducible test vectors.
/// NEVER use this in production - reusing a nonce with the same password and
/// salt destroys confidentiality. Use [`Sealer::encrypt`] instead.
pub fn encrypt_deterministic(
    suite: Suite,
    password: &Password,
    plaintext: &[u8],
    aad: Option<&[u8]>,
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>> {
    password.ensure_not_empty()?;
    let envelope = seal_envelope(suite, password, plaintext, aad, *salt, Nonce::from_bytes(*nonce))?;
    Ok(envelope.pack())
}

fn seal_envelope(
    suite: Suite,
    password: &Password,
    plaintext: &[u8],
    aad: Option<&[u8]>,
    salt: [u8; SALT_LEN],
    nonce: Nonce,
) -> Result<Envelope> {
    let key = kdf::derive(suite.kdf(), password, &salt)?;
    let (ciphertext, tag) = aead::seal(&key, &nonce, plaintext, Some(&suite.bind_aad(aad)))?;

    Ok(Envelope {
        suite,
        salt,
        nonce,
        tag,
        ciphertext,
    })
}
