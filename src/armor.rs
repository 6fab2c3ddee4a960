//! Text armoring for envelopes
//!
//! The text form is the binary envelope in base64url without padding. It is:
//! - Free of whitespace (including newlines)
//! - Safe to embed in URLs
//! - Safe to pass unescaped in a POSIX shell
//!
//! The suite id inside the binary envelope versions the format, so the text
//! form carries no prefix of its own.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::error::{ErrorCategory, ErrorKind, PassboxError, Result};

/// How envelopes are rendered on the way out and expected on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Raw bytes.
    #[default]
    Binary,
    /// base64url, no padding.
    Text,
}

impl Format {
    pub fn encode(self, envelope: Vec<u8>) -> Vec<u8> {
        match self {
            Format::Binary => envelope,
            Format::Text => wrap(&envelope).into_bytes(),
        }
    }

    /// Binary input is borrowed as-is; only text input allocates.
    pub fn decode(self, encoded: &[u8]) -> Result<Cow<'_, [u8]>> {
        match self {
            Format::Binary => Ok(Cow::Borrowed(encoded)),
            Format::Text => {
                let text = std::str::from_utf8(encoded).map_err(|e| {
                    PassboxError::with_kind_and_source(
                        ErrorCategory::User,
                        ErrorKind::MalformedEnvelope,
                        "text envelope is not valid UTF-8",
                        e,
                    )
                })?;
                unwrap(text).map(Cow::Owned)
            }
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Binary => f.write_str("binary"),
            Format::Text => f.write_str("text"),
        }
    }
}

impl FromStr for Format {
    type Err = PassboxError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "binary" => Ok(Format::Binary),
            "text" => Ok(Format::Text),
            other => Err(PassboxError::new(
                ErrorCategory::User,
                format!("unknown envelope format '{}' (expected 'binary' or 'text')", other),
            )),
        }
    }
}

/// Wrap bytes in armor, returning the armored string
pub fn wrap(body: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(body)
}

/// Unwrap an armored string, returning the original bytes
///
/// Surrounding whitespace (such as a trailing newline added by an editor) is
/// ignored.
pub fn unwrap(armored: &str) -> Result<Vec<u8>> {
    let encoded = armored.trim();
    if encoded.is_empty() {
        return Err(PassboxError::malformed(
            "empty text envelope; likely truncated",
        ));
    }

    URL_SAFE_NO_PAD.decode(encoded).map_err(|e| {
        PassboxError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::MalformedEnvelope,
            "base64 decoding failed",
            e,
        )
    })
}
