//! Password handling
//!
//! All passwords enter the crate as raw bytes. Text passwords are UTF-8
//! encoded at construction time, so `"pässword"` and its UTF-8 bytes are the
//! same password.

use std::fmt;

use zeroize::Zeroizing;

use crate::error::{ErrorCategory, ErrorKind, PassboxError, Result};

/// A password, wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<Vec<u8>>);

impl Password {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Empty passwords are rejected everywhere.
    pub(crate) fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            return Err(PassboxError::with_kind(
                ErrorCategory::User,
                ErrorKind::EmptyPassword,
                "empty password not allowed",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Password").field(&"[REDACTED]").finish()
    }
}

impl From<Vec<u8>> for Password {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for Password {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Password {
    fn from(bytes: &[u8; N]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl From<&str> for Password {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes().to_vec())
    }
}

impl From<String> for Password {
    fn from(text: String) -> Self {
        Self::new(text.into_bytes())
    }
}

impl From<Zeroizing<Vec<u8>>> for Password {
    fn from(bytes: Zeroizing<Vec<u8>>) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_bytes_are_the_same_password() {
        assert_eq!(Password::from("pässword"), Password::from("pässword".as_bytes()));
        assert_eq!(Password::from(String::from("abc")), Password::from(b"abc"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = Password::from("hunter2");
        let debug = format!("{:?}", password);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_empty_password_rejected() {
        let err = Password::from("").ensure_not_empty().unwrap_err();
        assert_eq!(err.kind, Some(ErrorKind::EmptyPassword));
        assert_eq!(err.category, ErrorCategory::User);
    }

    #[test]
    fn test_non_utf8_password_accepted() {
        let password = Password::from(&[0xffu8, 0xfe, 0x00][..]);
        assert!(password.ensure_not_empty().is_ok());
        assert_eq!(password.as_bytes(), &[0xff, 0xfe, 0x00]);
    }
}
