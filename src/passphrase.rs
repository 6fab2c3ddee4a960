//! Where the CLI gets its password from.

use std::io::{self, IsTerminal, Read, Write};

use zeroize::Zeroizing;

use crate::error::{ErrorCategory, ErrorKind, PassboxError, Result};
use crate::secret::Password;

/// A source of passwords.
pub trait PassphraseReader {
    /// Read a password as arbitrary bytes (not necessarily UTF-8).
    fn read_passphrase(&mut self) -> Result<Password>;
}

/// Returns a fixed password (for testing)
pub struct ConstantPassphraseReader {
    password: Password,
}

impl ConstantPassphraseReader {
    pub fn new(password: impl Into<Password>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

impl PassphraseReader for ConstantPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Password> {
        Ok(self.password.clone())
    }
}

/// Reads the entire stream as the password, byte for byte.
///
/// Nothing is trimmed: `printf 'pw\n'` and `printf 'pw'` are different
/// passwords.
pub struct ReaderPassphraseReader<R> {
    reader: R,
}

impl<R: Read> ReaderPassphraseReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> PassphraseReader for ReaderPassphraseReader<R> {
    fn read_passphrase(&mut self) -> Result<Password> {
        let mut data = Zeroizing::new(Vec::new());
        self.reader.read_to_end(&mut data).map_err(|e| {
            PassboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                "error reading passphrase",
                e,
            )
        })?;
        tracing::debug!("read passphrase from stream");
        Ok(Password::from(data))
    }
}

/// Reads passphrase from terminal with no echo
#[derive(Default)]
pub struct TerminalPassphraseReader;

impl TerminalPassphraseReader {
    pub fn new() -> Self {
        Self
    }
}

impl PassphraseReader for TerminalPassphraseReader {
    /// Read passphrase from terminal.
    ///
    /// Note: Terminal input is limited to UTF-8 due to rpassword library constraints.
    /// For non-UTF-8 passphrases, use --passphrase-stdin instead.
    fn read_passphrase(&mut self) -> Result<Password> {
        if !io::stdin().is_terminal() {
            return Err(PassboxError::with_kind(
                ErrorCategory::User,
                ErrorKind::PassphraseUnavailable,
                "cannot read passphrase from terminal - stdin is not a terminal",
            ));
        }

        let mut stderr = io::stderr();
        stderr
            .write_all(b"Passphrase (passbox): ")
            .and_then(|()| stderr.flush())
            .map_err(|e| {
                PassboxError::with_kind_and_source(
                    ErrorCategory::Internal,
                    ErrorKind::Io,
                    "failed to write prompt",
                    e,
                )
            })?;

        // rpassword hands back a plain String; move it straight into a
        // zeroizing wrapper.
        let passphrase = rpassword::read_password().map_err(|e| {
            PassboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::PassphraseUnavailable,
                "failure reading passphrase",
                e,
            )
        })?;

        Ok(Password::from(Zeroizing::new(passphrase.into_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_reader() {
        let mut reader = ConstantPassphraseReader::new("test123");
        assert_eq!(reader.read_passphrase().unwrap().as_bytes(), b"test123");
        assert_eq!(reader.read_passphrase().unwrap().as_bytes(), b"test123");
    }

    /// Tests the terminal reader. This is ignored by default and must be run
    /// explicitly and with human input:
    ///
    /// cargo test test_terminal_reader_interactive -- --ignored --nocapture
    #[test]
    #[ignore]
    fn test_terminal_reader_interactive() {
        let mut reader = TerminalPassphraseReader::new();
        println!("\nPlease enter a test passphrase:");
        let passphrase = reader.read_passphrase().unwrap();
        assert!(!passphrase.is_empty(), "Expected non-empty passphrase");
    }

    #[test]
    fn test_reader_passphrase_reader() {
        let mut reader = ReaderPassphraseReader::new(&b"mypassword"[..]);
        assert_eq!(reader.read_passphrase().unwrap().as_bytes(), b"mypassword");
    }

    #[test]
    fn test_reader_keeps_trailing_newline() {
        let mut reader = ReaderPassphraseReader::new(&b"mypassword\n"[..]);
        assert_eq!(reader.read_passphrase().unwrap().as_bytes(), b"mypassword\n");
    }

    #[test]
    fn test_reader_passphrase_reader_empty() {
        let mut reader = ReaderPassphraseReader::new(&b""[..]);
        assert!(reader.read_passphrase().unwrap().is_empty());
    }

    /// --passphrase-stdin must work with passphrases containing non-UTF-8 bytes.
    #[test]
    fn test_reader_passphrase_reader_non_utf8() {
        let data: &[u8] = &[0xff, 0xfe, 0x00, 0x01];
        let mut reader = ReaderPassphraseReader::new(data);
        assert_eq!(reader.read_passphrase().unwrap().as_bytes(), data);
    }

    #[test]
    fn test_reader_io_error() {
        struct Broken;

        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("pipe closed"))
            }
        }

        let err = ReaderPassphraseReader::new(Broken)
            .read_passphrase()
            .unwrap_err();
        assert_eq!(err.kind, Some(ErrorKind::Io));
    }
}
