//! Whole-file encryption and decryption for the CLI.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use zeroize::Zeroizing;

use crate::error::{ErrorCategory, ErrorKind, PassboxError, Result};
use crate::passphrase::PassphraseReader;
use crate::sealer::Sealer;

/// Encrypt the contents of `input_path` into `output_path`.
///
/// The envelope is written in the sealer's configured format. The output
/// file is created with mode 0o600 on Unix systems.
pub fn encrypt_file(
    input_path: &Path,
    output_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
    sealer: &Sealer,
    aad: Option<&[u8]>,
) -> Result<()> {
    let plaintext = Zeroizing::new(fs::read(input_path).map_err(|e| read_error(input_path, e))?);
    let password = passphrase_reader.read_passphrase()?;
    let envelope = sealer
        .encrypt(&password, &plaintext, aad)
        .map_err(|e| e.with_context("encryption failed"))?;
    write_file_secure(output_path, &envelope)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;

    tracing::info!(
        input = %input_path.display(),
        output = %output_path.display(),
        suite = %sealer.config().suite,
        "encrypted file"
    );
    Ok(())
}

/// Decrypt the envelope in `input_path` into `output_path`.
///
/// Nothing is written unless authentication succeeds. The output file is
/// created with mode 0o600 on Unix systems.
pub fn decrypt_file(
    input_path: &Path,
    output_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
    sealer: &Sealer,
    aad: Option<&[u8]>,
) -> Result<()> {
    let envelope = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let password = passphrase_reader.read_passphrase()?;
    let plaintext = Zeroizing::new(
        sealer
            .decrypt(&password, &envelope, aad)
            .map_err(|e| e.with_context("failed to decrypt"))?,
    );
    write_file_secure(output_path, &plaintext)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;

    tracing::info!(
        input = %input_path.display(),
        output = %output_path.display(),
        "decrypted file"
    );
    Ok(())
}

/// Write file with secure permissions (0o600 on Unix)
fn write_file_secure(path: &Path, contents: &[u8]) -> Result<()> {
    let open_error = |e: io::Error| {
        PassboxError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::Io,
            format!("failed to open {}", path.display()),
            e,
        )
    };

    #[cfg(unix)]
    let mut file = {
        use std::os::unix::fs::OpenOptionsExt;

        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .map_err(open_error)?
    };

    #[cfg(not(unix))]
    let mut file = fs::File::create(path).map_err(open_error)?;

    file.write_all(contents).map_err(|e| {
        PassboxError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to write {}", path.display()),
            e,
        )
    })
}

fn read_error(path: &Path, err: io::Error) -> PassboxError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    PassboxError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}
