use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to any other error
    /// category in this enum.
    ///
    /// In particular this means that use of Internal is never a guarantee
    /// the error is not, for example due to a user error - merely that it
    /// cannot be confidently determined by the code.
    Internal,

    /// The caller provided invalid input or asked for something that is
    /// unsupported or impossible to complete.
    User,
}

/// Fine-grained condition flags for consumers that want to branch on error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Key derivation parameters were invalid or the KDF itself failed.
    Kdf,
    /// The operating system's secure random source could not be read.
    RandomSource,
    /// The authentication tag did not verify. Wrong password, wrong
    /// associated data, tampering and corruption all look the same.
    AuthenticationFailed,
    /// The envelope is truncated, carries an unknown suite id, or its text
    /// encoding could not be decoded.
    MalformedEnvelope,
    /// An empty password was supplied.
    EmptyPassword,
    /// Decrypted data was requested as text but is not valid UTF-8.
    Encoding,
    /// Passphrase could not be obtained from the configured reader.
    PassphraseUnavailable,
    /// Unexpected state reached within passbox logic.
    InternalInvariant,
    /// Interaction with the filesystem, stdin/stdout, or other I/O failed.
    Io,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct PassboxError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Optional specific condition tag for consumers that need to
    /// branch their behavior. Any code consuming errors MUST handle
    /// the absence of a defined kind.
    pub kind: Option<ErrorKind>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl PassboxError {
    /// Creates a new error with a required category and display message.
    pub fn new(category: ErrorCategory, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: None,
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that also tags the failure with a kind.
    pub fn with_kind(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that retains the originating source error.
    pub fn with_source(
        category: ErrorCategory,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: None,
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// Creates a new error that carries both a kind tag and the originating source error.
    pub fn with_kind_and_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    pub(crate) fn authentication_failed() -> Self {
        Self::with_kind(
            ErrorCategory::User,
            ErrorKind::AuthenticationFailed,
            "corrupt input, tampered-with data, or bad password",
        )
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorCategory::User, ErrorKind::MalformedEnvelope, msg)
    }

    /// The user-facing message carried by the error.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// True if this error is tagged as an authentication failure.
    pub fn is_authentication_failure(&self) -> bool {
        self.kind == Some(ErrorKind::AuthenticationFailed)
    }

    /// The message followed by every source message, outermost first,
    /// joined with `": "`.
    pub fn report(&self) -> String {
        let mut chain = self.msg.clone();
        let mut source = StdError::source(self);
        while let Some(cause) = source {
            chain.push_str(": ");
            chain.push_str(&cause.to_string());
            source = cause.source();
        }
        chain
    }

    /// Wraps the current error with a higher-level message while preserving the original as source.
    ///
    /// Category and kind carry over, so callers branching on `kind` see the
    /// innermost condition.
    pub fn with_context(self, msg: impl Into<String>) -> Self {
        let category = self.category;
        let kind = self.kind;
        Self {
            category,
            kind,
            source: Some(Box::new(self)),
            msg: msg.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PassboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_keeps_kind_and_category() {
        let err = PassboxError::malformed("envelope too short").with_context("failed to decrypt");

        assert_eq!(err.kind, Some(ErrorKind::MalformedEnvelope));
        assert_eq!(err.category, ErrorCategory::User);
        assert_eq!(err.message(), "failed to decrypt");
        assert_eq!(
            err.source_error().map(|s| s.to_string()),
            Some("envelope too short".to_string())
        );
    }

    #[test]
    fn test_new_has_no_kind() {
        let err = PassboxError::new(ErrorCategory::Internal, "boom");
        assert_eq!(err.kind, None);
        assert!(err.source_error().is_none());
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_authentication_failed_message_covers_all_causes() {
        let err = PassboxError::authentication_failed();
        assert!(err.is_authentication_failure());
        assert!(err.to_string().contains("bad password"));
        assert!(err.to_string().contains("tampered"));
    }

    #[test]
    fn test_report_lists_each_cause_once() {
        let io = std::io::Error::other("disk on fire");
        let err = PassboxError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to write out.bin",
            io,
        )
        .with_context("encryption failed");

        assert_eq!(err.report(), "encryption failed: failed to write out.bin: disk on fire");
    }

    #[test]
    fn test_report_without_source() {
        let err = PassboxError::new(ErrorCategory::User, "boom");
        assert_eq!(err.report(), "boom");
    }
}
