//! Encryption settings.

use crate::armor::Format;
use crate::envelope::Suite;

/// Settings for a [`Sealer`](crate::Sealer).
///
/// `suite` only affects encryption; decryption always follows the suite id
/// recorded in the envelope. `format` applies in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pub suite: Suite,
    pub format: Format,
}

impl Config {
    pub fn with_suite(mut self, suite: Suite) -> Self {
        self.suite = suite;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }
}
