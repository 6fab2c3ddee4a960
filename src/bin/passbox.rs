//! Passbox CLI - password-based file encryption
//!
//! Command-line interface for encrypting and decrypting files with a
//! memory-hard KDF and XChaCha20-Poly1305.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use passbox::file_ops;
use passbox::logging::{self, LogConfig, LogFormat};
use passbox::passphrase::{PassphraseReader, ReaderPassphraseReader, TerminalPassphraseReader};
use passbox::{Config, Format, PassboxError, Sealer, Suite};

#[derive(Parser)]
#[command(name = "passbox")]
#[command(version)]
#[command(about = "Password-based file encryption.", long_about = None)]
struct Cli {
    /// Read passphrase from stdin instead of from terminal
    #[arg(long, global = true)]
    passphrase_stdin: bool,

    /// Log filter directive (PASSBOX_LOG and RUST_LOG take precedence)
    #[arg(long, global = true, env = "PASSBOX_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log output format: text or json
    #[arg(long, global = true, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file
    #[command(alias = "e")]
    Encrypt {
        /// Path to the file whose contents is to be encrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the file to write the envelope to
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Key derivation suite: argon2id or scrypt
        #[arg(long, default_value = "argon2id")]
        suite: Suite,

        /// Envelope encoding: text or binary
        #[arg(long, default_value = "text")]
        format: Format,

        /// Associated data that must be supplied again to decrypt
        #[arg(long, value_name = "STRING")]
        aad: Option<String>,
    },

    /// Decrypt a file
    #[command(alias = "d")]
    Decrypt {
        /// Path to the file whose contents is to be decrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the file to write the plaintext to
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Envelope encoding: text or binary
        #[arg(long, default_value = "text")]
        format: Format,

        /// Associated data given at encryption time
        #[arg(long, value_name = "STRING")]
        aad: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig {
        level: cli.log_level,
        format: cli.log_format,
    };
    if let Err(e) = logging::init(&log_config) {
        exit_with(&e);
    }

    let mut reader = get_passphrase_reader(cli.passphrase_stdin);
    let result = match cli.command {
        Commands::Encrypt {
            input,
            output,
            suite,
            format,
            aad,
        } => {
            let sealer = Sealer::new(Config { suite, format });
            file_ops::encrypt_file(
                &input,
                &output,
                &mut *reader,
                &sealer,
                aad.as_deref().map(str::as_bytes),
            )
        }
        Commands::Decrypt {
            input,
            output,
            format,
            aad,
        } => {
            let sealer = Sealer::new(Config::default().with_format(format));
            file_ops::decrypt_file(
                &input,
                &output,
                &mut *reader,
                &sealer,
                aad.as_deref().map(str::as_bytes),
            )
        }
    };

    if let Err(e) = result {
        exit_with(&e);
    }
}

fn get_passphrase_reader(use_stdin: bool) -> Box<dyn PassphraseReader> {
    if use_stdin {
        Box::new(ReaderPassphraseReader::new(std::io::stdin()))
    } else {
        Box::new(TerminalPassphraseReader::new())
    }
}

/// Print the whole error chain, outermost first, and exit 1.
fn exit_with(err: &PassboxError) -> ! {
    eprintln!("Error: {}", err.report());
    process::exit(1);
}
