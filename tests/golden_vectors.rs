//! Golden test vector validation
//!
//! Each vector pins the exact envelope produced for a fixed salt and nonce,
//! so any change to the KDF parameters, the envelope layout or the text
//! encoding shows up here.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use serde::Deserialize;

use passbox::{Config, Format, Password, Sealer, Suite};

#[derive(Debug, Deserialize)]
struct GoldenVector {
    suite: u8,
    plaintext: String,
    envelope: String,
    passphrase: String,
    nonce: String,
    salt: String,
    #[serde(default)]
    aad: Option<String>,
    comment: String,
}

fn load_golden_vectors() -> serde_json::Result<Vec<GoldenVector>> {
    let json_data = include_str!("../testdata/golden-vectors.json");
    serde_json::from_str(json_data)
}

fn decode(field: &str, value: &str) -> Vec<u8> {
    BASE64_STANDARD
        .decode(value)
        .unwrap_or_else(|e| panic!("failed to decode {}: {}", field, e))
}

/// Run golden vector tests on vectors matching `filter`.
fn run_golden_vector_tests(filter: impl Fn(&GoldenVector) -> bool) {
    let vectors = load_golden_vectors().expect("failed to load golden vectors");
    let text_sealer = Sealer::new(Config::default().with_format(Format::Text));

    let mut passed = 0;
    let mut failed = 0;

    for (i, vector) in vectors.iter().enumerate().filter(|(_, v)| filter(v)) {
        let suite = Suite::from_id(vector.suite)
            .unwrap_or_else(|| panic!("vector {}: unknown suite {}", i, vector.suite));
        let expected_plaintext = decode("plaintext", &vector.plaintext);
        let password = Password::from(decode("passphrase", &vector.passphrase));
        let aad = vector.aad.as_deref().map(|a| decode("aad", a));
        let salt: [u8; 16] = decode("salt", &vector.salt)
            .try_into()
            .expect("salt must be 16 bytes");
        let nonce: [u8; 24] = decode("nonce", &vector.nonce)
            .try_into()
            .expect("nonce must be 24 bytes");

        // Deterministic encryption must reproduce the exact envelope.
        let encrypted = match passbox::encrypt_deterministic(
            suite,
            &password,
            &expected_plaintext,
            aad.as_deref(),
            &salt,
            &nonce,
        ) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Vector {}: FAILED to encrypt - {}", i, e);
                eprintln!("  Comment: {}", vector.comment);
                failed += 1;
                continue;
            }
        };

        let wrapped = passbox::armor::wrap(&encrypted);
        if wrapped != vector.envelope {
            eprintln!("Vector {}: FAILED - envelope mismatch", i);
            eprintln!("  Comment: {}", vector.comment);
            eprintln!("  Expected: {}", vector.envelope);
            eprintln!("  Actual:   {}", wrapped);
            failed += 1;
            continue;
        }

        let decrypted =
            match text_sealer.decrypt(&password, vector.envelope.as_bytes(), aad.as_deref()) {
                Ok(data) => data,
                Err(e) => {
                    eprintln!("Vector {}: FAILED to decrypt - {}", i, e);
                    eprintln!("  Comment: {}", vector.comment);
                    failed += 1;
                    continue;
                }
            };

        if decrypted != expected_plaintext {
            eprintln!("Vector {}: FAILED - plaintext mismatch", i);
            eprintln!("  Comment: {}", vector.comment);
            eprintln!("  Expected length: {}", expected_plaintext.len());
            eprintln!("  Actual length: {}", decrypted.len());
            failed += 1;
            continue;
        }

        passed += 1;
    }

    println!(
        "Results: {} passed, {} failed out of {} total",
        passed,
        failed,
        passed + failed
    );

    assert_eq!(failed, 0, "Some golden vectors failed validation");
    assert!(passed > 0, "No golden vectors were tested");
}

#[test]
fn test_golden_vectors_argon2id() {
    run_golden_vector_tests(|v| v.suite == Suite::Argon2idXChaCha20Poly1305.id());
}

#[test]
fn test_golden_vectors_scrypt() {
    run_golden_vector_tests(|v| v.suite == Suite::ScryptXChaCha20Poly1305.id());
}

#[test]
fn test_golden_vector_rejects_wrong_aad() {
    let vectors = load_golden_vectors().expect("failed to load golden vectors");
    let vector = vectors
        .iter()
        .find(|v| v.aad.is_some())
        .expect("at least one vector carries aad");

    let password = Password::from(decode("passphrase", &vector.passphrase));
    let sealer = Sealer::new(Config::default().with_format(Format::Text));

    let err = sealer
        .decrypt(&password, vector.envelope.as_bytes(), None)
        .unwrap_err();
    assert!(err.is_authentication_failure());
}
