// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! CONTEXT: Integration tests for firmware signing, sealing and the pack pipeline
//! OWNERS: @tools-team
//! STATUS: Functional
//! API_STABILITY: Stable
//! TEST_COVERAGE: 11 tests
//!
//! TEST_SCOPE:
//!   - Known-answer signature and CRC for a fixed key
//!   - Container length invariant and determinism
//!   - CRC self-consistency, record/trailer agreement, tamper sensitivity
//!   - Config-driven pipeline (pre-built binary and build command)
//!   - Output paths never clobber inputs
//!
//! TEST_SCENARIOS:
//!   - test_abc_known_answer_signature(): matches openssl PKCS#1 v1.5 output
//!   - test_abc_known_answer_crc(): sealed CRC and record text
//!   - test_signature_verifies_with_public_key(): public half accepts signature
//!   - test_length_field_matches_firmware_len(): header == len(F)
//!   - test_signing_is_deterministic(): identical signatures across runs
//!   - test_trailer_self_consistent_and_record_agrees(): trailer == crc(body)
//!   - test_single_bit_flip_detected(): tamper sensitivity over every region
//!   - test_empty_firmware_rejected(): invalid input
//!   - test_pipeline_from_config_file(): relative paths + intermediate output
//!   - test_pipeline_with_build_command(): build step produces the binary
//!   - test_config_output_on_key_rejected(): the private key is never overwritten

use std::fs;

use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha2::{Digest, Sha256};
use tempfile::tempdir;

use fwimage::crc::crc32;
use fwimage::{
    seal, sign, Error, ErrorKind, Pipeline, PipelineConfig, SealedContainer, SIGNATURE_LEN,
    SIGNED_PREFIX_LEN, TRAILER_LEN,
};
use fwimage_host::{abc_signature, fixture_key, ABC_SEALED_CRC, KEY_PKCS1_PEM, PUBLIC_KEY_PEM};

#[test]
fn test_abc_known_answer_signature() {
    let signed = sign(b"ABC", &fixture_key()).expect("sign");
    let bytes = signed.as_bytes();

    assert_eq!(&bytes[..4], &[0x03, 0x00, 0x00, 0x00]);
    assert_eq!(signed.signature(), abc_signature().as_slice());
    assert_eq!(&bytes[SIGNED_PREFIX_LEN..], &[0x41, 0x42, 0x43]);
}

#[test]
fn test_abc_known_answer_crc() {
    let signed = sign(b"ABC", &fixture_key()).expect("sign");
    let (sealed, record) = seal(&signed);

    assert_eq!(record.crc(), ABC_SEALED_CRC);
    assert_eq!(record.to_text(), "00DAFA37\n");
    let bytes = sealed.as_bytes();
    assert_eq!(&bytes[bytes.len() - TRAILER_LEN..], &[0x37, 0xFA, 0xDA, 0x00]);
}

#[test]
fn test_signature_verifies_with_public_key() {
    let public = RsaPublicKey::from_public_key_pem(PUBLIC_KEY_PEM).expect("public key");
    let firmware = vec![0xC3u8; 4096];
    let signed = sign(&firmware, &fixture_key()).expect("sign");
    let digest = Sha256::digest(&firmware);

    public
        .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signed.signature())
        .expect("signature valid");
}

#[test]
fn test_length_field_matches_firmware_len() {
    let key = fixture_key();
    for len in [1usize, 2, 255, 256, 257, 65_537] {
        let firmware: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        let signed = sign(&firmware, &key).expect("sign");
        let bytes = signed.as_bytes();
        let mut header = [0u8; 4];
        header.copy_from_slice(&bytes[..4]);
        assert_eq!(u32::from_le_bytes(header) as usize, len);
        assert_eq!(bytes.len(), 4 + SIGNATURE_LEN + len);
        assert_eq!(signed.firmware(), firmware.as_slice());
    }
}

#[test]
fn test_signing_is_deterministic() {
    let firmware = b"deterministic firmware image".repeat(37);
    let first = sign(&firmware, &fixture_key()).expect("first");
    let second = sign(&firmware, &fixture_key()).expect("second");
    assert_eq!(first.signature(), second.signature());
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn test_trailer_self_consistent_and_record_agrees() {
    let key = fixture_key();
    for firmware in [&b"x"[..], &b"ABC"[..], &[0u8; 1024][..], &[0xFFu8; 333][..]] {
        let (sealed, record) = seal(&sign(firmware, &key).expect("sign"));
        let bytes = sealed.as_bytes();
        let (body, trailer) = bytes.split_at(bytes.len() - TRAILER_LEN);

        let mut stored = [0u8; 4];
        stored.copy_from_slice(trailer);
        let stored = u32::from_le_bytes(stored);
        assert_eq!(crc32(body), stored);
        assert_eq!(record.to_text(), format!("{stored:08X}\n"));
        assert!(SealedContainer::from_bytes(bytes.to_vec()).expect("parse").trailer_matches());
    }
}

#[test]
fn test_single_bit_flip_detected() {
    let (sealed, _) = seal(&sign(b"tamper target", &fixture_key()).expect("sign"));
    let original = sealed.into_bytes();
    let regions = [
        0,                                // length header
        7,                                // signature
        SIGNED_PREFIX_LEN + 3,            // firmware
        original.len() - TRAILER_LEN + 1, // trailer
    ];
    for byte in regions {
        for bit in 0..8 {
            let mut tampered = original.clone();
            tampered[byte] ^= 1 << bit;
            let body_end = tampered.len() - TRAILER_LEN;
            let mut stored = [0u8; 4];
            stored.copy_from_slice(&tampered[body_end..]);
            assert_ne!(crc32(&tampered[..body_end]), u32::from_le_bytes(stored));
        }
    }
}

#[test]
fn test_empty_firmware_rejected() {
    let err = sign(&[], &fixture_key()).expect_err("empty firmware");
    assert!(matches!(err, Error::EmptyFirmware));
    assert_eq!(err.kind(), ErrorKind::MissingInput);
}

#[test]
fn test_pipeline_from_config_file() {
    let dir = tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("Debug")).expect("mkdir");
    fs::write(dir.path().join("key.pem"), KEY_PKCS1_PEM).expect("key");
    fs::write(dir.path().join("Debug/demo.bin"), b"ABC").expect("firmware");
    let config_path = dir.path().join("fw-pack.toml");
    fs::write(
        &config_path,
        r#"
[project]
name = "demo"

[inputs]
firmware = "Debug/demo.bin"
key = "key.pem"

[outputs]
sealed = "Debug/demo_signed.bin"
checksum = "Debug/demo_crc.txt"
signed = "Debug/demo_unsealed.bin"
"#,
    )
    .expect("config");

    let pipeline = Pipeline::new(PipelineConfig::load(&config_path).expect("load config"));
    let source = pipeline.configured_source();
    let report = pipeline.run(source.as_ref()).expect("pack");

    assert_eq!(report.crc, ABC_SEALED_CRC);
    assert_eq!(report.digest.as_slice(), Sha256::digest(b"ABC").as_slice());

    let sealed = fs::read(dir.path().join("Debug/demo_signed.bin")).expect("sealed");
    let unsealed = fs::read(dir.path().join("Debug/demo_unsealed.bin")).expect("unsealed");
    assert_eq!(&sealed[..sealed.len() - TRAILER_LEN], unsealed.as_slice());
    let record = fs::read_to_string(dir.path().join("Debug/demo_crc.txt")).expect("record");
    assert_eq!(record, "00DAFA37\n");
}

#[cfg(unix)]
#[test]
fn test_pipeline_with_build_command() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("key.pem"), KEY_PKCS1_PEM).expect("key");
    let config = PipelineConfig::from_toml_str(
        r#"
[project]
name = "demo"

[inputs]
firmware = "out/demo.bin"
key = "key.pem"

[outputs]
sealed = "out/demo_signed.bin"
checksum = "out/demo_crc.txt"

[build]
program = "sh"
args = ["-c", "mkdir -p out && printf 'ABC' > out/demo.bin"]
"#,
        dir.path(),
    )
    .expect("config");

    let pipeline = Pipeline::new(config);
    let report = pipeline.run(pipeline.configured_source().as_ref()).expect("pack");
    assert_eq!(report.firmware_len, 3);
    assert_eq!(report.crc, ABC_SEALED_CRC);
}

#[test]
fn test_config_output_on_key_rejected() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("key.pem"), KEY_PKCS1_PEM).expect("key");
    let config_path = dir.path().join("fw-pack.toml");
    fs::write(
        &config_path,
        r#"
[project]
name = "demo"

[inputs]
firmware = "demo.bin"
key = "key.pem"

[outputs]
sealed = "key.pem"
checksum = "demo_crc.txt"
"#,
    )
    .expect("config");

    let err = PipelineConfig::load(&config_path).expect_err("sealed over key");
    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(fs::read_to_string(dir.path().join("key.pem")).expect("key"), KEY_PKCS1_PEM);
}
