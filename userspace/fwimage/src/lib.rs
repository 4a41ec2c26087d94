// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Firmware container library (sign + CRC-seal raw firmware images)
//! OWNERS: @tools-team
//! STATUS: Functional
//! API_STABILITY: Unstable
//! TEST_COVERAGE: unit tests per module + integration tests (via tests/fwimage_host)
//!
//! PUBLIC API:
//!   - signer::sign / sign_files: SHA-256 + RSASSA-PKCS1-v1_5 signed container
//!   - sealer::seal / seal_file: CRC-32 trailer + checksum record
//!   - Pipeline: source -> sign -> seal -> atomic artifact writes
//!   - FirmwareSource: build-step seam (file, build command, static bytes)
//!
//! DEPENDENCIES:
//!   - rsa + sha2: signature over the firmware digest
//!   - crc32fast: CRC-32/ISO-HDLC trailer
//!   - serde + toml: pipeline configuration
//!   - thiserror: error types
//!   - log: stage progress
//!
//! Output layout: `len: u32 LE ‖ signature ‖ firmware ‖ crc32: u32 LE`.

#![forbid(unsafe_code)]

pub mod config;
pub mod crc;
pub mod error;
pub mod format;
pub mod output;
pub mod pipeline;
pub mod sealer;
pub mod signer;
pub mod source;

pub use config::{BuildConfig, Inputs, Outputs, PipelineConfig, ProjectRef};
pub use error::{Error, ErrorKind, InputKind, Result};
pub use format::{
    ChecksumRecord, SealedContainer, SignedContainer, HEADER_LEN, RSA_MODULUS_BITS,
    SIGNATURE_LEN, SIGNED_PREFIX_LEN, TRAILER_LEN,
};
pub use pipeline::{PackReport, Pipeline};
pub use sealer::{read_sealed, seal, seal_file};
pub use signer::{sign, sign_files, sign_with_digest, SigningKey};
pub use source::{BuildCommand, FileSource, FirmwareSource, StaticSource};
