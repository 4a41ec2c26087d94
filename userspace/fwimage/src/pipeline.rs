// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: End-to-end packaging: firmware source -> signer -> sealer -> artifacts
//! OWNERS: @tools-team
//! STATUS: Functional
//! API_STABILITY: Unstable
//! TEST_COVERAGE: 6 unit tests + tests/fwimage_host
//!
//! Stages run strictly in order and the first error aborts the run. Nothing
//! is retried: every failure here is a missing or malformed input.

use std::path::PathBuf;

use log::info;

use crate::config::PipelineConfig;
use crate::error::{Error, InputKind, Result};
use crate::output::{remove_if_exists, write_atomic};
use crate::sealer::seal;
use crate::signer::{self, SigningKey};
use crate::source::{BuildCommand, FileSource, FirmwareSource};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackReport {
    pub project: String,
    pub firmware_len: u32,
    pub digest: [u8; 32],
    pub crc: u32,
    pub sealed_path: PathBuf,
    pub checksum_path: PathBuf,
    pub signed_path: Option<PathBuf>,
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The source the config describes: the build command when `[build]` is
    /// present, otherwise the pre-built binary.
    pub fn configured_source(&self) -> Box<dyn FirmwareSource> {
        let firmware = self.config.inputs.firmware.clone();
        match &self.config.build {
            Some(build) => Box::new(BuildCommand { build: build.clone(), output: firmware }),
            None => Box::new(FileSource { path: firmware }),
        }
    }

    pub fn run(&self, source: &dyn FirmwareSource) -> Result<PackReport> {
        let cfg = &self.config;
        cfg.validate()?;
        info!("packaging {}", cfg.project.name);

        // Fail before a potentially long build if the key is not there.
        if !cfg.inputs.key.is_file() {
            return Err(Error::MissingInput { kind: InputKind::Key, path: cfg.inputs.key.clone() });
        }

        let firmware = source.produce(&cfg.project)?;
        info!("signing firmware ({} bytes)", firmware.len());
        let (signed, digest) = {
            let key = SigningKey::load(&cfg.inputs.key)?;
            signer::sign_with_digest(&firmware, &key)?
        };
        info!("firmware signed successfully");

        let (sealed, record) = seal(&signed);

        // A leftover record from an earlier run must not outlive a failed write.
        remove_if_exists(&cfg.outputs.checksum)?;
        if let Some(path) = &cfg.outputs.signed {
            write_atomic(path, signed.as_bytes())?;
        }
        write_atomic(&cfg.outputs.sealed, sealed.as_bytes())?;
        write_atomic(&cfg.outputs.checksum, record.to_text().as_bytes())?;
        info!(
            "CRC {:08X} added to {} and written to {}",
            record.crc(),
            cfg.outputs.sealed.display(),
            cfg.outputs.checksum.display()
        );

        Ok(PackReport {
            project: cfg.project.name.clone(),
            firmware_len: signed.firmware_len(),
            digest,
            crc: record.crc(),
            sealed_path: cfg.outputs.sealed.clone(),
            checksum_path: cfg.outputs.checksum.clone(),
            signed_path: cfg.outputs.signed.clone(),
        })
    }
}
