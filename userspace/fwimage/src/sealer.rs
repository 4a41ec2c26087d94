// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Sealer, appends the CRC-32 trailer and derives the checksum record
//! OWNERS: @tools-team
//! STATUS: Functional
//! API_STABILITY: Unstable
//! TEST_COVERAGE: 8 unit tests
//!
//! No cryptography here. The trailer guards against accidental corruption in
//! transit or flash, not against tampering.

use std::fs;
use std::io;
use std::path::Path;

use log::info;

use crate::crc::crc32;
use crate::error::{Error, InputKind, Result};
use crate::format::{ChecksumRecord, SealedContainer, SignedContainer};

/// Seals a signed container. Pure and infallible.
pub fn seal(container: &SignedContainer) -> (SealedContainer, ChecksumRecord) {
    let crc = crc32(container.as_bytes());
    (SealedContainer::from_signed(container, crc), ChecksumRecord::new(crc))
}

/// Reads a signed container from disk and seals it.
pub fn seal_file(container_path: &Path) -> Result<(SealedContainer, ChecksumRecord)> {
    info!("sealing {}", container_path.display());
    let bytes = read_input(container_path, InputKind::SignedContainer)?;
    let signed = SignedContainer::from_bytes(bytes)?;
    let sealed = seal(&signed);
    info!("crc {:08X}", sealed.1.crc());
    Ok(sealed)
}

/// Reads and parses a sealed container. The trailer is not checked here; see
/// [`SealedContainer::trailer_matches`].
pub fn read_sealed(path: &Path) -> Result<SealedContainer> {
    SealedContainer::from_bytes(read_input(path, InputKind::SealedContainer)?)
}

fn read_input(path: &Path, kind: InputKind) -> Result<Vec<u8>> {
    fs::read(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => Error::MissingInput { kind, path: path.to_path_buf() },
        _ => Error::io(path, err),
    })
}
