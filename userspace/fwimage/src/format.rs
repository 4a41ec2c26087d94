// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Container layout shared by the signer and the sealer.
//!
//! ```text
//! signed:  [len: u32 LE][signature: SIGNATURE_LEN][firmware: len]
//! sealed:  [signed ...................................][crc: u32 LE]
//! ```
//!
//! `len` covers the firmware segment only. The CRC covers every byte
//! written before it.

use crate::crc::crc32;
use crate::error::{Error, Result};

/// RSA modulus size the bootloader is provisioned for.
pub const RSA_MODULUS_BITS: usize = 2048;
pub const SIGNATURE_LEN: usize = RSA_MODULUS_BITS / 8;
pub const HEADER_LEN: usize = 4;
pub const TRAILER_LEN: usize = 4;
pub const SIGNED_PREFIX_LEN: usize = HEADER_LEN + SIGNATURE_LEN;

/// Firmware wrapped with its length header and signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedContainer {
    bytes: Vec<u8>,
}

impl SignedContainer {
    /// Lays out `len ‖ signature ‖ firmware`. Order is fixed.
    pub(crate) fn assemble(signature: &[u8; SIGNATURE_LEN], firmware: &[u8]) -> Result<Self> {
        let len = u32::try_from(firmware.len())
            .map_err(|_| Error::FirmwareTooLarge { len: firmware.len() })?;
        let mut bytes = Vec::with_capacity(SIGNED_PREFIX_LEN + firmware.len());
        bytes.extend_from_slice(&len.to_le_bytes());
        bytes.extend_from_slice(signature);
        bytes.extend_from_slice(firmware);
        Ok(Self { bytes })
    }

    /// Parses a signed container read back from disk.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() <= SIGNED_PREFIX_LEN {
            return Err(Error::MalformedContainer("shorter than header + signature + 1"));
        }
        let declared = read_u32_le(&bytes[..HEADER_LEN]) as usize;
        if declared != bytes.len() - SIGNED_PREFIX_LEN {
            return Err(Error::MalformedContainer("length field disagrees with payload size"));
        }
        Ok(Self { bytes })
    }

    pub fn firmware_len(&self) -> u32 {
        read_u32_le(&self.bytes[..HEADER_LEN])
    }

    pub fn signature(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..SIGNED_PREFIX_LEN]
    }

    pub fn firmware(&self) -> &[u8] {
        &self.bytes[SIGNED_PREFIX_LEN..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Signed container with its CRC-32 trailer appended. Terminal artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedContainer {
    bytes: Vec<u8>,
}

impl SealedContainer {
    pub(crate) fn from_signed(signed: &SignedContainer, crc: u32) -> Self {
        let mut bytes = Vec::with_capacity(signed.as_bytes().len() + TRAILER_LEN);
        bytes.extend_from_slice(signed.as_bytes());
        bytes.extend_from_slice(&crc.to_le_bytes());
        Self { bytes }
    }

    /// Parses a sealed container for inspection. The trailer is not checked
    /// here; see [`SealedContainer::trailer_matches`].
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() <= SIGNED_PREFIX_LEN + TRAILER_LEN {
            return Err(Error::MalformedContainer("shorter than header + signature + 1 + trailer"));
        }
        let declared = read_u32_le(&bytes[..HEADER_LEN]) as usize;
        if declared != bytes.len() - SIGNED_PREFIX_LEN - TRAILER_LEN {
            return Err(Error::MalformedContainer("length field disagrees with payload size"));
        }
        Ok(Self { bytes })
    }

    pub fn firmware_len(&self) -> u32 {
        read_u32_le(&self.bytes[..HEADER_LEN])
    }

    /// CRC stored in the trailer.
    pub fn crc(&self) -> u32 {
        read_u32_le(&self.bytes[self.body_end()..])
    }

    /// Everything the CRC covers.
    pub fn body(&self) -> &[u8] {
        &self.bytes[..self.body_end()]
    }

    /// Recomputes the CRC over the body and compares it with the trailer.
    pub fn trailer_matches(&self) -> bool {
        crc32(self.body()) == self.crc()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    fn body_end(&self) -> usize {
        self.bytes.len() - TRAILER_LEN
    }
}

/// Operator-facing text form of the CRC: 8 uppercase hex digits + newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumRecord {
    crc: u32,
}

impl ChecksumRecord {
    pub fn new(crc: u32) -> Self {
        Self { crc }
    }

    pub fn crc(&self) -> u32 {
        self.crc
    }

    pub fn to_text(&self) -> String {
        format!("{:08X}\n", self.crc)
    }
}

fn read_u32_le(bytes: &[u8]) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(raw)
}
