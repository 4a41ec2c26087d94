// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CRC-32/ISO-HDLC (reflected 0xEDB88320, init and final XOR 0xFFFFFFFF).
//!
//! Backed by `crc32fast`, which is table/SIMD driven but bit-compatible with
//! the LSB-first shift-and-xor loop bootloaders usually carry.

/// One-shot CRC-32 of `bytes`.
pub fn crc32(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}
