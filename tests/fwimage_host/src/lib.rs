// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! CONTEXT: Host integration tests for the fwimage library (sign + seal + pipeline)
//! OWNERS: @tools-team
//! STATUS: Functional
//! API_STABILITY: Stable
//! TEST_COVERAGE: 10 tests (tests/pack_flow.rs)
//!
//! Shared fixtures: a fixed 2048-bit RSA key and its known-answer vectors.

use fwimage::SigningKey;

pub const KEY_PKCS1_PEM: &str =
    include_str!("../../../userspace/fwimage/testdata/rsa2048_pkcs1.pem");
pub const PUBLIC_KEY_PEM: &str =
    include_str!("../../../userspace/fwimage/testdata/rsa2048_pub.pem");

/// `openssl dgst -sha256 -sign rsa2048_pkcs1.pem` over `b"ABC"`.
pub const ABC_SIGNATURE_HEX: &str =
    include_str!("../../../userspace/fwimage/testdata/abc_rsa2048.sig.hex");

/// CRC-32 of the signed container built from `b"ABC"` with the fixture key.
pub const ABC_SEALED_CRC: u32 = 0x00DA_FA37;

pub fn fixture_key() -> SigningKey {
    SigningKey::from_pem(KEY_PKCS1_PEM).expect("fixture key")
}

pub fn abc_signature() -> Vec<u8> {
    hex::decode(ABC_SIGNATURE_HEX.trim()).expect("fixture signature hex")
}
