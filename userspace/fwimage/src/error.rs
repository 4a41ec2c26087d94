// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for firmware container construction.
//!
//! Every variant is terminal for the current run. Nothing here describes a
//! transient condition, so callers abort and report instead of retrying.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which required input was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Firmware,
    Key,
    SignedContainer,
    SealedContainer,
    Config,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InputKind::Firmware => "firmware image",
            InputKind::Key => "private key",
            InputKind::SignedContainer => "signed container",
            InputKind::SealedContainer => "sealed container",
            InputKind::Config => "config file",
        };
        f.write_str(label)
    }
}

/// Coarse classification used for reporting and exit handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingInput,
    MalformedKey,
    SigningFailure,
    IoFailure,
    MalformedContainer,
    Build,
    Config,
}

/// Errors produced while building, signing, sealing, or writing a container.
#[derive(Debug, Error)]
pub enum Error {
    /// A required input file does not exist.
    #[error("missing {kind}: {}", path.display())]
    MissingInput { kind: InputKind, path: PathBuf },
    /// The firmware image was present but contained no bytes.
    #[error("firmware image is empty")]
    EmptyFirmware,
    /// Key material could not be decoded as an RSA private key.
    #[error("malformed key: {0}")]
    MalformedKey(String),
    /// Key decoded, but its modulus is not the size the container format fixes.
    #[error("unsupported key size: {bits} bits (expected {expected})")]
    UnsupportedKeySize { bits: usize, expected: usize },
    /// The signing engine rejected the operation.
    #[error("signing failed: {0}")]
    SigningFailure(String),
    /// Firmware length does not fit the 32-bit length field.
    #[error("firmware too large for container: {len} bytes")]
    FirmwareTooLarge { len: usize },
    /// Read or write failure on a concrete path.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Bytes on disk do not describe a well-formed container.
    #[error("malformed container: {0}")]
    MalformedContainer(&'static str),
    /// The external build command could not be started.
    #[error("failed to launch build command `{program}`: {source}")]
    BuildSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The external build command ran and reported failure.
    #[error("build command `{program}` failed ({status})")]
    BuildFailed { program: String, status: String, stderr: String },
    /// Configuration could not be parsed or is incomplete.
    #[error("invalid config: {0}")]
    Config(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingInput { .. } | Error::EmptyFirmware => ErrorKind::MissingInput,
            Error::MalformedKey(_) | Error::UnsupportedKeySize { .. } => ErrorKind::MalformedKey,
            Error::SigningFailure(_) | Error::FirmwareTooLarge { .. } => ErrorKind::SigningFailure,
            Error::Io { .. } => ErrorKind::IoFailure,
            Error::MalformedContainer(_) => ErrorKind::MalformedContainer,
            Error::BuildSpawn { .. } | Error::BuildFailed { .. } => ErrorKind::Build,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
