// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Where raw firmware bytes come from.
//!
//! The toolchain is a black box behind [`FirmwareSource`]: hand it a project,
//! get bytes back. Tests use [`StaticSource`] and never touch an IDE.

use std::path::PathBuf;
use std::process::Command;

use log::{debug, error, info};

use crate::config::{BuildConfig, ProjectRef};
use crate::error::{Error, Result};
use crate::signer::read_firmware;

/// Produces raw firmware bytes for a project.
pub trait FirmwareSource {
    fn produce(&self, project: &ProjectRef) -> Result<Vec<u8>>;
}

/// An already-built firmware binary on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FirmwareSource for FileSource {
    fn produce(&self, project: &ProjectRef) -> Result<Vec<u8>> {
        debug!("{}: reading firmware from {}", project.name, self.path.display());
        read_firmware(&self.path)
    }
}

/// Runs a headless build, then reads the binary it leaves behind.
#[derive(Debug, Clone)]
pub struct BuildCommand {
    pub build: BuildConfig,
    pub output: PathBuf,
}

impl FirmwareSource for BuildCommand {
    fn produce(&self, project: &ProjectRef) -> Result<Vec<u8>> {
        let program = &self.build.program;
        info!("{}: running command: {} {}", project.name, program, self.build.args.join(" "));

        let mut cmd = Command::new(program);
        cmd.args(&self.build.args);
        if let Some(dir) = &self.build.workdir {
            cmd.current_dir(dir);
        }
        let output = cmd
            .output()
            .map_err(|source| Error::BuildSpawn { program: program.clone(), source })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("command output: {}", stdout.trim_end());
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
            error!("command failed with {}", output.status);
            error!("error output: {stderr}");
            return Err(Error::BuildFailed {
                program: program.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }
        info!("command completed successfully");

        read_firmware(&self.output)
    }
}

/// Canned firmware bytes.
#[derive(Debug, Clone)]
pub struct StaticSource(pub Vec<u8>);

impl FirmwareSource for StaticSource {
    fn produce(&self, _project: &ProjectRef) -> Result<Vec<u8>> {
        Ok(self.0.clone())
    }
}
