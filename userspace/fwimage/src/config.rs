// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pipeline configuration, loaded from TOML and passed in explicitly.
//!
//! Relative paths are resolved against the directory holding the config file
//! so a project can carry its `fw-pack.toml` next to its build output.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, InputKind, Result};

/// Identifies the firmware project being packaged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Inputs {
    /// Raw firmware binary, either pre-built or produced by `[build]`.
    pub firmware: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Outputs {
    pub sealed: PathBuf,
    pub checksum: PathBuf,
    /// Intermediate signed container without trailer. Not written when unset.
    #[serde(default)]
    pub signed: Option<PathBuf>,
}

/// External headless build invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub workdir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    pub project: ProjectRef,
    pub inputs: Inputs,
    pub outputs: Outputs,
    #[serde(default)]
    pub build: Option<BuildConfig>,
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => {
                Error::MissingInput { kind: InputKind::Config, path: path.to_path_buf() }
            }
            _ => Error::io(path, err),
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_toml_str(&text, base)
    }

    pub fn from_toml_str(text: &str, base_dir: &Path) -> Result<Self> {
        let mut config: Self = toml::from_str(text).map_err(|err| Error::Config(err.to_string()))?;
        config.resolve(base_dir);
        config.validate()?;
        Ok(config)
    }

    fn resolve(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.inputs.firmware);
        join(&mut self.inputs.key);
        join(&mut self.outputs.sealed);
        join(&mut self.outputs.checksum);
        if let Some(signed) = self.outputs.signed.as_mut() {
            join(signed);
        }
        if let Some(build) = self.build.as_mut() {
            match build.workdir.as_mut() {
                Some(dir) => join(dir),
                None => build.workdir = Some(base.to_path_buf()),
            }
        }
    }

    /// Checks required fields and that no output path lands on an input or on
    /// another output.
    pub fn validate(&self) -> Result<()> {
        if self.project.name.trim().is_empty() {
            return Err(Error::Config("project.name must not be empty".into()));
        }
        if let Some(build) = &self.build {
            if build.program.trim().is_empty() {
                return Err(Error::Config("build.program must not be empty".into()));
            }
        }
        let outputs = &self.outputs;
        if outputs.sealed == outputs.checksum {
            return Err(Error::Config("outputs.sealed and outputs.checksum must differ".into()));
        }
        if let Some(signed) = &outputs.signed {
            if signed == &outputs.sealed || signed == &outputs.checksum {
                return Err(Error::Config("outputs.signed must differ from other outputs".into()));
            }
        }
        let produced = [Some(&outputs.sealed), Some(&outputs.checksum), outputs.signed.as_ref()];
        let inputs = [("inputs.firmware", &self.inputs.firmware), ("inputs.key", &self.inputs.key)];
        for (name, input) in inputs {
            if produced.iter().flatten().any(|p| *p == input) {
                return Err(Error::Config(format!("an output path overwrites {name}")));
            }
        }
        Ok(())
    }
}
