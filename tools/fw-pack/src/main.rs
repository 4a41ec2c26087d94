// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! CONTEXT: Firmware packer tool producing signed, CRC-sealed device images
//! OWNERS: @tools-team
//! STATUS: Functional
//! API_STABILITY: Unstable
//! TEST_COVERAGE: 9 tests
//!
//! PUBLIC API:
//!   - CLI: fw-pack pack --config <fw-pack.toml> [--skip-build]
//!   - CLI: fw-pack sign --firmware <bin> --key <pem> --output <signed.bin>
//!   - CLI: fw-pack seal --input <signed.bin> --output <sealed.bin> --checksum <crc.txt>
//!   - CLI: fw-pack inspect <sealed.bin>
//!
//! DEPENDENCIES:
//!   - fwimage: container format, signer, sealer, pipeline
//!   - clap: argument parsing
//!   - env_logger: log sink (RUST_LOG overrides --verbose)
//!
//! Any failure exits non-zero; nothing is swallowed.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};

use fwimage::output::{remove_if_exists, write_atomic};
use fwimage::{
    read_sealed, seal_file, sign_files, Error, FileSource, FirmwareSource, Pipeline,
    PipelineConfig, SIGNATURE_LEN,
};

#[derive(Debug, Parser)]
#[command(name = "fw-pack", version, about = "Sign and CRC-seal raw firmware images")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build (optional), sign, and seal as described by a config file.
    Pack {
        #[arg(long)]
        config: PathBuf,
        /// Use the existing firmware binary even if `[build]` is configured.
        #[arg(long)]
        skip_build: bool,
    },
    /// Sign a raw firmware binary into a signed container (no CRC trailer).
    Sign {
        #[arg(long)]
        firmware: PathBuf,
        #[arg(long)]
        key: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Append the CRC-32 trailer to a signed container and write the record.
    Seal {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        checksum: PathBuf,
    },
    /// Print the header and trailer of a sealed container; fails on CRC mismatch.
    Inspect { path: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("an error occurred: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

fn run(command: Command) -> Result<(), Error> {
    match command {
        Command::Pack { config, skip_build } => pack(&config, skip_build),
        Command::Sign { firmware, key, output } => {
            let inputs = [("--firmware", firmware.as_path()), ("--key", key.as_path())];
            ensure_distinct(("--output", output.as_path()), &inputs)?;
            let signed = sign_files(&firmware, &key)?;
            write_atomic(&output, signed.as_bytes())?;
            info!("signed container written to {}", output.display());
            Ok(())
        }
        Command::Seal { input, output, checksum } => {
            let others = [("--input", input.as_path()), ("--output", output.as_path())];
            ensure_distinct(("--checksum", checksum.as_path()), &others)?;
            let (sealed, record) = seal_file(&input)?;
            remove_if_exists(&checksum)?;
            write_atomic(&output, sealed.as_bytes())?;
            write_atomic(&checksum, record.to_text().as_bytes())?;
            info!(
                "CRC {:08X} added to {} and written to {}",
                record.crc(),
                output.display(),
                checksum.display()
            );
            Ok(())
        }
        Command::Inspect { path } => {
            let report = inspect(&path)?;
            print!("{report}");
            Ok(())
        }
    }
}

/// Rejects an output path that would overwrite another path of the same
/// invocation. Paths are compared as given.
fn ensure_distinct(output: (&str, &Path), others: &[(&str, &Path)]) -> Result<(), Error> {
    let (flag, path) = output;
    match others.iter().find(|(_, other)| *other == path) {
        Some((other_flag, _)) => {
            Err(Error::Config(format!("{flag} must differ from {other_flag}")))
        }
        None => Ok(()),
    }
}

fn pack(config_path: &Path, skip_build: bool) -> Result<(), Error> {
    let config = PipelineConfig::load(config_path)?;
    let pipeline = Pipeline::new(config);
    let source: Box<dyn FirmwareSource> = if skip_build {
        Box::new(FileSource { path: pipeline.config().inputs.firmware.clone() })
    } else {
        pipeline.configured_source()
    };
    let report = pipeline.run(source.as_ref())?;
    info!(
        "{}: {} bytes, sha256 {}, crc {:08X}",
        report.project,
        report.firmware_len,
        hex::encode(report.digest),
        report.crc
    );
    info!("firmware built, signed, and CRC added successfully");
    Ok(())
}

fn inspect(path: &Path) -> Result<String, Error> {
    let sealed = read_sealed(path)?;
    if !sealed.trailer_matches() {
        return Err(Error::MalformedContainer("crc trailer does not match contents"));
    }
    Ok(format!(
        "firmware_len: {}\nsignature_len: {}\ncrc32: {:08X}\ntrailer: ok\n",
        sealed.firmware_len(),
        SIGNATURE_LEN,
        sealed.crc()
    ))
}
