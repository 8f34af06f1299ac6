// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Subcommand implementations.

use crate::cli::{CaptureArgs, Cli, Command, CompareArgs, VerifyArgs};
use crate::config::{ConfigFileError, TopdiffConfig};
use crate::monitor::{self, CaptureError, CaptureOptions};
use crate::output::emit_report;
use std::path::{Path, PathBuf};
use thiserror::Error;
use topdiff_capture::{Snapshot, SnapshotError};
use topdiff_oracle::{verify, Capture, CaptureSet, ProcessId, RecordSet, Verdict, VerifyConfig};

/// Verdict passed, or nothing to verify
pub const EXIT_PASS: u8 = 0;
/// Verdict failed
pub const EXIT_FAIL: u8 = 1;
/// Input, config or monitor problem; nothing was verified
pub const EXIT_SETUP: u8 = 2;

/// Setup errors; any of these ends the run with `EXIT_SETUP`
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigFileError),

    #[error("Invalid oracle settings: {0}")]
    Oracle(#[from] topdiff_oracle::ConfigError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("Failed to read capture {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report: {0}")]
    Report(#[source] std::io::Error),

    #[error(
        "no process identifiers given; pass --id, --identifiers or --config (or set {})",
        crate::env::TOPDIFF_CONFIG
    )]
    NoIdentifiers,
}

/// Exit code for a finished verification.
pub fn exit_code(verdict: Option<&Verdict>) -> u8 {
    match verdict {
        Some(v) if !v.passed => EXIT_FAIL,
        _ => EXIT_PASS,
    }
}

/// Run the parsed command. `None` means nothing was verified.
pub async fn run(cli: Cli) -> Result<Option<Verdict>, CliError> {
    match cli.command {
        Command::Capture(args) => run_capture(args).await,
        Command::Verify(args) => run_verify(args).map(Some),
        Command::Compare(args) => run_compare(args).map(Some),
    }
}

async fn run_capture(args: CaptureArgs) -> Result<Option<Verdict>, CliError> {
    let config = TopdiffConfig::load(&args.config)?;
    let options = CaptureOptions {
        no_workloads: args.no_workloads,
        run_log: args.run_log,
        work_dir: args.work_dir.or_else(crate::env::work_dir),
    };

    let snapshot = monitor::capture(&config, &options).await?;
    snapshot.save(&args.out)?;
    tracing::info!(
        path = %args.out.display(),
        runs = snapshot.runs.len(),
        "wrote snapshot"
    );
    for (role, set) in snapshot.captures.roles() {
        let missing = snapshot
            .identifiers
            .iter()
            .filter(|id| !set.contains(id))
            .count();
        if missing > 0 {
            crate::output::print_warning(format_args!(
                "{} capture is missing {} of {} identifiers",
                role,
                missing,
                snapshot.identifiers.len()
            ));
        }
    }

    if !args.verify {
        return Ok(None);
    }
    let verdict = verify(&snapshot.captures, &config.oracle);
    emit_report(&verdict, &args.report).map_err(CliError::Report)?;
    Ok(Some(verdict))
}

fn run_verify(args: VerifyArgs) -> Result<Verdict, CliError> {
    let snapshot = Snapshot::load(&args.snapshot)?;
    let config = match &args.config {
        Some(path) => TopdiffConfig::load(path)?.oracle,
        None => {
            let config = VerifyConfig::new(snapshot.identifiers.iter().cloned());
            config.validate()?;
            config
        }
    };

    let verdict = verify(&snapshot.captures, &config);
    emit_report(&verdict, &args.report).map_err(CliError::Report)?;
    Ok(verdict)
}

fn run_compare(args: CompareArgs) -> Result<Verdict, CliError> {
    let config = match &args.config {
        Some(path) => Some(TopdiffConfig::load(path)?.oracle),
        None => None,
    };

    let mut ids: Vec<ProcessId> = args
        .ids
        .iter()
        .map(|id| ProcessId::from(id.as_str()))
        .collect();
    if let Some(path) = &args.identifiers {
        ids.extend(read_identifiers(path)?);
    }
    let config = match (config, ids.is_empty()) {
        (Some(mut config), false) => {
            config.process_identifiers = ids;
            config
        }
        (Some(config), true) => config,
        (None, false) => VerifyConfig::new(ids),
        (None, true) => return Err(CliError::NoIdentifiers),
    };
    config.validate()?;

    let ids = &config.process_identifiers;
    let mut captures = CaptureSet::new(
        read_capture(&args.baseline, ids)?,
        read_capture(&args.candidate, ids)?,
    );
    if let Some(path) = &args.extra {
        captures = captures.with_extra(read_capture(path, ids)?);
    }

    let verdict = verify(&captures, &config);
    emit_report(&verdict, &args.report).map_err(CliError::Report)?;
    Ok(verdict)
}

fn read_capture(path: &Path, ids: &[ProcessId]) -> Result<RecordSet, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Capture::from_text(&text).extract(ids))
}

/// One identifier per line; blank lines and `#` comments are skipped.
pub fn read_identifiers(path: &Path) -> Result<Vec<ProcessId>, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_identifiers(&text))
}

fn parse_identifiers(text: &str) -> Vec<ProcessId> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ProcessId::from)
        .collect()
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
