// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output regression oracle for tiptop builds
#[derive(Parser, Debug)]
#[command(name = "topdiff", version, about = "Output regression oracle for tiptop builds")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run both monitor builds and store the extracted records
    Capture(CaptureArgs),
    /// Verify a stored snapshot
    Verify(VerifyArgs),
    /// Verify capture files directly
    Compare(CompareArgs),
}

#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// Config file with [oracle] and [monitor] sections
    #[arg(long, env = "TOPDIFF_CONFIG")]
    pub config: PathBuf,

    /// Where to write the snapshot (JSON)
    #[arg(long)]
    pub out: PathBuf,

    /// Assume the workloads are already running
    #[arg(long)]
    pub no_workloads: bool,

    /// Append one JSON line per monitor invocation to this file
    #[arg(long)]
    pub run_log: Option<PathBuf>,

    /// Keep raw capture files in this directory
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Verify the snapshot right after capturing it
    #[arg(long)]
    pub verify: bool,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Snapshot written by `topdiff capture`
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Oracle settings; defaults apply to the snapshot's identifiers otherwise
    #[arg(long, env = "TOPDIFF_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Capture of the reference build
    #[arg(long)]
    pub baseline: PathBuf,

    /// Capture of the build under test
    #[arg(long)]
    pub candidate: PathBuf,

    /// Capture of the build under test in thread mode
    #[arg(long)]
    pub extra: Option<PathBuf>,

    #[arg(long, env = "TOPDIFF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Process identifier to track (repeatable, overrides the config list)
    #[arg(long = "id", value_name = "NAME")]
    pub ids: Vec<String>,

    /// File listing one process identifier per line
    #[arg(long, value_name = "FILE")]
    pub identifiers: Option<PathBuf>,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Report format on stdout
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Also write the verdict as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

/// Report format
#[derive(Clone, Copy, Debug, ValueEnum, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Markdown,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
