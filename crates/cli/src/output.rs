// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Report rendering and diagnostic messages.
//!
//! Diagnostics get ANSI color when stderr is a terminal.

use crate::cli::{ReportArgs, ReportFormat};
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use topdiff_oracle::Verdict;

const RED: &str = "31";
const YELLOW: &str = "33";

/// Print an error message to stderr.
pub fn print_error(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_tagged(&mut io::stderr(), "Error", RED, msg, is_tty);
}

/// Print a warning message to stderr.
pub fn print_warning(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_tagged(&mut io::stderr(), "Warning", YELLOW, msg, is_tty);
}

fn write_tagged<W: Write>(
    writer: &mut W,
    tag: &str,
    color: &str,
    msg: impl std::fmt::Display,
    is_terminal: bool,
) {
    if is_terminal {
        let _ = writeln!(writer, "\x1b[{}m{}: {}\x1b[0m", color, tag, msg);
    } else {
        let _ = writeln!(writer, "{}: {}", tag, msg);
    }
}

/// Render a verdict in the requested format.
pub fn write_report<W: Write>(
    writer: &mut W,
    verdict: &Verdict,
    format: ReportFormat,
) -> io::Result<()> {
    match format {
        ReportFormat::Text => writer.write_all(verdict.to_text().as_bytes()),
        ReportFormat::Markdown => writer.write_all(verdict.to_markdown().as_bytes()),
    }
}

/// Write the verdict as pretty JSON.
pub fn write_verdict_json(path: &Path, verdict: &Verdict) -> io::Result<()> {
    let json = serde_json::to_string_pretty(verdict)?;
    std::fs::write(path, json + "\n")
}

/// Print the report to stdout, mirror it to the log, and write the JSON
/// verdict if one was requested.
pub fn emit_report(verdict: &Verdict, args: &ReportArgs) -> io::Result<()> {
    verdict.emit();
    let mut stdout = io::stdout().lock();
    write_report(&mut stdout, verdict, args.format)?;
    stdout.flush()?;
    if let Some(path) = &args.json {
        write_verdict_json(path, verdict)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
