// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! topdiff binary entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use topdiff::cli::Cli;
use topdiff::commands::{self, EXIT_SETUP};
use topdiff::output::print_error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match commands::run(cli).await {
        Ok(verdict) => ExitCode::from(commands::exit_code(verdict.as_ref())),
        Err(e) => {
            print_error(&e);
            ExitCode::from(EXIT_SETUP)
        }
    }
}
