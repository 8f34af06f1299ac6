// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! topdiff: output regression oracle for tiptop builds
//!
//! Runs a reference build and a new build of the monitor against the same
//! workloads, extracts one record per tracked process from each capture,
//! and verifies the new build against the reference with
//! [`topdiff_oracle::verify`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod env;
pub mod monitor;
pub mod output;
