// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables read by topdiff are defined here.
//! Use these accessors instead of calling `std::env::var()` directly.

/// Generated env var name constants.
mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

pub use names::*;

use std::path::PathBuf;

/// `TOPDIFF_TIMEOUT_SECS`: overrides `monitor.timeout_secs`.
pub fn timeout_secs() -> Option<u64> {
    var_u64(names::TOPDIFF_TIMEOUT_SECS)
}

/// `TOPDIFF_SETTLE_MS`: overrides `monitor.settle_ms`.
pub fn settle_ms() -> Option<u64> {
    var_u64(names::TOPDIFF_SETTLE_MS)
}

/// `TOPDIFF_WORK_DIR`: keep raw capture files here instead of a temp dir.
pub fn work_dir() -> Option<PathBuf> {
    var_path(names::TOPDIFF_WORK_DIR)
}

fn var_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn var_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| parse_u64(&v))
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
