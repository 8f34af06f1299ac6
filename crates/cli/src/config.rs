// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! topdiff.toml: oracle settings plus how to run the monitors.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use topdiff_oracle::VerifyConfig;

/// Default number of refreshes each monitor prints
pub const DEFAULT_ITERATIONS: u32 = 10;
/// Default per-monitor timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Default delay between launching workloads and starting the monitors
pub const DEFAULT_SETTLE_MS: u64 = 2000;

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_settle_ms() -> u64 {
    DEFAULT_SETTLE_MS
}

/// Errors loading a config file
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid oracle settings: {0}")]
    Oracle(#[from] topdiff_oracle::ConfigError),

    #[error("Invalid monitor settings: {0}")]
    Monitor(String),
}

/// Top-level config file
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TopdiffConfig {
    pub oracle: VerifyConfig,

    /// Required by `topdiff capture` only
    #[serde(default)]
    pub monitor: Option<MonitorConfig>,
}

impl TopdiffConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigFileError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), ConfigFileError> {
        self.oracle.validate()?;
        if let Some(monitor) = &self.monitor {
            monitor.validate()?;
        }
        Ok(())
    }
}

/// How to invoke the two monitor builds
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Reference build
    pub baseline: PathBuf,

    /// Build under test
    pub candidate: PathBuf,

    /// Refreshes per capture (`-n`)
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Also capture the candidate with `-H` as the extra role
    #[serde(default)]
    pub thread_mode: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Shell commands started in the background before capturing
    #[serde(default)]
    pub workloads: Vec<String>,

    /// Passed to every monitor invocation after the batch flags
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl MonitorConfig {
    pub fn new(baseline: impl Into<PathBuf>, candidate: impl Into<PathBuf>) -> Self {
        Self {
            baseline: baseline.into(),
            candidate: candidate.into(),
            iterations: DEFAULT_ITERATIONS,
            thread_mode: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            settle_ms: DEFAULT_SETTLE_MS,
            workloads: Vec::new(),
            extra_args: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigFileError> {
        if self.iterations == 0 {
            return Err(ConfigFileError::Monitor(
                "iterations must be greater than zero".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigFileError::Monitor(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply `TOPDIFF_TIMEOUT_SECS` and `TOPDIFF_SETTLE_MS`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(crate::env::timeout_secs(), crate::env::settle_ms())
    }

    fn with_overrides(mut self, timeout_secs: Option<u64>, settle_ms: Option<u64>) -> Self {
        if let Some(secs) = timeout_secs.filter(|s| *s > 0) {
            self.timeout_secs = secs;
        }
        if let Some(ms) = settle_ms {
            self.settle_ms = ms;
        }
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
