// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Running the monitor builds and collecting their batch output.
//!
//! Monitors run concurrently, one child process per role. Each is awaited
//! until it exits (or its timeout elapses) before its output file is read.

use crate::config::{MonitorConfig, TopdiffConfig};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::{Child, Command};
use topdiff_capture::{RunCommand, RunLog, RunOutcome, Snapshot};
use topdiff_oracle::{Capture, CaptureSet, ProcessId, Role};

/// Failure while capturing monitor output
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("config has no [monitor] section")]
    MissingMonitor,

    #[error("Failed to spawn {role} monitor {program}: {source}")]
    Spawn {
        role: Role,
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start workload '{command}': {source}")]
    Workload {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{role} monitor timed out after {secs}s")]
    Timeout { role: Role, secs: u64 },

    #[error("{role} monitor exited with non-zero status (code: {code:?}): {stderr}")]
    NonZeroExit {
        role: Role,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to read {role} capture {path}: {source}")]
    Output {
        role: Role,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to prepare work directory: {0}")]
    WorkDir(#[source] std::io::Error),

    #[error("Failed to open run log {path}: {source}")]
    RunLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Arguments for one monitor invocation: batch mode, command names,
/// `iterations` refreshes, output to `output`.
pub fn monitor_args(monitor: &MonitorConfig, role: Role, output: &Path) -> Vec<String> {
    let mut args = vec![
        "-b".to_string(),
        "-c".to_string(),
        "-n".to_string(),
        monitor.iterations.to_string(),
        "-o".to_string(),
        output.display().to_string(),
    ];
    if role == Role::Extra {
        args.push("-H".to_string());
    }
    args.extend(monitor.extra_args.iter().cloned());
    args
}

/// Roles captured under a monitor config.
pub fn roles(monitor: &MonitorConfig) -> Vec<Role> {
    let mut roles = vec![Role::Baseline, Role::Candidate];
    if monitor.thread_mode {
        roles.push(Role::Extra);
    }
    roles
}

/// Background workloads, killed when dropped
pub struct Workloads {
    children: Vec<Child>,
}

impl Workloads {
    pub fn none() -> Self {
        Self {
            children: Vec::new(),
        }
    }

    /// Start each command with `sh -c`.
    pub fn spawn(commands: &[String]) -> Result<Self, CaptureError> {
        let mut children = Vec::with_capacity(commands.len());
        for command in commands {
            let child = Command::new("sh")
                .arg("-c")
                .arg(command)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .spawn()
                .map_err(|source| CaptureError::Workload {
                    command: command.clone(),
                    source,
                })?;
            tracing::debug!(%command, pid = ?child.id(), "started workload");
            children.push(child);
        }
        Ok(Self { children })
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub async fn shutdown(mut self) {
        for child in &mut self.children {
            if let Err(e) = child.kill().await {
                tracing::warn!(error = %e, "failed to stop workload");
            }
        }
    }
}

/// Runs both monitor builds and records every invocation
pub struct Capturer {
    monitor: MonitorConfig,
    identifiers: Vec<ProcessId>,
    work_dir: PathBuf,
    log: RunLog,
}

impl Capturer {
    pub fn new(monitor: MonitorConfig, identifiers: Vec<ProcessId>, work_dir: PathBuf) -> Self {
        Self {
            monitor,
            identifiers,
            work_dir,
            log: RunLog::new(),
        }
    }

    pub fn with_log(mut self, log: RunLog) -> Self {
        self.log = log;
        self
    }

    pub fn log(&self) -> &RunLog {
        &self.log
    }

    /// Path the monitor for `role` writes its batch output to.
    pub fn output_path(&self, role: Role) -> PathBuf {
        self.work_dir.join(format!("{}.out", role))
    }

    fn program(&self, role: Role) -> &Path {
        match role {
            Role::Baseline => &self.monitor.baseline,
            Role::Candidate | Role::Extra => &self.monitor.candidate,
        }
    }

    /// Run one monitor to completion and return its output lines.
    pub async fn run_monitor(&self, role: Role) -> Result<Vec<String>, CaptureError> {
        let program = self.program(role);
        let output = self.output_path(role);
        let args = monitor_args(&self.monitor, role, &output);
        let command = RunCommand::new(program.display().to_string(), args.clone());
        tracing::info!(%role, %command, "starting monitor");

        let child = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();
        let child = match child {
            Ok(child) => child,
            Err(source) => {
                self.log.record(
                    role,
                    command,
                    RunOutcome::Failed {
                        error: source.to_string(),
                    },
                );
                return Err(CaptureError::Spawn {
                    role,
                    program: program.to_path_buf(),
                    source,
                });
            }
        };

        // kill_on_drop reaps the child if the timeout fires first
        let secs = self.monitor.timeout_secs;
        let result = match tokio::time::timeout(Duration::from_secs(secs), child.wait_with_output())
            .await
        {
            Ok(result) => result,
            Err(_) => {
                self.log
                    .record(role, command, RunOutcome::TimedOut { after_secs: secs });
                return Err(CaptureError::Timeout { role, secs });
            }
        };
        let exit = match result {
            Ok(exit) => exit,
            Err(source) => {
                self.log.record(
                    role,
                    command,
                    RunOutcome::Failed {
                        error: source.to_string(),
                    },
                );
                return Err(CaptureError::Spawn {
                    role,
                    program: program.to_path_buf(),
                    source,
                });
            }
        };

        let code = exit.status.code();
        if !exit.status.success() {
            self.log
                .record(role, command, RunOutcome::Exited { code, lines: 0 });
            return Err(CaptureError::NonZeroExit {
                role,
                code,
                stderr: String::from_utf8_lossy(&exit.stderr).trim().to_string(),
            });
        }

        let text = match tokio::fs::read_to_string(&output).await {
            Ok(text) => text,
            Err(source) => {
                self.log.record(
                    role,
                    command,
                    RunOutcome::Failed {
                        error: source.to_string(),
                    },
                );
                return Err(CaptureError::Output {
                    role,
                    path: output,
                    source,
                });
            }
        };
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        self.log.record(
            role,
            command,
            RunOutcome::Exited {
                code,
                lines: lines.len(),
            },
        );
        tracing::debug!(%role, lines = lines.len(), "monitor finished");
        Ok(lines)
    }

    /// Capture every role concurrently and extract the tracked records.
    pub async fn run(&self) -> Result<Snapshot, CaptureError> {
        let extra = async {
            if self.monitor.thread_mode {
                self.run_monitor(Role::Extra).await.map(Some)
            } else {
                Ok(None)
            }
        };
        let (baseline, candidate, extra) = tokio::try_join!(
            self.run_monitor(Role::Baseline),
            self.run_monitor(Role::Candidate),
            extra
        )?;

        let extract = |lines: Vec<String>| Capture::from_lines(lines).extract(&self.identifiers);
        let mut captures = CaptureSet::new(extract(baseline), extract(candidate));
        if let Some(lines) = extra {
            captures = captures.with_extra(extract(lines));
        }

        Ok(Snapshot::new(captures, self.identifiers.clone()).with_runs(self.log.runs()))
    }
}

/// Options of `topdiff capture` beyond the config file
#[derive(Clone, Debug, Default)]
pub struct CaptureOptions {
    pub no_workloads: bool,
    pub run_log: Option<PathBuf>,
    /// Keep raw capture files here; a temporary directory otherwise
    pub work_dir: Option<PathBuf>,
}

/// Start workloads, let them settle, then capture every role.
pub async fn capture(
    config: &TopdiffConfig,
    options: &CaptureOptions,
) -> Result<Snapshot, CaptureError> {
    let monitor = config
        .monitor
        .clone()
        .ok_or(CaptureError::MissingMonitor)?
        .with_env_overrides();

    let temp_dir;
    let work_dir = match &options.work_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(CaptureError::WorkDir)?;
            dir.clone()
        }
        None => {
            temp_dir = tempfile::tempdir().map_err(CaptureError::WorkDir)?;
            temp_dir.path().to_path_buf()
        }
    };

    let log = match &options.run_log {
        Some(path) => RunLog::with_file(path).map_err(|source| CaptureError::RunLog {
            path: path.clone(),
            source,
        })?,
        None => RunLog::new(),
    };

    let workloads = if options.no_workloads {
        Workloads::none()
    } else {
        Workloads::spawn(&monitor.workloads)?
    };
    if !workloads.is_empty() && monitor.settle_ms > 0 {
        tracing::info!(
            workloads = workloads.len(),
            settle_ms = monitor.settle_ms,
            "waiting for workloads to settle"
        );
        tokio::time::sleep(Duration::from_millis(monitor.settle_ms)).await;
    }

    let capturer = Capturer::new(monitor, config.oracle.process_identifiers.clone(), work_dir)
        .with_log(log);
    let result = capturer.run().await;
    workloads.shutdown().await;
    for run in capturer.log().find_failures() {
        tracing::warn!(
            role = %run.role,
            command = %run.command,
            outcome = ?run.outcome,
            "monitor run failed"
        );
    }
    result
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
