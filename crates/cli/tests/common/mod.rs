// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

//! Shared helpers for topdiff binary tests.

use std::path::{Path, PathBuf};

/// Exit code when the verdict passes
pub const EXIT_PASS: i32 = 0;
/// Exit code when the verdict fails
pub const EXIT_FAIL: i32 = 1;
/// Exit code for setup errors
pub const EXIT_SETUP: i32 = 2;

/// Path to a file under `tests/fixtures/tiptop`
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/tiptop")
        .join(name)
}

/// `topdiff` command with the config env var cleared
#[allow(deprecated)]
pub fn topdiff() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("topdiff").unwrap();
    cmd.env_remove("TOPDIFF_CONFIG")
        .env_remove("TOPDIFF_WORK_DIR")
        .env_remove("TOPDIFF_TIMEOUT_SECS")
        .env_remove("TOPDIFF_SETTLE_MS");
    cmd
}

/// Write an executable stand-in for tiptop that copies `rows` to its `-o` file.
#[cfg(unix)]
pub fn fake_monitor(dir: &Path, name: &str, rows: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    let script = format!(
        r#"#!/bin/sh
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
cat > "$out" <<'ROWS'
{}
ROWS
"#,
        rows.trim_end()
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
