//! Invocation of the Go toolchain.

use crate::errors::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

const GO_EXE: &str = if cfg!(windows) { "go.exe" } else { "go" };

/// Locate the `go` executable: `$GOROOT/bin/go` first, then `PATH`.
pub fn go_binary() -> Result<PathBuf> {
    if let Some(root) = std::env::var_os("GOROOT").filter(|r| !r.is_empty()) {
        let candidate = PathBuf::from(root).join("bin").join(GO_EXE);
        if candidate.is_file() {
            return Ok(candidate);
        }
        log::debug!(
            "GOROOT set but {} is missing, falling back to PATH",
            candidate.display()
        );
    }
    which::which("go").map_err(|e| Error::go_tool(format!("go executable not found: {}", e)))
}

/// Run `go tool cover -func=<profile>` and return its stdout.
pub fn run_func_cover(profile: &Path) -> Result<Vec<u8>> {
    let go = go_binary()?;
    let mut func_arg = OsString::from("-func=");
    func_arg.push(profile);

    log::debug!("Running {} tool cover {:?}", go.display(), func_arg);
    let output = Command::new(&go)
        .args(["tool", "cover"])
        .arg(&func_arg)
        .output()
        .map_err(|e| Error::go_tool(format!("failed to run {}: {}", go.display(), e)))?;

    if !output.status.success() {
        return Err(Error::go_tool(exit_message(output.status, &output.stderr)));
    }
    Ok(output.stdout)
}

fn exit_message(status: ExitStatus, stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        status.to_string()
    } else {
        format!("{}, stderr {}", status, stderr)
    }
}
