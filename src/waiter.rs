//! Blocking wait for a foreground child, with wall-clock timing.

use crate::command::ExitCode;
use anyhow::{Context, Result};
use std::process::{Child, ExitStatus};
use std::time::{Duration, Instant};

/// What the interpreter reports after a foreground command finishes.
#[derive(Debug)]
pub struct ForegroundReport {
    pub pid: u32,
    pub status: ExitCode,
    pub elapsed: Duration,
}

/// Blocks until the given child exits and measures the elapsed wall-clock
/// time around the wait.
///
/// The wait targets this specific handle, so a background child terminating
/// in the meantime can never be mistaken for the foreground result. A failing
/// wait call is surfaced with the pid and is not fatal to the caller's loop.
pub fn wait_foreground(child: &mut Child) -> Result<ForegroundReport> {
    let pid = child.id();
    let started = Instant::now();
    let status = child
        .wait()
        .with_context(|| format!("failed to wait for pid {pid}"))?;
    let elapsed = started.elapsed();

    Ok(ForegroundReport {
        pid,
        status: decode_status(status),
        elapsed,
    })
}

/// Maps an [`ExitStatus`] to the shell-conventional exit code.
pub fn decode_status(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(code) => code,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_status: ExitStatus) -> ExitCode {
    -1
}
