//! The pre-filter transform bridge: an external subprocess that rewrites
//! each tracked record's hashed view, one line in for one line out.
//!
//! The core engine has no notion of subprocesses. This sits in the CLI's
//! own pipeline, downstream of [`crate::prefilter::PreFilter`]'s prefix
//! skip and upstream of hashing, driving a single long-lived child rather
//! than spawning one process per record.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use tracing::debug;

use crate::cli::error::{Result, TransformError};

/// A running transform subprocess, fed one line per call to
/// [`Transform::apply`].
///
/// Lines are written and read synchronously and in lockstep: this assumes
/// the child does not buffer arbitrarily many input lines before
/// producing output, which holds for line-oriented filters (`sed`,
/// `tr`, `awk` scripts) but not for tools that batch internally.
pub struct Transform {
    command_line: String,
    child: Child,
    stdin: std::process::ChildStdin,
    stdout: BufReader<std::process::ChildStdout>,
    sent: usize,
    received: usize,
}

impl Transform {
    /// Spawns `command` via the platform shell, capturing its stdin and
    /// stdout.
    pub fn spawn(command: &str) -> Result<Self> {
        let mut child = Command::new(shell())
            .arg(shell_flag())
            .arg(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| TransformError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransformError::Pipe {
                command: command.to_string(),
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TransformError::Pipe {
                command: command.to_string(),
            })?;

        debug!(command, "spawned transform subprocess");
        Ok(Self {
            command_line: command.to_string(),
            child,
            stdin,
            stdout: BufReader::new(stdout),
            sent: 0,
            received: 0,
        })
    }

    /// Writes `view` as one line to the child's stdin and reads one line
    /// back from its stdout, enforcing the one-output-per-input contract.
    pub fn apply(&mut self, view: &[u8]) -> Result<Vec<u8>> {
        self.stdin.write_all(view).map_err(|source| TransformError::Spawn {
            command: self.command_line.clone(),
            source,
        })?;
        self.stdin.write_all(b"\n").map_err(|source| TransformError::Spawn {
            command: self.command_line.clone(),
            source,
        })?;
        self.sent += 1;

        let mut line = Vec::new();
        let read = self
            .stdout
            .read_until(b'\n', &mut line)
            .map_err(|source| TransformError::Spawn {
                command: self.command_line.clone(),
                source,
            })?;
        if read == 0 {
            return Err(TransformError::LineCountMismatch {
                command: self.command_line.clone(),
                sent: self.sent,
                received: self.received,
            }
            .into());
        }
        self.received += 1;
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        Ok(line)
    }

    /// Closes the child's stdin and waits for it to exit, surfacing a
    /// non-zero exit status as an error.
    pub fn finish(mut self) -> Result<()> {
        drop(self.stdin);
        let status = self
            .child
            .wait()
            .map_err(|source| TransformError::Spawn {
                command: self.command_line.clone(),
                source,
            })?;
        if !status.success() {
            return Err(TransformError::NonZeroExit {
                command: self.command_line,
                status: status.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(unix)]
fn shell() -> &'static str {
    "/bin/sh"
}

#[cfg(unix)]
fn shell_flag() -> &'static str {
    "-c"
}

#[cfg(windows)]
fn shell() -> &'static str {
    "cmd"
}

#[cfg(windows)]
fn shell_flag() -> &'static str {
    "/C"
}
