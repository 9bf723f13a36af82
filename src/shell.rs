//! Runs scripts through `sh -c` with stderr folded into stdout.

use crate::correction::{Execution, Executor, OutputMode};
use crate::error::FixError;
use std::io::{self, Read, Write};
use std::process::{Command as Process, Stdio};
use tracing::debug;

/// Status reported when the child was killed by a signal
const SIGNALED: i32 = -1;

#[derive(Debug, Default)]
pub struct ShellExecutor;

fn sh(script: &str) -> Process {
    let mut process = Process::new("sh");
    process.arg("-c").arg(format!("exec 2>&1; {script}"));
    process
}

fn spawn_error(script: &str, source: io::Error) -> FixError {
    FixError::Spawn {
        script: script.to_string(),
        source,
    }
}

impl Executor for ShellExecutor {
    fn capture(&mut self, script: &str) -> Result<String, FixError> {
        debug!("Capturing output of {:?}", script);
        let output = sh(script)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(script, e))?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Collected runs stream the combined output to our stdout while keeping it.
    fn execute(&mut self, script: &str, mode: OutputMode) -> Result<Execution, FixError> {
        debug!("Executing {:?} ({:?})", script, mode);
        if mode == OutputMode::Inherit {
            let status = sh(script).status().map_err(|e| spawn_error(script, e))?;
            return Ok(Execution {
                status: status.code().unwrap_or(SIGNALED),
                output: String::new(),
            });
        }

        let mut child = sh(script)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(script, e))?;

        let pumped = match child.stdout.take() {
            Some(pipe) => tee(pipe, io::stdout()),
            None => Ok(Vec::new()),
        };
        // Reap the child even when the pipe broke
        let status = child.wait().map_err(|e| spawn_error(script, e))?;
        let collected = pumped.map_err(|e| spawn_error(script, e))?;

        Ok(Execution {
            status: status.code().unwrap_or(SIGNALED),
            output: String::from_utf8_lossy(&collected).into_owned(),
        })
    }
}

/// Copy `reader` into `writer` until EOF, returning everything read.
fn tee(mut reader: impl Read, mut writer: impl Write) -> io::Result<Vec<u8>> {
    let mut collected = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(collected),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        collected.extend_from_slice(&buf[..n]);
        // The user still sees the output if our stdout is gone
        let _ = writer.write_all(&buf[..n]).and_then(|_| writer.flush());
    }
}
