// src/exec/command.rs

//! Helpers for running configured shell commands.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Combined result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    /// stdout followed by stderr, lossily decoded.
    pub combined: String,
}

/// Build a shell command appropriate for the platform.
pub fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    }
}

/// Run `cmd` to completion, capturing stdout and stderr.
///
/// If `stdin` is given it is written to the child and the pipe is closed.
pub async fn run_captured(
    cmd: &str,
    cwd: Option<&Path>,
    stdin: Option<&[u8]>,
) -> Result<CommandOutput> {
    let mut command = shell_command(cmd);
    command
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let mut child = command
        .spawn()
        .with_context(|| format!("spawning `{cmd}`"))?;

    // Feed stdin from a separate task so a chatty child cannot deadlock us
    // on a full stdout pipe. The pipe closes when the task ends.
    let writer = match (stdin, child.stdin.take()) {
        (Some(input), Some(mut pipe)) => {
            let input = input.to_vec();
            Some(tokio::spawn(async move { pipe.write_all(&input).await }))
        }
        _ => None,
    };

    let output = child
        .wait_with_output()
        .await
        .with_context(|| format!("waiting for `{cmd}`"))?;

    if let Some(writer) = writer {
        match writer.await {
            Ok(Ok(())) => {}
            // The child may exit without draining stdin.
            Ok(Err(err)) => debug!(cmd, error = %err, "stdin not fully consumed"),
            Err(err) => debug!(cmd, error = %err, "stdin writer task failed"),
        }
    }

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok(CommandOutput {
        success: output.status.success(),
        exit_code: output.status.code(),
        combined,
    })
}

/// Run `cmd` to completion with stdout/stderr inherited from this process.
pub async fn run_inherited(cmd: &str) -> Result<CommandOutput> {
    let status = shell_command(cmd)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .status()
        .await
        .with_context(|| format!("running `{cmd}`"))?;

    Ok(CommandOutput {
        success: status.success(),
        exit_code: status.code(),
        combined: String::new(),
    })
}
