//! Subprocess execution.
//!
//! Every repository operation in this crate shells out through [`run`]. A call
//! spawns the command in the given working directory, waits for it, and
//! collects the whole of stdout and stderr. There is no retry and no timeout
//! here; callers that need bounded latency wrap the future themselves.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::ProcessError;

/// The version-control executable every git helper invokes.
pub const GIT: &str = "git";

/// Run `command args...` inside `cwd`.
///
/// Resolves with the trimmed standard output when the exit status is 0.
/// Otherwise fails with the exit status and the trimmed standard error. A
/// process that cannot be spawned (missing binary, missing working
/// directory) fails with [`ProcessError::SPAWN_FAILURE`] and the OS error
/// text in place of stderr.
pub async fn run<I, S>(command: &str, args: I, cwd: &Path) -> Result<String, ProcessError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let stdout = run_raw(command, args, cwd).await?;
    Ok(stdout.trim().to_string())
}

/// Like [`run`], but hands back standard output exactly as written. Use it
/// for NUL-separated output, where surrounding whitespace belongs to a path.
#[instrument(skip(args), fields(cwd = %cwd.display()))]
pub async fn run_raw<I, S>(command: &str, args: I, cwd: &Path) -> Result<String, ProcessError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<OsString> = args
        .into_iter()
        .map(|arg| arg.as_ref().to_os_string())
        .collect();
    let rendered = describe(command, &args);

    let mut cmd = Command::new(command);
    cmd.args(&args)
        .current_dir(cwd)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(command = %rendered, "spawning");

    let output = match cmd.output().await {
        Ok(output) => output,
        Err(e) => {
            debug!(command = %rendered, error = %e, "failed to spawn");
            return Err(ProcessError {
                command: rendered,
                exit_code: ProcessError::SPAWN_FAILURE,
                stderr: e.to_string(),
            });
        }
    };

    if !output.status.success() {
        let exit_code = output.status.code().unwrap_or(ProcessError::SPAWN_FAILURE);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        debug!(command = %rendered, exit_code, %stderr, "command failed");
        return Err(ProcessError {
            command: rendered,
            exit_code,
            stderr,
        });
    }

    debug!(command = %rendered, "command succeeded");
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run `git args...` inside `cwd`.
pub async fn git<I, S>(args: I, cwd: &Path) -> Result<String, ProcessError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run(GIT, args, cwd).await
}

/// Run `git args...` inside `cwd`, keeping stdout untrimmed.
pub async fn git_raw<I, S>(args: I, cwd: &Path) -> Result<String, ProcessError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_raw(GIT, args, cwd).await
}

/// Split command output into its non-blank lines.
pub fn output_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn describe(command: &str, args: &[OsString]) -> String {
    let mut rendered = command.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&arg.to_string_lossy());
    }
    rendered
}
