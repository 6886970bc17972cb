//! Build tool invocation.
//!
//! Every invocation carries its own working directory and environment
//! overlay. The verifier never mutates its own process environment.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use stencil_common_log::spans;
use tokio::process::Command;
use tracing::{debug, Instrument};

use crate::error::{VerifyError, VerifyResult};

/// One call of the build tool.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Directory the tool runs in.
    pub working_dir: PathBuf,
    /// Target to build; `None` builds the default target.
    pub target: Option<String>,
    /// Variables added to the inherited environment for this call only.
    pub env_vars: BTreeMap<String, String>,
}

impl Invocation {
    /// Default-target invocation in `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            target: None,
            env_vars: BTreeMap::new(),
        }
    }

    /// Build `target` instead of the default target.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Add an environment variable for this invocation.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }
}

/// Captured result of one invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code, or -1 when the process was killed by a signal.
    pub exit_code: i32,
    /// Captured stdout.
    pub stdout: String,
    /// Captured stderr.
    pub stderr: String,
    /// Wall-clock time spent.
    pub duration: Duration,
}

impl ToolOutput {
    /// Whether the tool exited with status zero.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs the configured build tool.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    program: String,
    timeout: Option<Duration>,
}

impl ToolRunner {
    /// Runner for `program` with no timeout.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Kill the tool and fail after `timeout`.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Program name or path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Shell-like rendering of an invocation, e.g. `DEBUG=1 make clean`.
    pub fn describe(&self, invocation: &Invocation) -> String {
        let mut parts: Vec<String> = invocation
            .env_vars
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        parts.push(self.program.clone());
        parts.extend(invocation.target.clone());
        parts.join(" ")
    }

    /// Run the tool and capture its output, whatever the exit status.
    pub async fn run(&self, invocation: &Invocation) -> VerifyResult<ToolOutput> {
        let command = self.describe(invocation);
        let span = spans::command_span(&self.program, invocation.target.as_deref().unwrap_or(""));
        self.run_inner(invocation, command).instrument(span).await
    }

    async fn run_inner(&self, invocation: &Invocation, command: String) -> VerifyResult<ToolOutput> {
        let start = Instant::now();

        let mut cmd = Command::new(&self.program);
        cmd.args(invocation.target.iter())
            .current_dir(&invocation.working_dir)
            .envs(&invocation.env_vars)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(%command, dir = %invocation.working_dir.display(), "running build tool");

        let child = cmd.spawn().map_err(|source| VerifyError::Spawn {
            command: command.clone(),
            source,
        })?;

        let output = match self.timeout {
            None => child.wait_with_output().await?,
            Some(timeout) => match tokio::time::timeout(timeout, child.wait_with_output()).await {
                Ok(output) => output?,
                // dropping the future drops the child, which kills it
                Err(_) => return Err(VerifyError::Timeout { command, timeout }),
            },
        };

        let result = ToolOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration: start.elapsed(),
        };

        debug!(
            exit_code = result.exit_code,
            duration_ms = result.duration.as_millis() as u64,
            "build tool finished"
        );

        Ok(result)
    }

    /// Run the tool and fail on a non-zero exit.
    pub async fn run_checked(&self, invocation: &Invocation) -> VerifyResult<ToolOutput> {
        let output = self.run(invocation).await?;

        if !output.success() {
            return Err(VerifyError::ProcessFailed {
                command: self.describe(invocation),
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }

        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn fake_tool(dir: &Path, body: &str) -> ToolRunner {
        let path = dir.join("fake-make");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        ToolRunner::new(path.to_string_lossy().into_owned())
    }

    #[test]
    fn test_describe() {
        let runner = ToolRunner::new("make");
        let inv = Invocation::new("/tmp").target("clean").env("DEBUG", "1");
        assert_eq!(runner.describe(&inv), "DEBUG=1 make clean");
        assert_eq!(runner.describe(&Invocation::new("/tmp")), "make");
    }

    #[tokio::test]
    async fn test_target_and_env_reach_the_tool() {
        let dir = tempfile::tempdir().unwrap();
        let runner = fake_tool(dir.path(), r#"echo "target=$1 flag=$STENCIL_RUNNER_FLAG""#);

        let inv = Invocation::new(dir.path()).target("docs").env("STENCIL_RUNNER_FLAG", "1");
        let output = runner.run_checked(&inv).await.unwrap();

        assert_eq!(output.stdout.trim(), "target=docs flag=1");
        assert!(std::env::var("STENCIL_RUNNER_FLAG").is_err());
    }

    #[tokio::test]
    async fn test_runs_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let runner = fake_tool(dir.path(), "pwd");

        let output = runner.run(&Invocation::new(dir.path())).await.unwrap();
        let reported = std::fs::canonicalize(output.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[tokio::test]
    async fn test_nonzero_exit_fails_checked_run() {
        let dir = tempfile::tempdir().unwrap();
        let runner = fake_tool(dir.path(), "echo 'no rule' >&2; exit 2");

        let output = runner.run(&Invocation::new(dir.path())).await.unwrap();
        assert_eq!(output.exit_code, 2);

        let err = runner
            .run_checked(&Invocation::new(dir.path()).target("clean"))
            .await
            .unwrap_err();
        match err {
            VerifyError::ProcessFailed { command, exit_code, stderr } => {
                assert!(command.ends_with("fake-make clean"));
                assert_eq!(exit_code, 2);
                assert_eq!(stderr.trim(), "no rule");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ToolRunner::new("stencil-no-such-build-tool");

        let err = runner.run(&Invocation::new(dir.path())).await.unwrap_err();
        assert!(matches!(err, VerifyError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let runner = fake_tool(dir.path(), "sleep 5")
            .timeout(Some(Duration::from_millis(100)));

        let err = runner.run(&Invocation::new(dir.path())).await.unwrap_err();
        assert!(matches!(err, VerifyError::Timeout { .. }));
    }
}
