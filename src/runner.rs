//! # Subprocess Runner
//!
//! `OptimizerRunner` is the seam between the dispatcher and the operating
//! system. `ProcessRunner` spawns the real optimizer with tokio; tests plug
//! in their own runner and never fork.

use crate::error::CompressError;
use std::future::Future;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;

/// Captured outcome of one optimizer run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubprocessResult {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl SubprocessResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).trim_end().to_string()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim_end().to_string()
    }
}

/// Runs the optimizer and waits for it to finish
pub trait OptimizerRunner {
    fn run(
        &self,
        program: &Path,
        args: &[String],
    ) -> impl Future<Output = Result<SubprocessResult, CompressError>> + Send;
}

/// Spawns the optimizer as a real child process
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl OptimizerRunner for ProcessRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<SubprocessResult, CompressError> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            // Dropping the future on timeout must not leave oxipng running
            .kill_on_drop(true);

        let start_time = Instant::now();
        let output = command.output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, output)
                .await
                .map_err(|_| CompressError::Timeout(limit))?,
            None => output.await,
        }
        .map_err(|source| CompressError::Launch {
            program: program.to_path_buf(),
            source,
        })?;

        debug!("{} finished in {:?} with {}", program.display(), start_time.elapsed(), output.status);

        Ok(SubprocessResult {
            exit_code: exit_code(output.status),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Exit code of a finished process; a signal death maps to 128 + signal
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::args;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_captures_output_and_code() {
        let runner = ProcessRunner::default();
        let result = runner
            .run(
                Path::new("/bin/sh"),
                &args!["-c", "echo out; echo err >&2; exit 3"],
            )
            .await
            .unwrap();

        assert_eq!(result.exit_code, 3);
        assert!(!result.success());
        assert_eq!(result.stdout_text(), "out");
        assert_eq!(result.stderr_text(), "err");
    }

    #[tokio::test]
    async fn test_missing_program_is_launch_error() {
        let runner = ProcessRunner::default();
        let err = runner
            .run(&PathBuf::from("/nonexistent/oxipng"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, CompressError::Launch { .. }));
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let runner = ProcessRunner::new(Some(Duration::from_millis(200)));
        let start = Instant::now();
        let err = runner
            .run(Path::new("/bin/sh"), &args!["-c", "sleep 30"])
            .await
            .unwrap_err();

        assert!(matches!(err, CompressError::Timeout(_)));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_signal_exit_code() {
        let runner = ProcessRunner::default();
        let result = runner
            .run(Path::new("/bin/sh"), &args!["-c", "kill -9 $$"])
            .await
            .unwrap();
        assert_eq!(result.exit_code, 128 + 9);
    }
}
