//! Child-process probing with captured output and optional timeout.
//!
//! A probe is a single invocation of an external executable with a fixed
//! argument set. Exit status is data: a non-zero exit comes back as a
//! [`ProbeOutcome::Completed`] and the caller branches on it. Only two
//! conditions are reported as distinct outcomes: the process could not be
//! started at all ([`ProbeOutcome::LaunchFailure`]), or a bounded run
//! exceeded its budget ([`ProbeOutcome::TimedOut`]).

use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use tracing::debug;
use wait_timeout::ChildExt;

/// Captured streams and exit status of a completed probe.
#[derive(Debug, Clone)]
pub struct ProbeOutput {
    /// Captured standard output, lossily decoded as UTF-8.
    pub stdout: String,
    /// Captured standard error, lossily decoded as UTF-8.
    pub stderr: String,
    /// Exit code, or `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl ProbeOutput {
    /// True when the process exited with status zero.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Result of one probe invocation.
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    /// The process ran to completion (any exit status).
    Completed(ProbeOutput),
    /// A bounded run exceeded its time budget and was killed.
    TimedOut,
    /// The process could not be started (not found, not executable).
    LaunchFailure(String),
}

/// Runs external executables, directly or through a shell.
///
/// The shell path is held here so the shell dependency stays isolated: the
/// completion query needs a real bash (`compgen` is a builtin), and tests
/// can point at a nonexistent shell to exercise the launch-failure path.
#[derive(Debug, Clone)]
pub struct Probe {
    shell: PathBuf,
}

impl Default for Probe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe {
    /// Creates a probe using `/bin/bash` for shell-interpreted runs.
    pub fn new() -> Self {
        Self {
            shell: PathBuf::from("/bin/bash"),
        }
    }

    /// Creates a probe with an explicit shell path.
    pub fn with_shell(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Spawns `program` with `args` directly (no shell) and waits for it.
    pub fn run(&self, program: &str, args: &[&str]) -> ProbeOutcome {
        debug!(program, ?args, "probing");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) => ProbeOutcome::Completed(ProbeOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code: output.status.code(),
            }),
            Err(e) => {
                debug!(program, error = %e, "failed to spawn");
                ProbeOutcome::LaunchFailure(format!("{program}: {e}"))
            }
        }
    }

    /// Runs `script` through the shell (`<shell> -c script`), unbounded.
    pub fn run_shell(&self, script: &str) -> ProbeOutcome {
        let shell = self.shell.to_string_lossy().into_owned();
        self.run(&shell, &["-c", script])
    }

    /// Runs `script` through the shell with a time budget.
    ///
    /// On expiry the child is killed and reaped and the outcome is
    /// [`ProbeOutcome::TimedOut`].
    pub fn run_shell_timed(&self, script: &str, timeout: Duration) -> ProbeOutcome {
        debug!(script, ?timeout, "probing via shell");
        let spawned = Command::new(&self.shell)
            .arg("-c")
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                debug!(shell = %self.shell.display(), error = %e, "failed to spawn shell");
                return ProbeOutcome::LaunchFailure(format!(
                    "{}: {e}",
                    self.shell.display()
                ));
            }
        };

        // Drain stdout and stderr in background threads to prevent
        // deadlock when the child's pipe buffer fills before it exits.
        let stdout_thread = child.stdout.take().map(drain_pipe);
        let stderr_thread = child.stderr.take().map(drain_pipe);

        match child.wait_timeout(timeout) {
            Ok(Some(status)) => {
                let stdout_buf = match join_drained(stdout_thread) {
                    Ok(buf) => buf,
                    Err(e) => {
                        return ProbeOutcome::LaunchFailure(format!("stdout read failed: {e}"));
                    }
                };
                let stderr_buf = match join_drained(stderr_thread) {
                    Ok(buf) => buf,
                    Err(e) => {
                        return ProbeOutcome::LaunchFailure(format!("stderr read failed: {e}"));
                    }
                };
                ProbeOutcome::Completed(ProbeOutput {
                    stdout: String::from_utf8_lossy(&stdout_buf).into_owned(),
                    stderr: String::from_utf8_lossy(&stderr_buf).into_owned(),
                    exit_code: status.code(),
                })
            }
            Ok(None) => {
                debug!(script, ?timeout, "shell run timed out, killing process");
                let _ = child.kill();
                let _ = child.wait(); // reap the zombie
                ProbeOutcome::TimedOut
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                ProbeOutcome::LaunchFailure(format!("wait failed: {e}"))
            }
        }
    }
}

type DrainHandle = std::thread::JoinHandle<(Vec<u8>, std::io::Result<usize>)>;

fn drain_pipe<R: Read + Send + 'static>(pipe: R) -> DrainHandle {
    std::thread::spawn(move || {
        let mut pipe = pipe;
        let mut buf = Vec::new();
        let result = pipe.read_to_end(&mut buf);
        (buf, result)
    })
}

fn join_drained(handle: Option<DrainHandle>) -> Result<Vec<u8>, String> {
    let Some(handle) = handle else {
        return Ok(Vec::new());
    };
    match handle.join() {
        Ok((buf, Ok(_))) => Ok(buf),
        Ok((_, Err(e))) => Err(e.to_string()),
        Err(_) => Err("reader thread panicked".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_and_zero_exit() {
        let outcome = Probe::new().run("sh", &["-c", "printf hello"]);
        let ProbeOutcome::Completed(output) = outcome else {
            panic!("expected completion, got {outcome:?}");
        };
        assert!(output.success());
        assert_eq!(output.stdout, "hello");
        assert_eq!(output.stderr, "");
    }

    #[test]
    fn nonzero_exit_is_completion_not_failure() {
        let outcome = Probe::new().run("sh", &["-c", "echo oops >&2; exit 3"]);
        let ProbeOutcome::Completed(output) = outcome else {
            panic!("expected completion, got {outcome:?}");
        };
        assert!(!output.success());
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[test]
    fn missing_executable_is_a_launch_failure() {
        let outcome = Probe::new().run("/no/such/executable", &[]);
        assert!(matches!(outcome, ProbeOutcome::LaunchFailure(_)));
    }

    #[test]
    fn shell_run_captures_pipeline_output() {
        let outcome = Probe::new().run_shell("printf 'b\\na\\n' | sort");
        let ProbeOutcome::Completed(output) = outcome else {
            panic!("expected completion, got {outcome:?}");
        };
        assert!(output.success());
        assert_eq!(output.stdout, "a\nb\n");
    }

    #[test]
    fn timed_run_reports_timeout_distinctly() {
        let outcome = Probe::new().run_shell_timed("sleep 5", Duration::from_millis(100));
        assert!(matches!(outcome, ProbeOutcome::TimedOut));
    }

    #[test]
    fn timed_run_within_budget_completes() {
        let outcome = Probe::new().run_shell_timed("printf fast", Duration::from_secs(5));
        let ProbeOutcome::Completed(output) = outcome else {
            panic!("expected completion, got {outcome:?}");
        };
        assert_eq!(output.stdout, "fast");
    }

    #[test]
    fn timed_run_drains_output_larger_than_pipe_buffer() {
        // Output well past the kernel pipe capacity must not stall the
        // child and get misreported as a timeout.
        let outcome = Probe::new().run_shell_timed(
            "head -c 200000 /dev/zero | tr '\\0' 'a'",
            Duration::from_secs(5),
        );
        let ProbeOutcome::Completed(output) = outcome else {
            panic!("expected completion, got {outcome:?}");
        };
        assert!(output.success());
        assert_eq!(output.stdout.len(), 200_000);
        assert!(output.stdout.bytes().all(|b| b == b'a'));
    }

    #[test]
    fn missing_shell_is_a_launch_failure() {
        let probe = Probe::with_shell("/no/such/shell");
        assert!(matches!(
            probe.run_shell("true"),
            ProbeOutcome::LaunchFailure(_)
        ));
        assert!(matches!(
            probe.run_shell_timed("true", Duration::from_secs(1)),
            ProbeOutcome::LaunchFailure(_)
        ));
    }
}
