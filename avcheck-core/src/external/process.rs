//! Bounded execution of external commands.
//!
//! Commands are spawned with piped output that is drained on reader threads,
//! so a chatty child never blocks on a full pipe. The parent polls for exit
//! until the deadline and kills the child once it passes.

use crate::error::{CoreResult, command_failed_error, command_start_error, timeout_error};
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Captured result of a command that exited successfully.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Child process that is killed and reaped when dropped unless it already exited.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        let status = self.child.try_wait()?;
        if status.is_some() {
            self.reaped = true;
        }
        Ok(status)
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Renders a command as a single shell-like line for logging.
pub fn describe_command(cmd: &Command) -> String {
    let mut line = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

/// Joins a reader thread, or returns `None` if it is still running at `deadline`.
///
/// A reader outlives the child when a grandchild inherited the pipe. It is left
/// detached in that case.
fn collect(reader: Option<JoinHandle<Vec<u8>>>, deadline: Option<Instant>) -> Option<String> {
    let Some(handle) = reader else {
        return Some(String::new());
    };
    while !handle.is_finished() {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return None;
        }
        thread::sleep(POLL_INTERVAL);
    }
    let bytes = handle.join().unwrap_or_default();
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Runs `cmd` to completion, failing with a timeout error once `timeout` elapses.
///
/// `label` names the command in errors and logs. A non-zero exit becomes a
/// subprocess error carrying the trimmed stderr text.
pub fn run_command(
    cmd: &mut Command,
    label: &str,
    timeout: Option<Duration>,
) -> CoreResult<CommandOutput> {
    log::debug!("Running: {}", describe_command(cmd));

    let child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| command_start_error(label, e))?;
    let mut guard = ChildGuard {
        child,
        reaped: false,
    };

    let stdout_reader = guard.child.stdout.take().map(spawn_reader);
    let stderr_reader = guard.child.stderr.take().map(spawn_reader);

    let started = Instant::now();
    let status = loop {
        match guard.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(e) => return Err(e.into()),
        }
        if let Some(limit) = timeout {
            if started.elapsed() >= limit {
                // Readers are left detached; they finish once the killed child's pipes close.
                log::warn!("{} exceeded {:?}, killing it", label, limit);
                return Err(timeout_error(label, limit));
            }
        }
        thread::sleep(POLL_INTERVAL);
    };

    let deadline = timeout.map(|limit| started + limit);
    let (Some(stdout), Some(stderr)) = (
        collect(stdout_reader, deadline),
        collect(stderr_reader, deadline),
    ) else {
        let limit = timeout.unwrap_or_default();
        log::warn!("{} exited but its output stayed open past {:?}", label, limit);
        return Err(timeout_error(label, limit));
    };

    if !status.success() {
        let stderr = stderr.trim();
        let message = if stderr.is_empty() {
            status.to_string()
        } else {
            format!("{}: {}", status, stderr)
        };
        log::error!("{} failed: {}", label, message);
        return Err(command_failed_error(label, message));
    }

    log::debug!("{} finished in {:?}", label, started.elapsed());
    Ok(CommandOutput {
        status,
        stdout,
        stderr,
    })
}
