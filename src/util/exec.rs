//! Helpers for shelling out to external tools.

use std::io::{ErrorKind, Read};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use slog_scope::{trace, warn};

use crate::errors::*;

/// How often a running child is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Run `program` with `args` and return its trimmed standard output.
///
/// The child is killed once `timeout` elapses. Standard output and error are
/// drained on their own threads while the child runs.
pub fn run_with_timeout(program: &str, args: &[&str], timeout: Duration) -> Result<String> {
    let command = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    trace!("{:?}", &cmd);

    let mut child = cmd.spawn().map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::DependencyUnavailable(program.to_string()),
        _ => Error::Subprocess {
            command: command.clone(),
            reason: e.to_string(),
        },
    })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                if let Err(e) = child.kill() {
                    warn!("failed to kill '{}': {}", command, e);
                }
                let _ = child.wait();
                return Err(Error::Timeout { command, timeout });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                return Err(Error::Subprocess {
                    command,
                    reason: e.to_string(),
                })
            }
        }
    };

    let stdout = collect(stdout);
    let stderr = collect(stderr);
    if !status.success() {
        let stderr = String::from_utf8_lossy(&stderr);
        return Err(Error::Subprocess {
            command,
            reason: format!("{}: {}", status, stderr.trim()),
        });
    }

    let stdout = String::from_utf8(stdout).map_err(|e| Error::Subprocess {
        command,
        reason: format!("non UTF-8 output: {e}"),
    })?;
    Ok(stdout.trim().to_string())
}

/// Read a child pipe to the end on a background thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            if let Err(e) = pipe.read_to_end(&mut buf) {
                warn!("failed to read child output: {}", e);
            }
            buf
        })
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_run_success() {
        let out = run_with_timeout("echo", &["ls", "-q"], TIMEOUT).unwrap();
        assert_eq!(out, "ls -q");
    }

    #[test]
    fn test_run_large_output() {
        // well past the pipe buffer size
        let out = run_with_timeout("seq", &["1", "200000"], TIMEOUT).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 200000);
        assert_eq!(lines[0], "1");
        assert_eq!(lines[199999], "200000");
    }

    #[test]
    fn test_run_failure_stderr() {
        match run_with_timeout("ls", &["/this/path/does/not/exist"], TIMEOUT) {
            Err(Error::Subprocess { reason, .. }) => {
                assert!(reason.contains("/this/path/does/not/exist"))
            }
            x => panic!("unexpected result: {x:?}"),
        }
    }

    #[test]
    fn test_run_failure() {
        match run_with_timeout("false", &[], TIMEOUT) {
            Err(Error::Subprocess { command, .. }) => assert_eq!(command, "false"),
            x => panic!("unexpected result: {x:?}"),
        }
    }

    #[test]
    fn test_missing_binary() {
        let res = run_with_timeout("this-binary-does-not-exist-anywhere", &["ls"], TIMEOUT);
        assert!(matches!(res, Err(Error::DependencyUnavailable(_))));
    }

    #[test]
    fn test_run_timeout() {
        let res = run_with_timeout("sleep", &["5"], Duration::from_millis(100));
        assert!(matches!(res, Err(Error::Timeout { .. })));
    }
}
