//! Running external validator executables.
//!
//! A validator built against candidate kernels reports through its exit code:
//! any nonzero code is a pass, zero is a fail. The probe runs such an
//! executable with a deadline and turns the outcome into a [`Verdict`].
//!
//! # Graceful Degradation
//!
//! - Spawn failure: returned as `RefcheckError::Command`
//! - Deadline exceeded: the child is killed and the probe reports `timed_out`
//! - Killed by a signal: no exit code, judged as a fail

use crate::validators::Verdict;
use crate::RefcheckError;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Deadline used when none is given
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 1000;

const POLL_INTERVAL: Duration = Duration::from_millis(5);
const DRAIN_GRACE: Duration = Duration::from_millis(200);

/// What to run and for how long
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub executable: PathBuf,
    pub args: Vec<String>,
    pub timeout_ms: u64,
}

impl ProbeRequest {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        ProbeRequest {
            executable: executable.into(),
            args: Vec::new(),
            timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Command line for messages
    pub fn display(&self) -> String {
        std::iter::once(self.executable.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How an external validator run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Exit code, None if killed by a signal or the deadline
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl ProbeOutcome {
    /// Nonzero exit is a pass; zero, signals and timeouts are failures
    pub fn verdict(&self) -> Verdict {
        match self.exit_code {
            Some(code) if !self.timed_out => Verdict::from_harness_code(code),
            _ => Verdict::Fail,
        }
    }
}

/// Run an external validator and wait for it, at most `timeout_ms`.
pub fn run_probe(request: &ProbeRequest) -> Result<ProbeOutcome, RefcheckError> {
    let start = Instant::now();
    let deadline = Duration::from_millis(request.timeout_ms);

    let mut child = spawn(&request.executable, &request.args)?;
    debug!(command = %request.display(), pid = child.id(), "probe started");

    let stdout = PipeReader::capture(child.stdout.take());
    let stderr = PipeReader::capture(child.stderr.take());

    let (exit_code, timed_out) = loop {
        match child.try_wait() {
            Ok(Some(status)) => break (status.code(), false),
            Ok(None) if start.elapsed() >= deadline => {
                warn!(command = %request.display(), timeout_ms = request.timeout_ms, "probe deadline exceeded, killing");
                let _ = child.kill();
                let _ = child.wait();
                break (None, true);
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                return Err(RefcheckError::Command {
                    command: request.display(),
                    message: e.to_string(),
                });
            }
        }
    };
    let duration_ms = start.elapsed().as_millis() as u64;

    Ok(ProbeOutcome {
        exit_code,
        timed_out,
        stdout: stdout.finish(),
        stderr: stderr.finish(),
        duration_ms,
    })
}

fn spawn(executable: &Path, args: &[String]) -> Result<Child, RefcheckError> {
    Command::new(executable)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| RefcheckError::Command {
            command: executable.display().to_string(),
            message: e.to_string(),
        })
}

/// Drains a child pipe on its own thread.
///
/// Grandchildren can keep a pipe open after the child is gone, so
/// [`PipeReader::finish`] waits at most [`DRAIN_GRACE`] and returns what arrived.
struct PipeReader {
    buffer: Arc<Mutex<Vec<u8>>>,
    done: mpsc::Receiver<()>,
}

impl PipeReader {
    fn capture<R: Read + Send + 'static>(pipe: Option<R>) -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let (tx, done) = mpsc::channel();

        if let Some(mut pipe) = pipe {
            let sink = Arc::clone(&buffer);
            thread::spawn(move || {
                let mut chunk = [0u8; 4096];
                loop {
                    match pipe.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            if let Ok(mut buf) = sink.lock() {
                                buf.extend_from_slice(&chunk[..n]);
                            }
                        }
                    }
                }
                let _ = tx.send(());
            });
        }

        PipeReader { buffer, done }
    }

    fn finish(self) -> String {
        let _ = self.done.recv_timeout(DRAIN_GRACE);
        let bytes = self.buffer.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}
