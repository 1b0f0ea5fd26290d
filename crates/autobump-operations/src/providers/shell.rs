use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::Result;
use crate::error::OperationError;
use crate::traits::CommandRunner;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs commands through `bash -c`, returning stdout followed by stderr.
///
/// The timeout covers the whole hook, including any process it leaves
/// behind holding its output pipes.
pub struct ShellCommandRunner {
    shell: PathBuf,
}

impl ShellCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shell: PathBuf::from("bash"),
        }
    }

    #[must_use]
    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }
}

impl Default for ShellCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

fn drain(
    pipe: Option<impl Read + Send + 'static>,
    stream: Stream,
    sender: &Sender<(Stream, Vec<u8>)>,
) {
    if let Some(mut pipe) = pipe {
        let sender = sender.clone();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = sender.send((stream, buf));
        });
    }
}

/// Waits for both pipes to close, or returns `None` once `deadline` passes.
fn collect(receiver: &Receiver<(Stream, Vec<u8>)>, deadline: Instant) -> Option<String> {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match receiver.recv_timeout(remaining) {
            Ok((Stream::Stdout, buf)) => stdout = buf,
            Ok((Stream::Stderr, buf)) => stderr = buf,
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => return None,
        }
    }

    let mut output = String::from_utf8_lossy(&stdout).into_owned();
    output.push_str(&String::from_utf8_lossy(&stderr));
    Some(output)
}

impl CommandRunner for ShellCommandRunner {
    fn run(&self, command: &str, timeout: Duration) -> Result<String> {
        let spawn_error = |source| OperationError::HookSpawn {
            command: command.to_string(),
            source,
        };

        let mut child = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        let timed_out = || {
            warn!(command, timeout_secs = timeout.as_secs(), "version hook timed out");
            OperationError::HookTimeout {
                command: command.to_string(),
                timeout,
            }
        };

        // Drain both pipes while polling; a full pipe buffer stalls the hook.
        let (sender, receiver) = mpsc::channel();
        drain(child.stdout.take(), Stream::Stdout, &sender);
        drain(child.stderr.take(), Stream::Stderr, &sender);
        drop(sender);

        let deadline = Instant::now() + timeout;
        let status = loop {
            if let Some(status) = child.try_wait().map_err(spawn_error)? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(timed_out());
            }
            thread::sleep(POLL_INTERVAL);
        };

        // Background processes started by the hook keep the pipes open.
        let output = collect(&receiver, deadline).ok_or_else(timed_out)?;
        debug!(command, %status, "version hook finished");

        if !status.success() {
            return Err(OperationError::HookFailed {
                command: command.to_string(),
                status: status.to_string(),
                output: output.trim().to_string(),
            });
        }

        Ok(output)
    }
}
