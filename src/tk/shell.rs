//! Bridge to the toolkit interpreter process
//!
//! Commands flow out as carriage-return-terminated lines on stdin; widget
//! callbacks flow back as `Event ...` lines on stdout. Every operation
//! against a dead interpreter degrades to a no-op result; the caller decides
//! when repeated failure is fatal.

use std::io::Write;
use std::process::{Child, ChildStdin, Command, Stdio};

use anyhow::{Context, Result};
use nix::poll::PollTimeout;
use tracing::{debug, trace};

use super::callback::TkCallback;
use crate::common::pipe::PipeReader;
use crate::constants::timing;

pub struct TkShell {
    child: Child,
    stdin: Option<ChildStdin>,
    pipe: PipeReader,
}

impl TkShell {
    /// Launch the interpreter and prepare the implicit root window: load the
    /// toolkit package and withdraw `.` so only explicit windows appear.
    pub fn spawn(program: &str, args: &[&str]) -> Result<Self> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to run {program:?}"))?;
        let stdin = child.stdin.take().context("interpreter has no stdin pipe")?;
        let stdout = child
            .stdout
            .take()
            .context("interpreter has no stdout pipe")?;

        let mut shell = Self {
            child,
            stdin: Some(stdin),
            pipe: PipeReader::new(stdout)?,
        };
        shell.execute("package require Tk");
        shell.execute("wm withdraw .");
        Ok(shell)
    }

    fn is_active(&mut self) -> bool {
        self.stdin.is_some() && matches!(self.child.try_wait(), Ok(None))
    }

    /// False once the interpreter has exited (or was closed). Individual
    /// operations already degrade to no-ops; this lets the daemon loop treat
    /// a vanished interpreter as fatal instead of spinning silently.
    pub fn is_running(&mut self) -> bool {
        self.is_active()
    }

    /// Send one command line. Returns false (without writing) when the
    /// interpreter is gone.
    pub fn execute(&mut self, command: &str) -> bool {
        if !self.is_active() {
            return false;
        }
        trace!(command, "toolkit command");
        let Some(stdin) = self.stdin.as_mut() else {
            return false;
        };
        let mut line = command.as_bytes().to_vec();
        line.push(b'\r');
        match stdin.write_all(&line).and_then(|()| stdin.flush()) {
            Ok(()) => true,
            Err(err) => {
                debug!(error = %err, "interpreter write failed");
                false
            }
        }
    }

    /// Print-wrapped synchronous read: waits for the interpreter's reply and
    /// drains until the pipe goes quiet. This is the only blocking call in
    /// the system and is reserved for property reads. A dead interpreter
    /// yields an empty string.
    pub fn query(&mut self, expression: &str) -> String {
        if !self.execute(&format!("puts [{expression}]")) {
            return String::new();
        }
        self.pipe
            .drain(PollTimeout::NONE, PollTimeout::from(timing::DRAIN_IDLE_MS));
        self.pipe.take_text()
    }

    /// One non-blocking read cycle; decodes whichever callback lines arrived.
    /// Lines that are not callbacks (or malformed ones) are dropped.
    pub fn pump(&mut self) -> Vec<TkCallback> {
        if !self.is_active() {
            return Vec::new();
        }
        self.pipe.drain(
            PollTimeout::from(timing::POLL_WAIT_MS),
            PollTimeout::from(timing::DRAIN_IDLE_MS),
        );
        self.pipe
            .take_lines()
            .iter()
            .filter(|line| line.starts_with("Event"))
            .filter_map(|line| TkCallback::decode(line))
            .collect()
    }

    /// Ask the interpreter to quit and reap it. Closing stdin doubles as an
    /// end-of-input signal for interpreters that ignore the exit command.
    pub fn close(&mut self) {
        if self.is_active() {
            self.execute("exit");
        }
        self.stdin = None;
        let _ = self.child.wait();
    }
}

impl Drop for TkShell {
    fn drop(&mut self) {
        self.close();
    }
}
