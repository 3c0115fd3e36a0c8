//! Non-blocking reads from child process pipes
//!
//! Both child processes (the event monitor and the toolkit interpreter) are
//! consumed through the same bounded poll-then-drain cycle: wait up to an
//! initial timeout for the first byte, then keep reading until the pipe stays
//! quiet for the idle window. The fd is switched to non-blocking mode so a
//! drain can never wedge the cooperative loop.

use std::io::Read;
use std::os::fd::AsFd;
use std::process::ChildStdout;

use anyhow::{Context, Result};
use nix::fcntl::{FcntlArg, OFlag, fcntl};
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};

pub struct PipeReader {
    stdout: ChildStdout,
    pending: Vec<u8>,
}

impl PipeReader {
    pub fn new(stdout: ChildStdout) -> Result<Self> {
        let flags = fcntl(stdout.as_fd(), FcntlArg::F_GETFL)
            .context("failed to read pipe status flags")?;
        let flags = OFlag::from_bits_retain(flags) | OFlag::O_NONBLOCK;
        fcntl(stdout.as_fd(), FcntlArg::F_SETFL(flags))
            .context("failed to switch pipe to non-blocking mode")?;
        Ok(Self {
            stdout,
            pending: Vec::new(),
        })
    }

    /// Wait until the pipe has data (or hung up). Interrupted or failed polls
    /// count as "nothing to read" so the caller's tick simply comes around
    /// again.
    fn wait_readable(&self, timeout: PollTimeout) -> bool {
        let mut fds = [PollFd::new(self.stdout.as_fd(), PollFlags::POLLIN)];
        match poll(&mut fds, timeout) {
            Ok(ready) => ready > 0,
            Err(_) => false,
        }
    }

    /// Move everything currently buffered in the pipe into `pending`.
    fn fill(&mut self) -> usize {
        let mut total = 0;
        let mut chunk = [0u8; 4096];
        loop {
            match self.stdout.read(&mut chunk) {
                Ok(0) => break,
                Ok(count) => {
                    self.pending.extend_from_slice(&chunk[..count]);
                    total += count;
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        total
    }

    /// One poll cycle: wait up to `initial` for data, then drain until the
    /// pipe stays quiet for `idle`. Returns the number of bytes collected.
    pub fn drain(&mut self, initial: PollTimeout, idle: PollTimeout) -> usize {
        if !self.wait_readable(initial) {
            return 0;
        }
        let mut total = 0;
        loop {
            let added = self.fill();
            total += added;
            if added == 0 {
                // Readable but nothing to read: the writer hung up.
                break;
            }
            if !self.wait_readable(idle) {
                break;
            }
        }
        total
    }

    /// Take the complete lines collected so far, terminators stripped.
    /// A trailing partial line stays buffered for the next cycle.
    pub fn take_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Take everything collected so far as text, complete lines or not.
    pub fn take_text(&mut self) -> String {
        String::from_utf8_lossy(&std::mem::take(&mut self.pending)).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::{Command, Stdio};

    fn reader_for(mut command: Command) -> (std::process::Child, PipeReader) {
        let mut child = command
            .stdout(Stdio::piped())
            .spawn()
            .expect("failed to spawn test child");
        let stdout = child.stdout.take().unwrap();
        (child, PipeReader::new(stdout).unwrap())
    }

    #[test]
    fn test_drain_collects_lines() {
        let mut command = Command::new("echo");
        command.arg("one\ntwo");
        let (mut child, mut pipe) = reader_for(command);

        let mut collected = Vec::new();
        // The child may need a few ticks to produce its output.
        for _ in 0..50 {
            pipe.drain(PollTimeout::from(100u16), PollTimeout::from(50u16));
            collected.extend(pipe.take_lines());
            if collected.len() >= 2 {
                break;
            }
        }
        assert_eq!(collected, vec!["one".to_string(), "two".to_string()]);
        let _ = child.wait();
    }

    #[test]
    fn test_partial_line_stays_buffered() {
        let mut command = Command::new("printf");
        command.arg("head\nrest-without-newline");
        let (mut child, mut pipe) = reader_for(command);

        for _ in 0..50 {
            if pipe.drain(PollTimeout::from(100u16), PollTimeout::from(50u16)) == 0
                && !pipe.pending.is_empty()
            {
                break;
            }
        }
        assert_eq!(pipe.take_lines(), vec!["head".to_string()]);
        assert_eq!(pipe.take_text(), "rest-without-newline");
        let _ = child.wait();
    }
}
