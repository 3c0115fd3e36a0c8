//! Raw event stream framing
//!
//! The event monitor emits human-readable blocks terminated by a blank line.
//! Lines are normalized (whitespace runs collapsed, continuations joined)
//! and accumulated until the terminator closes the frame.

use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result};
use nix::poll::PollTimeout;

use super::xevent::XEvent;
use crate::common::pipe::PipeReader;
use crate::constants::{commands, timing};

/// Line-at-a-time frame assembler.
///
/// Partial frames persist across poll cycles, so a block split between two
/// reads is still decoded once its terminator arrives.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    frame: String,
}

impl FrameBuffer {
    /// Feed one line (terminator stripped). A blank line closes the current
    /// frame and may yield an event; frames without an event header decode
    /// to nothing.
    pub fn push_line(&mut self, line: &str) -> Option<XEvent> {
        if line.is_empty() {
            if self.frame.is_empty() {
                return None;
            }
            let frame = std::mem::take(&mut self.frame);
            return XEvent::decode(&frame);
        }

        let normalized = normalize(line);
        if !self.frame.is_empty() && !normalized.starts_with(' ') {
            self.frame.push(' ');
        }
        self.frame.push_str(&normalized);
        None
    }
}

/// Collapse every whitespace run to its first character and trim the end.
fn normalize(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_run = false;
    for ch in line.trim_end().chars() {
        if ch.is_whitespace() {
            if !in_run {
                out.push(ch);
            }
            in_run = true;
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}

/// Owns the root-window event monitor process and turns its output into
/// typed events, one bounded poll cycle at a time.
pub struct EventReader {
    child: Child,
    pipe: PipeReader,
    frames: FrameBuffer,
}

impl EventReader {
    pub fn spawn() -> Result<Self> {
        let mut child = Command::new(commands::XEV)
            .arg("-root")
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to run {:?}", commands::XEV))?;
        let stdout = child
            .stdout
            .take()
            .context("event monitor has no stdout pipe")?;
        Ok(Self {
            child,
            pipe: PipeReader::new(stdout)?,
            frames: FrameBuffer::default(),
        })
    }

    /// One scheduling tick: poll the pipe with the bounded timeouts and
    /// return whichever events completed. An empty result only means nothing
    /// was ready right now; the caller re-polls on its next tick.
    pub fn poll_events(&mut self) -> Vec<XEvent> {
        self.pipe.drain(
            PollTimeout::from(timing::POLL_WAIT_MS),
            PollTimeout::from(timing::DRAIN_IDLE_MS),
        );
        let mut events = Vec::new();
        for line in self.pipe.take_lines() {
            if let Some(event) = self.frames.push_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// False once the monitor process has exited; a dead event source is
    /// fatal for the daemon.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(frames: &mut FrameBuffer, lines: &[&str]) -> Vec<XEvent> {
        lines
            .iter()
            .filter_map(|line| frames.push_line(line))
            .collect()
    }

    #[test]
    fn test_blank_line_closes_frame() {
        let mut frames = FrameBuffer::default();
        let events = feed(
            &mut frames,
            &["EnterNotify event, serial 1, mode NotifyGrab", ""],
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "EnterNotify");
        assert_eq!(events[0].text("mode"), Some("NotifyGrab"));
    }

    #[test]
    fn test_continuation_lines_are_joined() {
        let mut frames = FrameBuffer::default();
        let events = feed(
            &mut frames,
            &[
                "ConfigureNotify event, serial 2, synthetic NO, window 123,",
                "    event 123, window 123, (400,300), width 50, height 50,",
                "    border_width 0, above 0x0, override NO",
                "",
            ],
        );
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.name, "ConfigureNotify");
        assert_eq!(event.int("width"), Some(50));
        assert_eq!(event.point("Param5"), Some((400, 300)));
        assert_eq!(event.flag("override"), Some(false));
    }

    #[test]
    fn test_whitespace_runs_collapse_to_first_character() {
        let mut frames = FrameBuffer::default();
        let events = feed(
            &mut frames,
            &["EnterNotify event  serial:1, mode:NotifyGrab, state:0x1", ""],
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].int("state"), Some(1));
    }

    #[test]
    fn test_frame_without_event_header_is_dropped() {
        let mut frames = FrameBuffer::default();
        let events = feed(&mut frames, &["random noise from the monitor", ""]);
        assert!(events.is_empty());

        // The buffer is clean again afterwards.
        let events = feed(&mut frames, &["FocusOut event, mode NotifyUngrab", ""]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_partial_frame_survives_between_polls() {
        let mut frames = FrameBuffer::default();
        assert!(feed(&mut frames, &["EnterNotify event, serial 1,"]).is_empty());
        // Next poll cycle delivers the rest of the block.
        let events = feed(&mut frames, &["    mode NotifyGrab, state 1", ""]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].text("mode"), Some("NotifyGrab"));
    }

    #[test]
    fn test_consecutive_blank_lines_yield_nothing() {
        let mut frames = FrameBuffer::default();
        assert!(feed(&mut frames, &["", "", ""]).is_empty());
    }
}
