//! Single-instance enforcement via a locked PID file
//!
//! One daemon per display session: the PID file is keyed by DISPLAY (or the
//! session id) and held under an exclusive flock for the daemon's lifetime.
//! A newly starting daemon asks the recorded instance to exit first, so
//! restarting "wins" rather than failing.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use nix::fcntl::{Flock, FlockArg};
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tracing::{info, warn};

use crate::constants::{config, timing};

fn pid_file_path() -> PathBuf {
    let session = std::env::var("DISPLAY")
        .or_else(|_| std::env::var("XDG_SESSION_ID"))
        .unwrap_or_default();
    std::env::temp_dir().join(format!("{}_{session}.pid", config::PID_PREFIX))
}

fn read_pid(path: &Path) -> Option<i32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// Ask a recorded daemon instance to reload its configuration. Used by the
/// zone editor after saving.
pub fn notify_reload() {
    if let Some(pid) = read_pid(&pid_file_path()) {
        info!(pid, "notifying running daemon");
        let _ = signal::kill(Pid::from_raw(pid), Signal::SIGHUP);
    }
}

pub struct PidFile {
    lock: Option<Flock<File>>,
    path: PathBuf,
}

impl PidFile {
    /// Take over the session: ask any recorded daemon to exit, then claim
    /// the exclusive lock for this process and record its PID.
    pub fn acquire() -> Result<PidFile> {
        let path = pid_file_path();
        if let Some(pid) = read_pid(&path) {
            info!(pid, "asking previous daemon instance to exit");
            let _ = signal::kill(Pid::from_raw(pid), Signal::SIGTERM);
            std::thread::sleep(Duration::from_millis(timing::RESTART_GRACE_MS));
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("can not open {path:?}"))?;

        let mut lock = match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(lock) => lock,
            Err((_, errno)) => {
                bail!("can not lock {path:?} ({errno}); is another instance active?")
            }
        };
        lock.write_all(std::process::id().to_string().as_bytes())
            .with_context(|| format!("can not write {path:?}"))?;

        Ok(PidFile {
            lock: Some(lock),
            path,
        })
    }

    /// Release the lock and remove the record.
    pub fn release(mut self) {
        if let Some(lock) = self.lock.take() {
            let _ = lock.unlock();
        }
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(error = %err, "could not remove pid file");
        }
    }
}
