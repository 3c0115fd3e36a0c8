//! Daemon mode: the cooperative polling loop
//!
//! One thread round-robins between the two child pipes with bounded poll
//! timeouts: raw events feed the drag tracker, toolkit callbacks feed the
//! overlay set. No handler runs concurrently with another, so the engine
//! state needs no locking.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use signal_hook::consts::{SIGHUP, SIGTERM};
use tracing::{error, info};

use super::drag::{DragEffect, DragTracker};
use super::pidfile::PidFile;
use super::zones::ZoneOverlays;
use crate::config::Config;
use crate::constants::commands;
use crate::events::EventReader;
use crate::tk::{IdAllocator, TkShell};
use crate::wm;

pub fn run(profile: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.select_profile(profile);

    let mut reader = EventReader::spawn()?;
    let mut shell = TkShell::spawn(commands::TCLSH, &[])?;
    let mut ids = IdAllocator::default();
    let mut overlays = ZoneOverlays::new();
    overlays.rebuild(&mut shell, &mut ids, config.current_zones());

    let stop = Arc::new(AtomicBool::new(false));
    let reload = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGTERM, Arc::clone(&stop))
        .context("failed to register SIGTERM handler")?;
    signal_hook::flag::register(SIGHUP, Arc::clone(&reload))
        .context("failed to register SIGHUP handler")?;

    let pid_file = PidFile::acquire()?;

    match wm::current_desktop() {
        Ok(Some(desktop)) => info!(profile, desktop = desktop.id, "daemon running"),
        _ => info!(profile, "daemon running"),
    }

    let mut tracker = DragTracker::new();

    while !stop.load(Ordering::Relaxed) {
        if reload.swap(false, Ordering::Relaxed) {
            info!("reload requested");
            match Config::load() {
                Ok(fresh) => {
                    config = fresh;
                    config.select_profile(profile);
                    overlays.rebuild(&mut shell, &mut ids, config.current_zones());
                }
                Err(err) => {
                    error!(error = %err, "reload failed, keeping previous configuration");
                }
            }
        }

        if !reader.is_running() {
            bail!("event source exited unexpectedly");
        }
        if !shell.is_running() {
            bail!("toolkit interpreter exited unexpectedly");
        }

        let zone_rects = overlays.rects();
        for event in reader.poll_events() {
            match tracker.observe(&event, &zone_rects) {
                DragEffect::None => {}
                DragEffect::Armed { matched } => {
                    overlays.show_all(&mut shell);
                    overlays.highlight(&mut shell, matched);
                }
                DragEffect::Released { movement } => {
                    overlays.hide_all(&mut shell);
                    if let Some(request) = movement {
                        info!(
                            window = request.window,
                            target = %request.rect.as_geometry(),
                            "drag committed"
                        );
                        if let Err(err) = wm::move_window(request.window, &request.rect) {
                            error!(error = %err, "window move failed");
                        }
                    }
                }
            }
        }

        for callback in shell.pump() {
            overlays.route_callback(&callback);
        }
    }

    info!("shutting down");
    shell.close();
    pid_file.release();
    Ok(())
}
