//! Window-manager queries and control via external commands
//!
//! The window manager itself is only reachable through `wmctrl` and
//! `xwininfo`; their line output is parsed with best-effort semantics
//! (unparseable lines are skipped).

use std::collections::HashMap;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::common::types::Rect;
use crate::constants::commands;

/// One managed window as reported by the window manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmWindow {
    pub id: u64,
    pub desktop: i64,
    pub pid: u32,
    pub geometry: Rect,
    pub client_machine: String,
    pub title: String,
}

/// One virtual desktop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WmDesktop {
    pub id: i64,
    pub is_current: bool,
}

/// List the windows the window manager is aware of, keyed by window id.
pub fn list_windows() -> Result<HashMap<u64, WmWindow>> {
    let output = Command::new(commands::WMCTRL)
        .args(["-l", "-p", "-G"])
        .output()
        .with_context(|| format!("failed to run {:?}", commands::WMCTRL))?;
    let text = String::from_utf8_lossy(&output.stdout);
    Ok(text
        .lines()
        .filter_map(parse_window_line)
        .map(|window| (window.id, window))
        .collect())
}

/// Reposition a window. Window ids learned from raw events are sometimes
/// frame windows the manager does not list; in that case the first managed
/// child found via the children query is moved instead.
pub fn move_window(window_id: u64, geometry: &Rect) -> Result<()> {
    let managed = list_windows()?;
    let mut target = window_id;
    if !managed.contains_key(&target) {
        for child in children_of(target).unwrap_or_default() {
            if managed.contains_key(&child) {
                target = child;
                break;
            }
        }
    }

    debug!(window = target, geometry = %geometry.as_geometry(), "moving window");
    let target_arg = target.to_string();
    let move_arg = geometry.as_move_arg();
    let status = Command::new(commands::WMCTRL)
        .args(["-i", "-r", target_arg.as_str(), "-e", move_arg.as_str()])
        .status()
        .with_context(|| format!("failed to run {:?}", commands::WMCTRL))?;
    if !status.success() {
        warn!(window = target, "window move command reported failure");
    }
    Ok(())
}

/// List the window ids of a window's children.
pub fn children_of(window_id: u64) -> Result<Vec<u64>> {
    let id_arg = window_id.to_string();
    let output = Command::new(commands::XWININFO)
        .args(["-id", id_arg.as_str(), "-children"])
        .output()
        .with_context(|| format!("failed to run {:?}", commands::XWININFO))?;
    let text = String::from_utf8_lossy(&output.stdout);
    Ok(text.lines().filter_map(parse_child_id).collect())
}

/// List the virtual desktops; the current one carries the `*` marker.
pub fn list_desktops() -> Result<Vec<WmDesktop>> {
    let output = Command::new(commands::WMCTRL)
        .arg("-d")
        .output()
        .with_context(|| format!("failed to run {:?}", commands::WMCTRL))?;
    let text = String::from_utf8_lossy(&output.stdout);
    Ok(text.lines().filter_map(parse_desktop_line).collect())
}

pub fn current_desktop() -> Result<Option<WmDesktop>> {
    Ok(list_desktops()?
        .into_iter()
        .find(|desktop| desktop.is_current))
}

/// True when `command` resolves on the PATH.
pub fn command_exists(command: &str) -> bool {
    Command::new("which")
        .arg(command)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// `0x<id> <desktop> <pid> <x> <y> <w> <h> <machine> <title...>`
fn parse_window_line(line: &str) -> Option<WmWindow> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 9 {
        return None;
    }
    let id = u64::from_str_radix(tokens[0].strip_prefix("0x")?, 16).ok()?;
    let desktop = tokens[1].parse().ok()?;
    let pid = tokens[2].parse().ok()?;
    let x = tokens[3].parse().ok()?;
    let y = tokens[4].parse().ok()?;
    let width = tokens[5].parse().ok()?;
    let height = tokens[6].parse().ok()?;
    Some(WmWindow {
        id,
        desktop,
        pid,
        geometry: Rect::new(x, y, width, height),
        client_machine: tokens[7].to_string(),
        title: tokens[8..].join(" "),
    })
}

/// `<id> <*|-> DG: ...`
fn parse_desktop_line(line: &str) -> Option<WmDesktop> {
    let mut tokens = line.split_whitespace();
    let id = tokens.next()?.parse().ok()?;
    let is_current = match tokens.next()? {
        "*" => true,
        "-" => false,
        _ => return None,
    };
    Some(WmDesktop { id, is_current })
}

/// `  0x<id> "<name>": (<class>)  <geometry>` or `  0x<id> (has no name): ()`
fn parse_child_id(line: &str) -> Option<u64> {
    let trimmed = line.trim_start();
    let hex = trimmed.strip_prefix("0x")?;
    let digits = hex
        .bytes()
        .take_while(u8::is_ascii_hexdigit)
        .count();
    if digits == 0 || !trimmed.contains(": (") {
        return None;
    }
    u64::from_str_radix(&hex[..digits], 16).ok()
}
