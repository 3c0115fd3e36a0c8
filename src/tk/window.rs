//! Top-level window operations
//!
//! These wrap the interpreter's window-manager commands and apply to
//! `WidgetKind::Window` widgets (the underlying commands address the window
//! by its widget identifier).

use anyhow::Result;

use super::shell::TkShell;
use super::widget::Widget;
use crate::common::types::Rect;

/// Window-manager type hints understood by the toolkit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Desktop,
    Dock,
    Toolbar,
    Menu,
    Utility,
    Splash,
    Dialog,
    DropdownMenu,
    PopupMenu,
    Tooltip,
    Notification,
    Combo,
    Dnd,
    Normal,
}

impl WindowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WindowKind::Desktop => "desktop",
            WindowKind::Dock => "dock",
            WindowKind::Toolbar => "toolbar",
            WindowKind::Menu => "menu",
            WindowKind::Utility => "utility",
            WindowKind::Splash => "splash",
            WindowKind::Dialog => "dialog",
            WindowKind::DropdownMenu => "dropdown_menu",
            WindowKind::PopupMenu => "popup_menu",
            WindowKind::Tooltip => "tooltip",
            WindowKind::Notification => "notification",
            WindowKind::Combo => "combo",
            WindowKind::Dnd => "dnd",
            WindowKind::Normal => "normal",
        }
    }
}

impl Widget {
    pub fn set_caption(&self, shell: &mut TkShell, caption: &str) {
        shell.execute(&format!("wm title {} \"{caption}\"", self.id()));
    }

    pub fn set_position(&self, shell: &mut TkShell, left: i32, top: i32) {
        shell.execute(&format!("wm geometry {} +{left}+{top}", self.id()));
    }

    pub fn set_size(&self, shell: &mut TkShell, width: i32, height: i32) {
        shell.execute(&format!("wm geometry {} {width}x{height}", self.id()));
    }

    pub fn set_geometry(&self, shell: &mut TkShell, geometry: &Rect) {
        shell.execute(&format!(
            "wm geometry {} {}",
            self.id(),
            geometry.as_geometry()
        ));
    }

    /// Read the current geometry back from the interpreter. Errors when the
    /// reply is not a well-formed geometry string.
    pub fn geometry(&self, shell: &mut TkShell) -> Result<Rect> {
        Rect::parse_geometry(&shell.query(&format!("wm geometry {}", self.id())))
    }

    pub fn set_attributes(&self, shell: &mut TkShell, attributes: &[(&str, String)]) {
        if attributes.is_empty() {
            return;
        }
        let mut command = format!("wm attributes {}", self.id());
        for (attribute, value) in attributes {
            command.push_str(&format!(" -{attribute} {value}"));
        }
        shell.execute(&command);
    }

    pub fn set_alpha(&self, shell: &mut TkShell, alpha: f64) {
        self.set_attributes(shell, &[("alpha", format!("{alpha:.3}"))]);
    }

    pub fn set_topmost(&self, shell: &mut TkShell, topmost: bool) {
        self.set_attributes(shell, &[("topmost", String::from(if topmost { "1" } else { "0" }))]);
    }

    pub fn set_window_kind(&self, shell: &mut TkShell, kind: WindowKind) {
        self.set_attributes(shell, &[("type", kind.as_str().to_string())]);
    }

    pub fn show(&self, shell: &mut TkShell) {
        shell.execute(&format!("wm deiconify {}", self.id()));
    }

    pub fn hide(&self, shell: &mut TkShell) {
        shell.execute(&format!("wm withdraw {}", self.id()));
    }
}
