//! Drop-zone overlays
//!
//! Each configured zone owns one hidden overlay window. Overlays are
//! recreated whenever the configuration (re)loads and are only ever shown
//! while a drag is active.

use tracing::info;

use crate::common::types::Rect;
use crate::config::ZoneConfig;
use crate::constants::defaults;
use crate::tk::{IdAllocator, TkCallback, TkShell, Widget, WidgetEvent, WindowKind};

/// One zone and its transient overlay window
pub struct DropZone {
    pub rect: Rect,
    window: Widget,
}

impl DropZone {
    fn create(shell: &mut TkShell, ids: &mut IdAllocator, rect: Rect) -> DropZone {
        let window = Widget::window(shell, ids);
        window.set_window_kind(shell, WindowKind::Utility);
        window.set_alpha(shell, defaults::zone::BASE_ALPHA);
        window.set_caption(shell, defaults::zone::CAPTION);
        window.set_topmost(shell, true);
        window.set_background(shell, defaults::zone::COLOR);
        window.hide(shell);
        window.set_geometry(shell, &rect);
        DropZone { rect, window }
    }
}

/// The ordered overlay set driven by the daemon loop
pub struct ZoneOverlays {
    zones: Vec<DropZone>,
    visible: bool,
}

impl ZoneOverlays {
    pub fn new() -> Self {
        Self {
            zones: Vec::new(),
            visible: false,
        }
    }

    /// Destroy the current overlays and recreate them from configuration.
    pub fn rebuild(&mut self, shell: &mut TkShell, ids: &mut IdAllocator, zones: &[ZoneConfig]) {
        for zone in self.zones.drain(..) {
            zone.window.destroy(shell);
        }
        self.visible = false;

        for config in zones {
            self.zones.push(DropZone::create(shell, ids, config.rect));
        }
        info!(zones = self.zones.len(), "drop-zone overlays rebuilt");
    }

    /// Zone rectangles in configured order.
    pub fn rects(&self) -> Vec<Rect> {
        self.zones.iter().map(|zone| zone.rect).collect()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn show_all(&mut self, shell: &mut TkShell) {
        if self.visible {
            return;
        }
        for zone in &self.zones {
            zone.window.show(shell);
        }
        self.visible = true;
    }

    pub fn hide_all(&mut self, shell: &mut TkShell) {
        if !self.visible {
            return;
        }
        for zone in &self.zones {
            zone.window.hide(shell);
        }
        self.visible = false;
    }

    /// The matched zone pops to the foreground opacity, the rest dim.
    pub fn highlight(&self, shell: &mut TkShell, matched: Option<usize>) {
        for (index, zone) in self.zones.iter().enumerate() {
            let alpha = if matched == Some(index) {
                defaults::zone::MATCHED_ALPHA
            } else {
                defaults::zone::UNMATCHED_ALPHA
            };
            zone.window.set_alpha(shell, alpha);
        }
    }

    /// Route one toolkit callback to the overlay windows; a zone whose
    /// window reports destruction leaves the set.
    pub fn route_callback(&mut self, callback: &TkCallback) {
        let mut events = Vec::new();
        for zone in &self.zones {
            zone.window.handle_callback(callback, &mut events);
        }
        for event in events {
            if let WidgetEvent::Destroyed { id } = event {
                self.zones.retain(|zone| zone.window.id() != id);
            }
        }
    }
}
