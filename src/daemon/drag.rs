//! Drag lifecycle tracking and zone matching
//!
//! Correlates the typed event stream into a start/track/commit drag session.
//! The tracker itself performs no I/O: each event produces an effect the
//! daemon loop applies to the overlays and the window manager, which keeps
//! the transition table testable in isolation.
//!
//! A drag is recognized as: a pointer grab entering with the shift modifier
//! held, one configure event identifying the moved window, then further
//! configure events with an unchanged size (a pure move). The ungrab focus
//! loss commits the session.

use crate::common::types::Rect;
use crate::constants::{events, modifiers};
use crate::events::XEvent;

/// Commit order produced when a drag ends over a matched zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub window: u64,
    pub rect: Rect,
}

/// What the daemon loop has to apply after feeding one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEffect {
    None,
    /// Overlays become visible; `matched` is highlighted against the rest.
    Armed { matched: Option<usize> },
    /// Overlays are hidden; `movement` carries the committed reposition.
    Released { movement: Option<MoveRequest> },
}

/// Session state between a detected drag start and its commit
#[derive(Debug, Default)]
pub struct DragTracker {
    tracking: bool,
    window: i64,
    width: i64,
    height: i64,
    moving: bool,
    matched: Option<usize>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one typed event; `zones` is the configured rectangle list in
    /// order. Missing or mistyped fields never fail hard, they simply keep
    /// the transition from firing.
    pub fn observe(&mut self, event: &XEvent, zones: &[Rect]) -> DragEffect {
        match event.name.as_str() {
            events::ENTER => {
                self.on_enter(event);
                DragEffect::None
            }
            events::CONFIGURE => self.on_configure(event, zones),
            events::UNFOCUS => self.on_unfocus(event, zones),
            _ => DragEffect::None,
        }
    }

    fn on_enter(&mut self, event: &XEvent) {
        let grabbed = event.text("mode") == Some(events::MODE_GRAB);
        let shifted = event.int("state").unwrap_or(0) & modifiers::SHIFT != 0;
        if grabbed && shifted && !self.tracking {
            self.tracking = true;
            self.window = 0;
            self.width = 0;
            self.height = 0;
            self.moving = false;
        }
    }

    fn on_configure(&mut self, event: &XEvent, zones: &[Rect]) -> DragEffect {
        if !self.tracking {
            return DragEffect::None;
        }
        let window = event.int("window").unwrap_or(0);
        let width = event.int("width").unwrap_or(0);
        let height = event.int("height").unwrap_or(0);

        if self.window == 0 {
            // First configure after the grab identifies the dragged window.
            self.window = window;
            self.width = width;
            self.height = height;
            self.moving = false;
            return DragEffect::None;
        }

        if window == self.window && width == self.width && height == self.height {
            self.moving = true;
            self.matched = event
                .point(events::CONFIGURE_POSITION_FIELD)
                .and_then(|(x, y)| matching_zone(zones, x + width / 2, y));
            return DragEffect::Armed {
                matched: self.matched,
            };
        }

        DragEffect::None
    }

    fn on_unfocus(&mut self, event: &XEvent, zones: &[Rect]) -> DragEffect {
        if event.text("mode") != Some(events::MODE_UNGRAB) {
            return DragEffect::None;
        }
        let movement = match self.matched {
            Some(index) if self.moving => zones.get(index).map(|rect| MoveRequest {
                window: self.window as u64,
                rect: *rect,
            }),
            _ => None,
        };
        *self = Self::default();
        DragEffect::Released { movement }
    }
}

/// First zone, in configured order, containing the sample point. The sample
/// is the top-center of the dragged window, which tracks where the pointer
/// grabs a title bar.
pub fn matching_zone(zones: &[Rect], x: i64, y: i64) -> Option<usize> {
    let (x, y) = (x as i32, y as i32);
    zones.iter().position(|zone| zone.contains(x, y))
}
