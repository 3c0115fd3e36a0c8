//! Application-wide constants
//!
//! This module contains the magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Poll-loop timing
pub mod timing {
    /// Wait for the first readable byte in one poll cycle (milliseconds)
    pub const POLL_WAIT_MS: u16 = 100;

    /// Idle window after which a drain loop considers a pipe quiet (milliseconds)
    pub const DRAIN_IDLE_MS: u16 = 50;

    /// Grace period given to a previous daemon instance after SIGTERM (milliseconds)
    pub const RESTART_GRACE_MS: u64 = 1000;
}

/// Bits of the `state` modifier bitmask reported by the event source
pub mod modifiers {
    pub const SHIFT: i64 = 1 << 0;
    pub const CAPS_LOCK: i64 = 1 << 1;
    pub const CONTROL: i64 = 1 << 2;
    pub const ALT: i64 = 1 << 3;
    pub const NUM_LOCK: i64 = 1 << 4;
    pub const SUPER: i64 = 1 << 6;
    pub const BUTTON1: i64 = 1 << 8;
    pub const BUTTON2: i64 = 1 << 9;
    pub const BUTTON3: i64 = 1 << 10;
    pub const BUTTON4: i64 = 1 << 11;
    pub const BUTTON5: i64 = 1 << 12;
}

/// Event and field names recognized in the raw event stream
pub mod events {
    /// Pointer crossing event announcing a pointer grab
    pub const ENTER: &str = "EnterNotify";

    /// Window geometry change event
    pub const CONFIGURE: &str = "ConfigureNotify";

    /// Focus loss event ending a grab
    pub const UNFOCUS: &str = "FocusOut";

    /// `mode` value marking a grab-initiated crossing
    pub const MODE_GRAB: &str = "NotifyGrab";

    /// `mode` value marking an ungrab-initiated focus change
    pub const MODE_UNGRAB: &str = "NotifyUngrab";

    /// Positional field carrying the window manager's reported top-left point
    /// in configure events. The index reflects the observed output format of
    /// the event source, not a documented protocol guarantee.
    pub const CONFIGURE_POSITION_FIELD: &str = "Param5";
}

/// External commands driven as child processes
pub mod commands {
    /// Root-window event monitor
    pub const XEV: &str = "xev";

    /// Toolkit interpreter
    pub const TCLSH: &str = "tclsh";

    /// Window-manager query/control command
    pub const WMCTRL: &str = "wmctrl";

    /// Window children query command
    pub const XWININFO: &str = "xwininfo";

    /// Commands that must be present for the application to start
    pub const REQUIRED: &[&str] = &[XEV, WMCTRL, XWININFO, TCLSH];
}

/// Configuration paths and filenames
pub mod config {
    /// Application directory name under the user config directory
    pub const APP_DIR: &str = "zonedrop";

    /// Configuration filename
    pub const FILENAME: &str = "config.json";

    /// Reserved name of the implicit default profile
    pub const DEFAULT_PROFILE: &str = "__DEFAULT";

    /// Prefix of the per-session PID file in the temp directory
    pub const PID_PREFIX: &str = "zonedrop";
}

/// Default values for zone overlays and the editor
pub mod defaults {
    /// Drop-zone overlay appearance
    pub mod zone {
        /// Fallback width for zone entries missing geometry
        pub const WIDTH: i32 = 100;

        /// Fallback height for zone entries missing geometry
        pub const HEIGHT: i32 = 100;

        /// Overlay window caption
        pub const CAPTION: &str = "Drop zone";

        /// Overlay background color (toolkit color name)
        pub const COLOR: &str = "LightSkyBlue2";

        /// Opacity of a freshly created overlay
        pub const BASE_ALPHA: f64 = 0.9;

        /// Opacity of the zone under the dragged window
        pub const MATCHED_ALPHA: f64 = 0.8;

        /// Opacity of the remaining zones while a drag is active
        pub const UNMATCHED_ALPHA: f64 = 0.4;
    }

    /// Zone editor windows
    pub mod editor {
        /// Initial edge length of a fresh editor window (pixels)
        pub const SIZE: i32 = 300;
    }
}
