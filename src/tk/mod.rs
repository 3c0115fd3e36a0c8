//! Text-protocol bridge to the toolkit interpreter
//!
//! The interpreter is a child process driven entirely over two pipes; this
//! module owns the command/callback grammar, the widget tree rendered
//! through it, and the window operations layered on top.

mod callback;
mod shell;
mod widget;
mod window;

pub use callback::TkCallback;
pub use shell::TkShell;
pub use widget::{IdAllocator, Widget, WidgetEvent, WidgetKind};
pub use window::WindowKind;
