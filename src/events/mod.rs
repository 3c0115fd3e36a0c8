//! Raw event stream decoding
//!
//! Turns the event monitor's line output into discrete typed events: the
//! reader frames blank-line-delimited blocks, the decoder coerces each field
//! through a fixed rule set.

mod reader;
mod xevent;

pub use reader::{EventReader, FrameBuffer};
pub use xevent::{FieldValue, XEvent};
