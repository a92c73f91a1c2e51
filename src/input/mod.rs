//! Input normalization: raw event vocabulary, pointer tracking, keyboard
//! state, and device-orientation math.
//!
//! Every platform input family (mouse, native touch, platform pointer
//! events, wheel, keyboard, orientation sensor) is reduced to
//! [`InputEvent`] before it reaches the viewer, which turns the stream
//! into a single drag/zoom/rotate model.

/// Platform-agnostic input events.
pub mod event;
/// Logical key directions and held-key state.
pub mod keyboard;
/// Device-orientation quaternion math.
pub mod orientation;
/// Multi-pointer tracking and drag sessions.
pub mod pointer;

pub use event::{InputEvent, PointerSource};
pub use keyboard::{KeyDirection, KeyState};
pub use orientation::OrientationSample;
pub use pointer::{DragSession, DragSource, PointerTracker};
