//! Platform-agnostic input events.
//!
//! The embedding translates raw window/DOM events into these variants
//! and feeds them to [`Viewer::handle_input`](crate::viewer::Viewer).
//! Screen positions are CSS pixels relative to the canvas top-left.

use super::keyboard::KeyDirection;
use super::orientation::OrientationSample;

/// Identity of the platform pointer that produced an event.
///
/// Native touch and platform "pointer" events both carry per-finger ids;
/// the tracker treats them uniformly so a drag started by one family and
/// continued by the other cannot leak state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerSource {
    /// The single mouse pointer.
    Mouse,
    /// A native touch contact.
    Touch(u64),
    /// A platform pointer event carrying a touch type (Pointer Events
    /// API).
    SyntheticPointer(u64),
}

impl PointerSource {
    /// Tracking id for touch-family pointers; `None` for the mouse.
    #[must_use]
    pub fn touch_id(self) -> Option<u64> {
        match self {
            Self::Mouse => None,
            Self::Touch(id) | Self::SyntheticPointer(id) => Some(id),
        }
    }
}

/// One normalized input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A pointer made contact.
    PointerDown {
        /// Which pointer.
        source: PointerSource,
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// A pointer moved.
    PointerMove {
        /// Which pointer.
        source: PointerSource,
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// A pointer lifted or left the canvas.
    PointerUp {
        /// Which pointer.
        source: PointerSource,
    },
    /// Scroll wheel movement (positive delta zooms in).
    Wheel {
        /// Wheel delta in `wheelDeltaY` units.
        delta: f64,
    },
    /// A logical pan/zoom key changed state.
    Key {
        /// Which direction the key maps to.
        direction: KeyDirection,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Keyboard focus left the viewer; all held keys release.
    FocusLost,
    /// Device-orientation sensor sample.
    Orientation(OrientationSample),
}
