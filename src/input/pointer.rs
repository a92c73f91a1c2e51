//! Multi-pointer tracking and drag sessions.

use glam::DVec2;

/// Which input family started the active drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    /// Mouse drag: arctangent pan model.
    Mouse,
    /// Touch-family drag: linear pan model with optional pinch zoom.
    Touch,
}

/// Ephemeral state for one drag gesture.
///
/// Created on pointer-down, destroyed on the final pointer-up. At most
/// one exists per viewer. For two-finger gestures the anchor is the
/// midpoint of the fingers and `pinch_dist` carries their separation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Input family that owns the drag.
    pub source: DragSource,
    /// Screen anchor position.
    pub anchor: DVec2,
    /// Yaw at the anchor.
    pub anchor_yaw: f64,
    /// Pitch at the anchor.
    pub anchor_pitch: f64,
    /// Finger separation at the pinch anchor, when two fingers are down.
    pub pinch_dist: Option<f64>,
}

/// Tracks concurrent touch-family pointers by id.
///
/// Platform pointer events arrive one finger at a time, so the tracker
/// keeps its own contact list and only reports a drag end once the last
/// concurrent pointer lifts. Losing that accounting is how drags get
/// stuck.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerTracker {
    contacts: Vec<(u64, DVec2)>,
}

impl PointerTracker {
    /// Empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pointer contact. Returns the number now active.
    pub fn down(&mut self, id: u64, pos: DVec2) -> usize {
        if let Some(entry) =
            self.contacts.iter_mut().find(|(cid, _)| *cid == id)
        {
            entry.1 = pos;
        } else {
            self.contacts.push((id, pos));
        }
        self.contacts.len()
    }

    /// Update a pointer's position. `false` for ids never seen.
    pub fn update(&mut self, id: u64, pos: DVec2) -> bool {
        match self.contacts.iter_mut().find(|(cid, _)| *cid == id) {
            Some(entry) => {
                entry.1 = pos;
                true
            }
            None => false,
        }
    }

    /// Remove a pointer. Returns `true` once no contacts remain — the
    /// moment the logical drag ends.
    pub fn up(&mut self, id: u64) -> bool {
        self.contacts.retain(|(cid, _)| *cid != id);
        self.contacts.is_empty()
    }

    /// Number of active contacts.
    #[must_use]
    pub fn active(&self) -> usize {
        self.contacts.len()
    }

    /// Drag anchor: the first contact, or the midpoint of the first two.
    #[must_use]
    pub fn gesture_center(&self) -> Option<DVec2> {
        match self.contacts.as_slice() {
            [] => None,
            [(_, only)] => Some(*only),
            [(_, a), (_, b), ..] => Some((*a + *b) * 0.5),
        }
    }

    /// Distance between the first two contacts, when two are active.
    #[must_use]
    pub fn pinch_distance(&self) -> Option<f64> {
        match self.contacts.as_slice() {
            [(_, a), (_, b), ..] => Some(a.distance(*b)),
            _ => None,
        }
    }

    /// Drop all contacts.
    pub fn clear(&mut self) {
        self.contacts.clear();
    }
}
