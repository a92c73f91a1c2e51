//! Typed viewer events and the subscriber registry.
//!
//! Listeners are keyed by [`EventKind`] and delivered in insertion order.

use std::fmt;

use rustc_hash::FxHashMap;

/// Events emitted by the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    /// A scene finished loading and the viewer is interactive.
    Load,
    /// A user-visible error occurred.
    Error {
        /// Human-readable description.
        message: String,
    },
    /// The previously displayed error went away.
    ErrorCleared,
    /// The active scene changed. Fired before the new scene loads.
    SceneChange {
        /// Id of the scene being entered.
        scene_id: String,
    },
}

/// Subscription key for [`ViewerEvent`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Scene load completed.
    Load,
    /// Error shown.
    Error,
    /// Error cleared.
    ErrorCleared,
    /// Scene switched.
    SceneChange,
}

impl ViewerEvent {
    /// The subscription key this event is delivered under.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Load => EventKind::Load,
            Self::Error { .. } => EventKind::Error,
            Self::ErrorCleared => EventKind::ErrorCleared,
            Self::SceneChange { .. } => EventKind::SceneChange,
        }
    }
}

/// Handle identifying one subscribed listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Boxed subscriber callback.
pub type Listener = Box<dyn FnMut(&ViewerEvent)>;

/// Insertion-ordered listener lists per event kind.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: FxHashMap<EventKind, Vec<(ListenerId, Listener)>>,
    next_id: u64,
}

impl ListenerRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a listener to one event kind.
    pub fn add(&mut self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, listener));
        id
    }

    /// Remove a single listener. Returns whether it was subscribed.
    pub fn remove(&mut self, kind: EventKind, id: ListenerId) -> bool {
        let Some(list) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(lid, _)| *lid != id);
        let removed = list.len() < before;
        if list.is_empty() {
            let _ = self.listeners.remove(&kind);
        }
        removed
    }

    /// Drop every listener for one kind.
    pub fn remove_kind(&mut self, kind: EventKind) {
        let _ = self.listeners.remove(&kind);
    }

    /// Drop all listeners.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Number of listeners subscribed to a kind.
    #[must_use]
    pub fn count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Deliver an event to its subscribers in insertion order.
    pub fn emit(&mut self, event: &ViewerEvent) {
        if let Some(list) = self.listeners.get_mut(&event.kind()) {
            for (_, listener) in list {
                listener(event);
            }
        }
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("kinds", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}
