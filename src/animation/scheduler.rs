//! Frame-loop state machine and the host scheduling contract.
//!
//! The engine never busy-polls: it asks the host for single frames while
//! anything moves and goes idle otherwise. The only timer is the deferred
//! auto-rotate restart, and at most one is ever armed.

use web_time::{Duration, Instant};

/// Host-environment services the engine schedules against.
///
/// A browser embedding maps these onto `requestAnimationFrame`,
/// `setTimeout`, sensor subscription, and the Fullscreen API; a native
/// embedding maps them onto its event loop. The host calls back into
/// [`Viewer::tick`](crate::viewer::Viewer::tick) for requested frames and
/// [`Viewer::wake`](crate::viewer::Viewer::wake) for the deferred timer.
pub trait FrameHost {
    /// Run one animation frame soon.
    fn request_frame(&mut self);

    /// Arm a single deferred wake after `delay`. Any previously armed
    /// wake was already cancelled by the engine.
    fn defer_wake(&mut self, delay: Duration);

    /// Cancel the outstanding deferred wake, if any.
    fn cancel_wake(&mut self);

    /// Begin delivering device-orientation samples as input events.
    fn subscribe_orientation(&mut self);

    /// Stop delivering device-orientation samples.
    fn unsubscribe_orientation(&mut self);

    /// Enter or leave fullscreen presentation. The host reports the
    /// outcome via
    /// [`Viewer::fullscreen_changed`](crate::viewer::Viewer::fullscreen_changed).
    fn set_fullscreen(&mut self, enabled: bool);
}

/// Lifecycle of the animation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Asleep; no frame requested.
    Idle,
    /// A frame is requested and ticks are flowing.
    Running,
    /// Asleep with a deferred auto-rotate restart armed.
    PendingAutoRotateRestart {
        /// When the deferred wake is due.
        deadline: Instant,
    },
}

/// Signals evaluated at the end of a tick to decide whether the loop
/// keeps running.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickSignals {
    /// A drag session is active.
    pub dragging: bool,
    /// At least one pan/zoom key is held.
    pub keys_down: bool,
    /// Auto-rotation is on.
    pub auto_rotating: bool,
    /// Residual inertia is above the settle threshold.
    pub coasting: bool,
    /// The renderer is still streaming the source in.
    pub renderer_busy: bool,
    /// A dynamic source is being force-updated.
    pub dynamic_update: bool,
    /// Time until auto-rotate wants to resume, if a restart is due.
    pub restart_in: Option<Duration>,
}

impl TickSignals {
    fn any_motion(&self) -> bool {
        self.dragging
            || self.keys_down
            || self.auto_rotating
            || self.coasting
            || self.renderer_busy
            || self.dynamic_update
    }
}

/// What the caller must ask the host for after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Request the next frame.
    RequestFrame,
    /// Go idle and arm the deferred auto-rotate restart.
    DeferRestart(Duration),
    /// Go idle.
    Sleep,
}

/// Pure state machine for the animation loop.
///
/// Owns no timers and calls no host functions — the viewer maps returned
/// [`Directive`]s and `bool`s onto [`FrameHost`] calls, which keeps every
/// transition unit-testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameScheduler {
    state: LoopState,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    /// Scheduler starting idle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
        }
    }

    /// Current loop state.
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Whether ticks are currently flowing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Cancel a pending deferred restart (any interaction preempts it).
    /// Returns `true` when the caller must cancel the host's wake timer.
    pub fn interrupt(&mut self) -> bool {
        if matches!(self.state, LoopState::PendingAutoRotateRestart { .. }) {
            self.state = LoopState::Idle;
            return true;
        }
        false
    }

    /// Transition to running. Returns `true` when the caller must request
    /// a frame (idempotent while already running).
    pub fn start(&mut self) -> bool {
        if self.state == LoopState::Running {
            return false;
        }
        self.state = LoopState::Running;
        true
    }

    /// Decide what happens after a tick.
    pub fn after_tick(
        &mut self,
        now: Instant,
        signals: &TickSignals,
    ) -> Directive {
        if signals.any_motion() {
            self.state = LoopState::Running;
            return Directive::RequestFrame;
        }
        if let Some(delay) = signals.restart_in {
            self.state = LoopState::PendingAutoRotateRestart {
                deadline: now + delay,
            };
            return Directive::DeferRestart(delay);
        }
        self.state = LoopState::Idle;
        Directive::Sleep
    }

    /// The deferred wake fired. Returns `true` when a restart was armed
    /// and the loop should resume.
    pub fn wake(&mut self) -> bool {
        if matches!(self.state, LoopState::PendingAutoRotateRestart { .. }) {
            self.state = LoopState::Running;
            return true;
        }
        false
    }
}
