//! Animation scheduling: the self-starting/self-stopping frame loop and
//! the inertia model.

/// Decayed drag velocities.
pub mod inertia;
/// Frame-loop state machine and host scheduling contract.
pub mod scheduler;

pub use inertia::InertiaState;
pub use scheduler::{Directive, FrameHost, FrameScheduler, LoopState, TickSignals};
