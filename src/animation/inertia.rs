//! Decayed drag velocities.
//!
//! Velocities are re-blended every tick from the last two view samples
//! (80% old, 20% new), applied with friction on axes without key input,
//! and capped so a wild drag cannot fling the view.

/// Friction applied to residual motion each tick.
pub const FRICTION: f64 = 0.85;
/// Velocity magnitude cap, degrees per scaled tick.
pub const MAX_SPEED: f64 = 5.0;
/// Below this magnitude an axis counts as settled.
pub const SETTLE_THRESHOLD: f64 = 0.01;

/// Exponentially decayed velocities for yaw, pitch, and zoom.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InertiaState {
    /// Yaw velocity.
    pub yaw_speed: f64,
    /// Pitch velocity.
    pub pitch_speed: f64,
    /// Field-of-view velocity.
    pub zoom_speed: f64,
}

impl InertiaState {
    /// All axes at rest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-blend velocities from the position deltas of the last tick and
    /// cap their magnitudes. `diff` is the scaled tick duration.
    pub fn blend(&mut self, d_yaw: f64, d_pitch: f64, d_zoom: f64, diff: f64) {
        self.yaw_speed =
            (self.yaw_speed * 0.8 + d_yaw / diff * 0.2).clamp(-MAX_SPEED, MAX_SPEED);
        self.pitch_speed = (self.pitch_speed * 0.8 + d_pitch / diff * 0.2)
            .clamp(-MAX_SPEED, MAX_SPEED);
        self.zoom_speed = (self.zoom_speed * 0.8 + d_zoom / diff * 0.2)
            .clamp(-MAX_SPEED, MAX_SPEED);
    }

    /// Zero the pan velocities (drag released after a settle gap).
    pub fn clear_pan(&mut self) {
        self.yaw_speed = 0.0;
        self.pitch_speed = 0.0;
    }

    /// Zero everything (scene change).
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether any axis is above the settle threshold.
    #[must_use]
    pub fn is_coasting(&self) -> bool {
        self.yaw_speed.abs() > SETTLE_THRESHOLD
            || self.pitch_speed.abs() > SETTLE_THRESHOLD
            || self.zoom_speed.abs() > SETTLE_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_converges_toward_the_observed_rate() {
        let mut inertia = InertiaState::new();
        for _ in 0..60 {
            inertia.blend(1.0, 0.0, 0.0, 1.0);
        }
        assert!((inertia.yaw_speed - 1.0).abs() < 1e-6);
        assert_eq!(inertia.pitch_speed, 0.0);
    }

    #[test]
    fn speeds_are_capped() {
        let mut inertia = InertiaState::new();
        inertia.blend(1000.0, -1000.0, 1000.0, 0.5);
        assert_eq!(inertia.yaw_speed, MAX_SPEED);
        assert_eq!(inertia.pitch_speed, -MAX_SPEED);
        assert_eq!(inertia.zoom_speed, MAX_SPEED);
    }

    #[test]
    fn settle_threshold_defines_coasting() {
        let mut inertia = InertiaState::new();
        assert!(!inertia.is_coasting());
        inertia.yaw_speed = 0.011;
        assert!(inertia.is_coasting());
        inertia.yaw_speed = 0.009;
        assert!(!inertia.is_coasting());
    }

    #[test]
    fn clear_pan_keeps_zoom() {
        let mut inertia = InertiaState {
            yaw_speed: 2.0,
            pitch_speed: -1.0,
            zoom_speed: 0.5,
        };
        inertia.clear_pan();
        assert_eq!(inertia.yaw_speed, 0.0);
        assert_eq!(inertia.pitch_speed, 0.0);
        assert_eq!(inertia.zoom_speed, 0.5);
    }
}
