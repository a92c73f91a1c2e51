//! Mutable camera view state.

use crate::camera::projection;
use crate::config::Config;

/// Per-viewer orientation, field of view, and bounds, all in degrees.
///
/// One instance lives for the viewer's lifetime; scene changes refresh it
/// from the newly folded configuration via
/// [`apply_config`](Self::apply_config). The animation loop re-clamps
/// pitch and yaw against the bounds every tick, so setters here only
/// normalize.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Vertical tilt.
    pub pitch: f64,
    /// Horizontal heading, wrapped to `[-180, 180]`.
    pub yaw: f64,
    /// In-plane rotation; only device-orientation input writes this.
    pub roll: f64,
    /// Horizontal field of view.
    pub hfov: f64,
    /// Minimum pitch; NaN means unrestricted.
    pub min_pitch: f64,
    /// Maximum pitch; NaN means unrestricted.
    pub max_pitch: f64,
    /// Minimum yaw.
    pub min_yaw: f64,
    /// Maximum yaw.
    pub max_yaw: f64,
    /// Minimum horizontal field of view.
    pub min_hfov: f64,
    /// Maximum horizontal field of view.
    pub max_hfov: f64,
    /// Yaw correction aligning image yaw zero to true north.
    pub north_offset: f64,
    /// Active auto-rotation speed in degrees per second; 0 is off.
    pub auto_rotate: f64,
    /// Scene the state was last refreshed for.
    pub scene_id: Option<String>,
}

impl ViewState {
    /// View state seeded from a folded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut view = Self {
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
            hfov: 100.0,
            min_pitch: f64::NAN,
            max_pitch: f64::NAN,
            min_yaw: -180.0,
            max_yaw: 180.0,
            min_hfov: 50.0,
            max_hfov: 120.0,
            north_offset: 0.0,
            auto_rotate: 0.0,
            scene_id: None,
        };
        view.apply_config(config);
        view
    }

    /// Refresh every field from a newly folded configuration.
    pub fn apply_config(&mut self, config: &Config) {
        self.pitch = config.pitch;
        self.yaw = config.yaw;
        self.roll = config.roll;
        self.min_pitch = config.min_pitch;
        self.max_pitch = config.max_pitch;
        self.min_yaw = config.min_yaw;
        self.max_yaw = config.max_yaw;
        self.min_hfov = config.min_hfov;
        self.max_hfov = config.max_hfov;
        self.north_offset = config.north_offset;
        self.auto_rotate = config.auto_rotate.speed().unwrap_or(0.0);
        self.scene_id = config.scene_id.clone();
        // Seed hfov through the clamp so a config value outside its own
        // bounds still produces a valid state.
        self.hfov = config.hfov;
        self.set_hfov(config.hfov, self.min_hfov);
    }

    /// Assign yaw, wrapped into `[-180, 180]`.
    pub fn set_yaw(&mut self, yaw: f64) {
        self.yaw = projection::wrap_yaw(yaw);
    }

    /// Assign the field of view, clamped to the allowed range.
    ///
    /// `min_hfov` is the effective lower bound — callers may pass a value
    /// below `self.min_hfov` for multires sources whose deepest level
    /// cannot fill the canvas. Inverted bounds are a logged no-op.
    pub fn set_hfov(&mut self, hfov: f64, min_hfov: f64) {
        if min_hfov >= self.max_hfov {
            log::warn!(
                "hfov bounds do not make sense (min {min_hfov} >= max {})",
                self.max_hfov
            );
            return;
        }
        self.hfov = hfov.min(self.max_hfov).max(min_hfov);
    }

    /// Assign the pitch bounds, each clamped into `[-90, 90]`.
    pub fn set_pitch_bounds(&mut self, min: f64, max: f64) {
        self.min_pitch = min.min(90.0).max(-90.0);
        self.max_pitch = max.min(90.0).max(-90.0);
    }

    /// Assign the yaw bounds, each clamped into `[-180, 180]`.
    pub fn set_yaw_bounds(&mut self, min: f64, max: f64) {
        self.min_yaw = min.min(180.0).max(-180.0);
        self.max_yaw = max.min(180.0).max(-180.0);
    }

    /// Assign the field-of-view bounds (non-negative).
    pub fn set_hfov_bounds(&mut self, min: f64, max: f64) {
        self.min_hfov = min.max(0.0);
        self.max_hfov = max.max(0.0);
    }

    /// Assign the north offset, wrapped into `[0, 360)`.
    pub fn set_north_offset(&mut self, heading: f64) {
        self.north_offset = heading.rem_euclid(360.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_yaw_wraps() {
        let mut view = ViewState::from_config(&Config::default());
        view.set_yaw(200.0);
        assert_eq!(view.yaw, -160.0);
        view.set_yaw(-200.0);
        assert_eq!(view.yaw, 160.0);
    }

    #[test]
    fn set_hfov_clamps_to_bounds() {
        let mut view = ViewState::from_config(&Config::default());
        assert_eq!((view.min_hfov, view.max_hfov), (50.0, 120.0));

        view.set_hfov(200.0, view.min_hfov);
        assert_eq!(view.hfov, 120.0);
        view.set_hfov(10.0, view.min_hfov);
        assert_eq!(view.hfov, 50.0);
        view.set_hfov(90.0, view.min_hfov);
        assert_eq!(view.hfov, 90.0);
    }

    #[test]
    fn inverted_hfov_bounds_are_a_no_op() {
        let mut view = ViewState::from_config(&Config::default());
        view.set_hfov_bounds(130.0, 120.0);
        let before = view.hfov;
        view.set_hfov(90.0, view.min_hfov);
        assert_eq!(view.hfov, before);
    }

    #[test]
    fn pitch_bounds_clamp_to_vertical_limits() {
        let mut view = ViewState::from_config(&Config::default());
        view.set_pitch_bounds(-120.0, 100.0);
        assert_eq!((view.min_pitch, view.max_pitch), (-90.0, 90.0));
    }

    #[test]
    fn north_offset_wraps_into_a_circle() {
        let mut view = ViewState::from_config(&Config::default());
        view.set_north_offset(370.0);
        assert_eq!(view.north_offset, 10.0);
        view.set_north_offset(-30.0);
        assert_eq!(view.north_offset, 330.0);
    }

    #[test]
    fn config_seeds_the_state() {
        let config = Config {
            pitch: 12.0,
            yaw: -40.0,
            hfov: 300.0,
            auto_rotate: crate::config::AutoRotate::Speed(-2.0),
            scene_id: Some("kitchen".to_owned()),
            ..Config::default()
        };
        let view = ViewState::from_config(&config);
        assert_eq!(view.pitch, 12.0);
        assert_eq!(view.yaw, -40.0);
        // Out-of-range hfov clamps on entry.
        assert_eq!(view.hfov, 120.0);
        assert_eq!(view.auto_rotate, -2.0);
        assert_eq!(view.scene_id.as_deref(), Some("kitchen"));
    }
}
