//! Public view-state accessors and controls for [`Viewer`].

use web_time::Duration;

use super::Viewer;
use crate::camera::projection;
use crate::config::Config;
use crate::error::PanoError;
use crate::event::{EventKind, Listener, ListenerId};
use crate::hotspot::ProjectedHotSpot;
use crate::renderer::StillFrame;

// ── Orientation ──

impl Viewer {
    /// Pitch of the view center in degrees.
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.view.pitch
    }

    /// Point the view center at a pitch (clamped on the next tick).
    pub fn set_pitch(&mut self, pitch: f64) {
        self.view.pitch = pitch;
        self.schedule();
    }

    /// Allowed pitch range `(min, max)` in degrees.
    #[must_use]
    pub fn pitch_bounds(&self) -> (f64, f64) {
        (self.view.min_pitch, self.view.max_pitch)
    }

    /// Restrict the pitch range (inputs clamped into `[-90, 90]`).
    pub fn set_pitch_bounds(&mut self, min: f64, max: f64) {
        self.view.set_pitch_bounds(min, max);
    }

    /// Yaw of the view center in degrees.
    #[must_use]
    pub fn yaw(&self) -> f64 {
        self.view.yaw
    }

    /// Point the view center at a yaw, wrapped into `[-180, 180]`.
    pub fn set_yaw(&mut self, yaw: f64) {
        self.view.set_yaw(yaw);
        self.schedule();
    }

    /// Allowed yaw range `(min, max)` in degrees.
    #[must_use]
    pub fn yaw_bounds(&self) -> (f64, f64) {
        (self.view.min_yaw, self.view.max_yaw)
    }

    /// Restrict the yaw range (inputs clamped into `[-180, 180]`).
    pub fn set_yaw_bounds(&mut self, min: f64, max: f64) {
        self.view.set_yaw_bounds(min, max);
    }

    /// Horizontal field of view in degrees.
    #[must_use]
    pub fn hfov(&self) -> f64 {
        self.view.hfov
    }

    /// Zoom to a field of view, clamped to the allowed range.
    pub fn set_hfov(&mut self, hfov: f64) {
        let min = self.effective_min_hfov();
        self.view.set_hfov(hfov, min);
        self.schedule();
    }

    /// Allowed field-of-view range `(min, max)` in degrees.
    #[must_use]
    pub fn hfov_bounds(&self) -> (f64, f64) {
        (self.view.min_hfov, self.view.max_hfov)
    }

    /// Restrict the field-of-view range (non-negative).
    pub fn set_hfov_bounds(&mut self, min: f64, max: f64) {
        self.view.set_hfov_bounds(min, max);
    }

    /// North offset of the active scene in degrees.
    #[must_use]
    pub fn north_offset(&self) -> f64 {
        self.view.north_offset
    }

    /// Recalibrate the scene's north offset.
    pub fn set_north_offset(&mut self, heading: f64) {
        self.view.set_north_offset(heading);
        self.schedule();
    }

    /// Compass needle heading for the current view, in degrees.
    #[must_use]
    pub fn compass_heading(&self) -> f64 {
        -self.view.yaw - self.view.north_offset
    }

    /// Pitch and yaw of the panorama point under a screen position —
    /// the hotspot-authoring debug utility.
    #[must_use]
    pub fn mouse_event_to_coords(&self, x: f64, y: f64) -> (f64, f64) {
        let (w, h) = self.canvas_dims();
        projection::screen_to_sphere(
            x,
            y,
            w,
            h,
            self.view.pitch,
            self.view.yaw,
            self.view.hfov,
        )
    }
}

// ── Auto-rotation ──

impl Viewer {
    /// Begin continuous yaw drift.
    ///
    /// Without an explicit speed, the most recent speed is reused,
    /// falling back to 1°/s.
    pub fn start_auto_rotate(&mut self, speed: Option<f64>) {
        let speed = speed
            .or((self.stashed_auto_rotate != 0.0)
                .then_some(self.stashed_auto_rotate))
            .unwrap_or(1.0);
        self.view.auto_rotate = speed;
        self.stashed_auto_rotate = speed;
        self.prev_tick = None;
        self.schedule();
    }

    /// Stop continuous yaw drift immediately, dropping any residual
    /// coasting the rotation built up. The speed is remembered for
    /// [`start_auto_rotate`](Self::start_auto_rotate) and for the
    /// inactivity restart, when one is configured.
    pub fn stop_auto_rotate(&mut self) {
        if self.view.auto_rotate != 0.0 {
            self.stashed_auto_rotate = self.view.auto_rotate;
        }
        self.view.auto_rotate = 0.0;
        self.inertia.clear_pan();
    }

    /// Current auto-rotation speed in degrees per second (0 when off).
    #[must_use]
    pub fn auto_rotate_speed(&self) -> f64 {
        self.view.auto_rotate
    }
}

// ── Zoom & display ──

impl Viewer {
    /// Step zoom in by 5°, for a zoom control.
    pub fn zoom_in(&mut self) {
        if self.loaded {
            self.set_hfov(self.view.hfov - 5.0);
        }
    }

    /// Step zoom out by 5°, for a zoom control.
    pub fn zoom_out(&mut self) {
        if self.loaded {
            self.set_hfov(self.view.hfov + 5.0);
        }
    }

    /// Force continuous redraw for dynamic sources (video panoramas).
    pub fn set_update(&mut self, update: bool) {
        self.update_always = update;
        self.schedule();
    }

    /// Ask the host to toggle fullscreen presentation. The outcome
    /// arrives via [`fullscreen_changed`](Self::fullscreen_changed).
    pub fn toggle_fullscreen(&mut self) {
        if self.loaded && !self.error_shown {
            let target = !self.fullscreen;
            self.host.set_fullscreen(target);
        }
    }

    /// The host's fullscreen state changed (user action included).
    pub fn fullscreen_changed(&mut self, active: bool) {
        self.fullscreen = active;
        self.resize();
    }

    /// Whether fullscreen presentation is active.
    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// The canvas container was resized: propagate to the renderer and
    /// re-clamp the field of view against the new geometry.
    pub fn resize(&mut self) {
        self.renderer.resize();
        let hfov = self.view.hfov;
        let min = self.effective_min_hfov();
        self.view.set_hfov(hfov, min);
        self.schedule();
    }
}

// ── Scene & hotspots ──

impl Viewer {
    /// Id of the active scene, if the tour uses scenes.
    #[must_use]
    pub fn scene(&self) -> Option<&str> {
        self.view.scene_id.as_deref()
    }

    /// Active configuration snapshot.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Projected hotspots of the active scene.
    #[must_use]
    pub fn hotspots(&self) -> &[ProjectedHotSpot] {
        self.hotspots.spots()
    }

    /// Show or hide one hotspot without reloading the scene (driven by
    /// the external session's artifact state). `false` for unknown ids.
    pub fn set_hotspot_visible(&mut self, id: &str, shown: bool) -> bool {
        let changed = self.hotspots.set_shown(id, shown);
        if changed {
            self.schedule();
        }
        changed
    }

    /// Topmost interactive hotspot under a screen position.
    #[must_use]
    pub fn hotspot_at(&self, x: f64, y: f64) -> Option<&crate::config::HotSpot> {
        self.hotspots.hit_test(x, y)
    }

    /// Activate a hotspot by id: link hotspots switch scenes with their
    /// configured target pointing, other kinds are chrome-level no-ops.
    pub fn activate_hotspot(&mut self, id: &str) -> Result<(), PanoError> {
        let spot = self
            .hotspots
            .spots()
            .iter()
            .find(|p| p.spot.id == id && p.interactive())
            .map(|p| p.spot.clone())
            .ok_or_else(|| {
                PanoError::Configuration(format!(
                    "no interactive hotspot '{id}'"
                ))
            })?;
        match (spot.kind, spot.scene_id) {
            (crate::config::HotSpotKind::Link, Some(scene_id)) => self
                .load_scene(
                    &scene_id,
                    spot.target_pitch,
                    spot.target_yaw,
                    spot.target_hfov,
                ),
            _ => Ok(()),
        }
    }

    /// Take the still frame captured for the current crossfade; the
    /// chrome layer overlays and fades it for
    /// [`fade_duration`](Self::fade_duration).
    #[must_use]
    pub fn take_fade_frame(&mut self) -> Option<StillFrame> {
        self.fade_frame.take()
    }

    /// Configured crossfade duration.
    #[must_use]
    pub fn fade_duration(&self) -> Duration {
        Duration::from_secs_f64(
            self.config.scene_fade_duration.max(0.0) / 1000.0,
        )
    }
}

// ── Events & lifecycle state ──

impl Viewer {
    /// Subscribe a listener to one event kind.
    pub fn on(&mut self, kind: EventKind, listener: Listener) -> ListenerId {
        self.listeners.add(kind, listener)
    }

    /// Remove one listener, or all listeners of a kind when `id` is
    /// `None`.
    pub fn off(&mut self, kind: EventKind, id: Option<ListenerId>) {
        match id {
            Some(id) => {
                let _ = self.listeners.remove(kind, id);
            }
            None => self.listeners.remove_kind(kind),
        }
    }

    /// Remove every listener.
    pub fn off_all(&mut self) {
        self.listeners.clear();
    }

    /// Whether the active scene finished loading and the viewer is
    /// interactive.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether an error panel is currently shown.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error_shown
    }

    /// Begin following the device-orientation sensor. Any pointer or
    /// keyboard interaction stops the subscription again.
    pub fn start_orientation(&mut self) {
        if !self.orientation_active {
            self.orientation_active = true;
            self.host.subscribe_orientation();
        }
    }

    /// Stop following the device-orientation sensor.
    pub fn stop_orientation(&mut self) {
        if self.orientation_active {
            self.orientation_active = false;
            self.host.unsubscribe_orientation();
        }
    }
}
