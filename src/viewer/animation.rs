//! Per-tick motion for [`Viewer`]: key-repeat panning and zooming,
//! auto-rotation, and inertia.

use web_time::Instant;

use super::Viewer;
use crate::animation::inertia::FRICTION;
use crate::input::KeyDirection;

impl Viewer {
    /// Advance key-repeat, auto-rotation, and inertia by the time since
    /// the previous tick.
    ///
    /// Not called while a drag is active — drags write the view
    /// directly. Key panning scales with the current field of view
    /// (faster when zoomed out) and the per-frame step is capped so a
    /// stalled tab cannot jump the view.
    pub(crate) fn advance(&mut self, now: Instant) {
        if !self.loaded {
            return;
        }
        let prev = self.prev_tick.unwrap_or(now);
        let dt_ms = now.saturating_duration_since(prev).as_secs_f64() * 1000.0;
        let prev_pitch = self.view.pitch;
        let prev_yaw = self.view.yaw;
        let prev_hfov = self.view.hfov;

        let diff = (dt_ms * self.view.hfov / 1700.0).min(1.0);
        let min_hfov = self.effective_min_hfov();
        let mut key_down = false;

        if self.keys.is_down(KeyDirection::ZoomOut) && self.config.keyboard_zoom
        {
            let step = (self.inertia.zoom_speed * 0.8 + 0.5) * diff;
            self.view.set_hfov(self.view.hfov + step, min_hfov);
            key_down = true;
        }
        if self.keys.is_down(KeyDirection::ZoomIn) && self.config.keyboard_zoom
        {
            let step = (self.inertia.zoom_speed * 0.8 - 0.2) * diff;
            self.view.set_hfov(self.view.hfov + step, min_hfov);
            key_down = true;
        }
        if self.keys.is_down(KeyDirection::Up) {
            self.view.pitch += (self.inertia.pitch_speed * 0.8 + 0.2) * diff;
            key_down = true;
        }
        if self.keys.is_down(KeyDirection::Down) {
            self.view.pitch += (self.inertia.pitch_speed * 0.8 - 0.2) * diff;
            key_down = true;
        }
        if self.keys.is_down(KeyDirection::Left) {
            self.view.yaw += (self.inertia.yaw_speed * 0.8 - 0.2) * diff;
            key_down = true;
        }
        if self.keys.is_down(KeyDirection::Right) {
            self.view.yaw += (self.inertia.yaw_speed * 0.8 + 0.2) * diff;
            key_down = true;
        }
        if key_down {
            self.latest_interaction = now;
        }

        // Auto-rotation, with the optional park countdown.
        if self.view.auto_rotate != 0.0 {
            if dt_ms > 0.001 {
                self.view.yaw -= self.view.auto_rotate * dt_ms / 1000.0;
            }
            if let Some(remaining) = self.auto_rotate_stop_countdown {
                let remaining = remaining - dt_ms;
                if remaining <= 0.0 {
                    log::debug!("auto-rotation parked after its stop delay");
                    self.auto_rotate_stop_countdown = None;
                    self.view.auto_rotate = 0.0;
                    self.stashed_auto_rotate = 0.0;
                } else {
                    self.auto_rotate_stop_countdown = Some(remaining);
                }
            }
        }

        // Inertia: residual motion decays with friction, paused on axes
        // with live key input.
        if diff > 0.0 {
            if !self.keys.horizontal_held() {
                self.view.yaw += self.inertia.yaw_speed * diff * FRICTION;
            }
            if !self.keys.vertical_held() {
                self.view.pitch += self.inertia.pitch_speed * diff * FRICTION;
            }
            if !self.keys.zoom_held() {
                self.view.set_hfov(
                    self.view.hfov
                        + self.inertia.zoom_speed * diff * FRICTION,
                    min_hfov,
                );
            }
        }

        self.prev_tick = Some(now);
        if diff > 0.0 {
            self.inertia.blend(
                self.view.yaw - prev_yaw,
                self.view.pitch - prev_pitch,
                self.view.hfov - prev_hfov,
                diff,
            );
        }

        // Opposing keys cancel their axis.
        if self.keys.is_down(KeyDirection::ZoomOut)
            && self.keys.is_down(KeyDirection::ZoomIn)
        {
            self.inertia.zoom_speed = 0.0;
        }
        if self.keys.is_down(KeyDirection::Up)
            && self.keys.is_down(KeyDirection::Down)
        {
            self.inertia.pitch_speed = 0.0;
        }
        if self.keys.is_down(KeyDirection::Left)
            && self.keys.is_down(KeyDirection::Right)
        {
            self.inertia.yaw_speed = 0.0;
        }
    }
}
