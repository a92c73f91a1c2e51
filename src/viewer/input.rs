//! Input dispatch for [`Viewer`]: one drag model for every pointer
//! family, plus wheel, keyboard, and orientation handling.

use glam::DVec2;
use web_time::{Duration, Instant};

use super::Viewer;
use crate::camera::projection;
use crate::input::orientation::{sample_to_angles, OrientationSample};
use crate::input::{
    DragSession, DragSource, InputEvent, KeyDirection, PointerSource,
};

/// Gap since the last motion beyond which releasing a drag clears the
/// pan velocities, so a stop-and-release does not fling the view.
const DRAG_SETTLE_GAP: Duration = Duration::from_millis(150);

impl Viewer {
    /// Process one normalized input event.
    ///
    /// `now` is the host's timestamp for the event; all inactivity and
    /// inertia timing derives from it.
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) {
        if self.destroyed {
            return;
        }
        match event {
            InputEvent::PointerDown { source, x, y } => {
                self.pointer_down(source, DVec2::new(x, y), now);
            }
            InputEvent::PointerMove { source, x, y } => {
                self.pointer_move(source, DVec2::new(x, y), now);
            }
            InputEvent::PointerUp { source } => self.pointer_up(source, now),
            InputEvent::Wheel { delta } => self.wheel(delta, now),
            InputEvent::Key { direction, pressed } => {
                self.key(direction, pressed, now);
            }
            InputEvent::FocusLost => self.keys.clear(),
            InputEvent::Orientation(sample) => self.orientation_sample(sample),
        }
    }

    /// Bookkeeping shared by every explicit interaction: park
    /// auto-rotation (remembering the speed), reset the inactivity
    /// timer, drop the orientation subscription, zero roll, and preempt
    /// a pending deferred restart.
    fn interaction_begin(&mut self, now: Instant) {
        if self.view.auto_rotate != 0.0 {
            self.stashed_auto_rotate = self.view.auto_rotate;
            self.view.auto_rotate = 0.0;
        }
        self.latest_interaction = now;
        self.view.roll = 0.0;
        if self.orientation_active {
            self.orientation_active = false;
            self.host.unsubscribe_orientation();
        }
        if self.scheduler.interrupt() {
            self.host.cancel_wake();
        }
    }

    fn pointer_down(&mut self, source: PointerSource, pos: DVec2, now: Instant) {
        if !self.loaded {
            return;
        }
        self.interaction_begin(now);
        self.inertia.zoom_speed = 0.0;

        match source.touch_id() {
            None => {
                self.drag = Some(DragSession {
                    source: DragSource::Mouse,
                    anchor: pos,
                    anchor_yaw: self.view.yaw,
                    anchor_pitch: self.view.pitch,
                    pinch_dist: None,
                });
            }
            Some(id) => {
                let _ = self.pointers.down(id, pos);
                self.anchor_touch_drag();
            }
        }
        self.schedule();
    }

    fn pointer_move(&mut self, source: PointerSource, pos: DVec2, now: Instant) {
        match source.touch_id() {
            None => {
                if self.loaded && self.drag_source() == Some(DragSource::Mouse)
                {
                    self.latest_interaction = now;
                    self.mouse_drag_move(pos);
                }
            }
            Some(id) => {
                if !self.pointers.update(id, pos) {
                    return;
                }
                if self.loaded {
                    self.latest_interaction = now;
                    if self.drag_source() == Some(DragSource::Touch) {
                        self.touch_drag_move();
                    }
                }
            }
        }
    }

    fn pointer_up(&mut self, source: PointerSource, now: Instant) {
        match source.touch_id() {
            None => {
                if self.drag_source() == Some(DragSource::Mouse) {
                    self.end_drag(now);
                }
            }
            Some(id) => {
                if self.pointers.up(id) {
                    self.end_drag(now);
                } else if self.drag_source() == Some(DragSource::Touch) {
                    // Fingers remain: re-anchor around the survivors so
                    // the gesture continues without a positional jump.
                    self.anchor_touch_drag();
                }
            }
        }
    }

    fn wheel(&mut self, delta: f64, now: Instant) {
        if !self.loaded || !self.config.mouse_zoom {
            return;
        }
        self.interaction_begin(now);
        let min = self.effective_min_hfov();
        self.view.set_hfov(self.view.hfov - delta * 0.05, min);
        self.inertia.zoom_speed = if delta < 0.0 { 1.0 } else { -1.0 };
        self.schedule();
    }

    fn key(&mut self, direction: KeyDirection, pressed: bool, now: Instant) {
        if pressed {
            self.interaction_begin(now);
        }
        if self.keys.set(direction, pressed) && pressed {
            self.prev_tick = Some(now);
            self.schedule();
        }
    }

    fn orientation_sample(&mut self, sample: OrientationSample) {
        // Orientation steering yields to any explicit pointer drag and is
        // the only input allowed to write roll.
        if !self.orientation_active || self.drag.is_some() {
            return;
        }
        let angles = sample_to_angles(&sample);
        self.view.pitch = angles.pitch;
        self.view.roll = angles.roll;
        self.view.yaw = angles.yaw + self.view.north_offset;
        self.schedule();
    }

    // ── Drag mechanics ──

    fn drag_source(&self) -> Option<DragSource> {
        self.drag.map(|d| d.source)
    }

    /// (Re-)anchor the touch drag at the current gesture center with the
    /// current view, capturing the pinch distance when two fingers are
    /// down.
    fn anchor_touch_drag(&mut self) {
        let Some(center) = self.pointers.gesture_center() else {
            return;
        };
        self.drag = Some(DragSession {
            source: DragSource::Touch,
            anchor: center,
            anchor_yaw: self.view.yaw,
            anchor_pitch: self.view.pitch,
            pinch_dist: self.pointers.pinch_distance(),
        });
    }

    /// Mouse pan: arctangent model scaled by the field of view, with the
    /// 0.2 velocity blend feeding inertia.
    fn mouse_drag_move(&mut self, pos: DVec2) {
        let Some(drag) = self.drag else { return };
        let (w, h) = self.canvas_dims();

        let yaw = ((drag.anchor.x / w * 2.0 - 1.0).atan()
            - (pos.x / w * 2.0 - 1.0).atan())
        .to_degrees()
            * self.view.hfov
            / 90.0
            + drag.anchor_yaw;
        self.inertia.yaw_speed = (yaw - self.view.yaw) % 360.0 * 0.2;
        self.view.yaw = yaw;

        let vfov = projection::vertical_fov(self.view.hfov, w, h);
        let pitch = ((pos.y / h * 2.0 - 1.0).atan()
            - (drag.anchor.y / h * 2.0 - 1.0).atan())
        .to_degrees()
            * vfov
            / 90.0
            + drag.anchor_pitch;
        self.inertia.pitch_speed = (pitch - self.view.pitch) * 0.2;
        self.view.pitch = pitch;
    }

    /// Touch pan: linear model whose coefficient shrinks with the field
    /// of view so the content tracks the finger at any zoom, plus pinch
    /// zoom when two fingers are down.
    fn touch_drag_move(&mut self) {
        let Some(mut drag) = self.drag else { return };
        let Some(center) = self.pointers.gesture_center() else {
            return;
        };

        if let (Some(anchor_dist), Some(current_dist)) =
            (drag.pinch_dist, self.pointers.pinch_distance())
        {
            let min = self.effective_min_hfov();
            self.view.set_hfov(
                self.view.hfov + (anchor_dist - current_dist) * 0.1,
                min,
            );
            drag.pinch_dist = Some(current_dist);
            self.drag = Some(drag);
        }

        let coeff = self.view.hfov / 360.0;
        let yaw = (drag.anchor.x - center.x) * coeff + drag.anchor_yaw;
        self.inertia.yaw_speed = (yaw - self.view.yaw) % 360.0 * 0.2;
        self.view.yaw = yaw;

        let pitch = (center.y - drag.anchor.y) * coeff + drag.anchor_pitch;
        self.inertia.pitch_speed = (pitch - self.view.pitch) * 0.2;
        self.view.pitch = pitch;
    }

    fn end_drag(&mut self, now: Instant) {
        if self.drag.take().is_none() {
            return;
        }
        self.pointers.clear();
        if now.saturating_duration_since(self.latest_interaction)
            > DRAG_SETTLE_GAP
        {
            self.inertia.clear_pan();
        }
        self.latest_interaction = now;
    }
}

#[cfg(test)]
mod tests {
    use web_time::{Duration, Instant};

    use super::super::harness::{loaded_viewer, tour, viewer_with};
    use crate::input::{
        InputEvent, KeyDirection, OrientationSample, PointerSource,
    };

    fn down(source: PointerSource, x: f64, y: f64) -> InputEvent {
        InputEvent::PointerDown { source, x, y }
    }

    fn mv(source: PointerSource, x: f64, y: f64) -> InputEvent {
        InputEvent::PointerMove { source, x, y }
    }

    fn up(source: PointerSource) -> InputEvent {
        InputEvent::PointerUp { source }
    }

    #[test]
    fn mouse_drag_pans_the_view() {
        let (mut viewer, _rig) = loaded_viewer();
        let t0 = Instant::now();

        viewer.handle_input(down(PointerSource::Mouse, 400.0, 300.0), t0);
        viewer.handle_input(
            mv(PointerSource::Mouse, 300.0, 300.0),
            t0 + Duration::from_millis(16),
        );

        // Dragging left turns the view right (positive yaw delta).
        assert!(viewer.yaw() > 0.0, "yaw {}", viewer.yaw());
        assert!(viewer.inertia.yaw_speed > 0.0);
        assert_eq!(viewer.pitch(), 0.0);

        viewer.handle_input(
            up(PointerSource::Mouse),
            t0 + Duration::from_millis(32),
        );
        assert!(viewer.drag.is_none());
        // Release right after motion keeps the momentum.
        assert!(viewer.inertia.yaw_speed > 0.0);
    }

    #[test]
    fn late_release_clears_pan_momentum() {
        let (mut viewer, _rig) = loaded_viewer();
        let t0 = Instant::now();

        viewer.handle_input(down(PointerSource::Mouse, 400.0, 300.0), t0);
        viewer.handle_input(
            mv(PointerSource::Mouse, 350.0, 280.0),
            t0 + Duration::from_millis(16),
        );
        assert!(viewer.inertia.yaw_speed != 0.0);

        viewer.handle_input(
            up(PointerSource::Mouse),
            t0 + Duration::from_millis(500),
        );
        assert_eq!(viewer.inertia.yaw_speed, 0.0);
        assert_eq!(viewer.inertia.pitch_speed, 0.0);
    }

    #[test]
    fn two_finger_lift_keeps_the_drag_alive() {
        let (mut viewer, _rig) = loaded_viewer();
        let t0 = Instant::now();
        let f1 = PointerSource::SyntheticPointer(1);
        let f2 = PointerSource::SyntheticPointer(2);

        viewer.handle_input(down(f1, 300.0, 300.0), t0);
        viewer.handle_input(down(f2, 500.0, 300.0), t0);
        assert!(viewer.drag.is_some());
        assert_eq!(viewer.drag.unwrap().pinch_dist, Some(200.0));

        // One finger lifts: the drag survives on the survivor.
        viewer.handle_input(up(f1), t0 + Duration::from_millis(50));
        assert!(viewer.drag.is_some(), "drag must not end yet");
        assert_eq!(viewer.drag.unwrap().pinch_dist, None);

        // The surviving finger still pans.
        let yaw_before = viewer.yaw();
        viewer.handle_input(
            mv(f2, 400.0, 300.0),
            t0 + Duration::from_millis(66),
        );
        assert!(viewer.yaw() != yaw_before, "single survivor must pan");

        // Last finger lifts: now the drag ends.
        viewer.handle_input(up(f2), t0 + Duration::from_millis(80));
        assert!(viewer.drag.is_none());
        assert_eq!(viewer.pointers.active(), 0);
    }

    #[test]
    fn pinch_zoom_narrows_the_field_of_view() {
        let (mut viewer, _rig) = loaded_viewer();
        let t0 = Instant::now();
        let f1 = PointerSource::Touch(1);
        let f2 = PointerSource::Touch(2);
        let hfov_before = viewer.hfov();

        viewer.handle_input(down(f1, 300.0, 300.0), t0);
        viewer.handle_input(down(f2, 500.0, 300.0), t0);

        // Fingers moving apart zooms in: hfov + (anchor - current) * 0.1.
        viewer.handle_input(
            mv(f1, 250.0, 300.0),
            t0 + Duration::from_millis(16),
        );
        assert_eq!(viewer.hfov(), hfov_before - 5.0);
    }

    #[test]
    fn touch_pan_uses_the_linear_coefficient() {
        let (mut viewer, _rig) = loaded_viewer();
        let t0 = Instant::now();
        let f1 = PointerSource::Touch(1);

        viewer.handle_input(down(f1, 400.0, 300.0), t0);
        viewer.handle_input(
            mv(f1, 300.0, 300.0),
            t0 + Duration::from_millis(16),
        );
        // coeff = hfov/360 = 100/360; anchor - pos = 100 px.
        assert!((viewer.yaw() - 100.0 * (100.0 / 360.0)).abs() < 1e-9);
    }

    #[test]
    fn wheel_zoom_respects_the_mouse_zoom_flag() {
        let (mut viewer, _rig) = loaded_viewer();
        let t0 = Instant::now();
        let before = viewer.hfov();

        viewer.handle_input(InputEvent::Wheel { delta: 120.0 }, t0);
        assert_eq!(viewer.hfov(), before - 6.0);
        assert_eq!(viewer.inertia.zoom_speed, -1.0);

        let mut tour = tour();
        tour.default.mouse_zoom = Some(false);
        let (mut viewer, _rig) = viewer_with(tour);
        viewer.tick(t0);
        let before = viewer.hfov();
        viewer.handle_input(InputEvent::Wheel { delta: 120.0 }, t0);
        assert_eq!(viewer.hfov(), before);
    }

    #[test]
    fn interactions_park_auto_rotation_and_remember_the_speed() {
        let (mut viewer, _rig) = loaded_viewer();
        viewer.start_auto_rotate(Some(-2.0));
        assert_eq!(viewer.auto_rotate_speed(), -2.0);

        let t0 = Instant::now();
        viewer.handle_input(down(PointerSource::Mouse, 400.0, 300.0), t0);
        assert_eq!(viewer.auto_rotate_speed(), 0.0);
        assert_eq!(viewer.stashed_auto_rotate, -2.0);
    }

    #[test]
    fn pointer_interaction_cancels_orientation_follow() {
        let (mut viewer, rig) = loaded_viewer();
        viewer.start_orientation();

        let sample = OrientationSample {
            alpha: 30.0,
            beta: 90.0,
            gamma: 0.0,
            screen_angle: 0.0,
        };
        viewer.handle_input(
            InputEvent::Orientation(sample),
            Instant::now(),
        );
        // Orientation wrote the view, including yaw + north offset.
        assert!((viewer.yaw() - (-30.0 + 30.0)).abs() < 1e-6);

        viewer.handle_input(
            down(PointerSource::Mouse, 400.0, 300.0),
            Instant::now(),
        );
        assert!(!rig.host.borrow().orientation_subscribed);
        assert_eq!(viewer.view.roll, 0.0);

        // Samples are ignored once the subscription is gone.
        let yaw = viewer.yaw();
        viewer.handle_input(
            InputEvent::Orientation(sample),
            Instant::now(),
        );
        assert_eq!(viewer.yaw(), yaw);
    }

    #[test]
    fn orientation_yields_to_an_active_drag() {
        let (mut viewer, _rig) = loaded_viewer();
        let t0 = Instant::now();
        viewer.handle_input(down(PointerSource::Mouse, 400.0, 300.0), t0);
        // Re-subscribing mid-drag must not steer while the drag lives.
        viewer.start_orientation();

        let pitch = viewer.pitch();
        viewer.handle_input(
            InputEvent::Orientation(OrientationSample {
                alpha: 0.0,
                beta: 120.0,
                gamma: 0.0,
                screen_angle: 0.0,
            }),
            t0,
        );
        assert_eq!(viewer.pitch(), pitch);
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let (mut viewer, _rig) = loaded_viewer();
        let t0 = Instant::now();
        viewer.handle_input(
            InputEvent::Key {
                direction: KeyDirection::Left,
                pressed: true,
            },
            t0,
        );
        assert!(viewer.keys.any_down());

        viewer.handle_input(InputEvent::FocusLost, t0);
        assert!(!viewer.keys.any_down());
    }

    #[test]
    fn pointer_input_is_ignored_before_load() {
        let mut tour = tour();
        tour.overrides.auto_load = Some(false);
        let (mut viewer, _rig) = viewer_with(tour);

        viewer.handle_input(
            down(PointerSource::Mouse, 400.0, 300.0),
            Instant::now(),
        );
        assert!(viewer.drag.is_none());
    }
}
