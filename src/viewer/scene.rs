//! Scene transitions for [`Viewer`].
//!
//! A transition runs unload → optional fade capture → config refold →
//! pointing → `scenechange` → fresh load cycle. The fade still is
//! captured at most once; while it is pending, the most recent
//! `load_scene` call's target wins.

use super::Viewer;
use crate::config::SceneTarget;
use crate::error::PanoError;
use crate::event::ViewerEvent;
use crate::renderer::{RenderOptions, RenderView};

/// A transition waiting on its prepared fade still.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingTransition {
    pub(crate) scene_id: String,
    pub(crate) pitch: SceneTarget,
    pub(crate) yaw: SceneTarget,
    pub(crate) hfov: SceneTarget,
}

impl Viewer {
    /// Switch to another scene of the tour.
    ///
    /// `pitch`, `yaw`, and `hfov` choose the initial pointing:
    /// [`SceneTarget::Same`] carries the current value across,
    /// [`SceneTarget::SameAzimuth`] (yaw only) preserves the absolute
    /// compass heading across differing scene north offsets, and
    /// [`SceneTarget::SceneDefault`] defers to the new scene's
    /// configuration.
    ///
    /// An unknown scene id is an error and leaves the current scene
    /// untouched. Calls made while a previous transition's fade still is
    /// pending replace that transition's target.
    pub fn load_scene(
        &mut self,
        scene_id: &str,
        pitch: SceneTarget,
        yaw: SceneTarget,
        hfov: SceneTarget,
    ) -> Result<(), PanoError> {
        if self.destroyed {
            return Ok(());
        }
        if !self.tour.has_scene(scene_id) {
            let err = PanoError::SceneNotFound(scene_id.to_owned());
            log::error!("{err}");
            return Err(err);
        }

        if self.pending_transition.is_some() {
            // Fade already prepared — the latest target wins.
            log::debug!("replacing pending transition with '{scene_id}'");
            self.pending_transition = Some(PendingTransition {
                scene_id: scene_id.to_owned(),
                pitch,
                yaw,
                hfov,
            });
            return Ok(());
        }

        if !self.loaded {
            log::debug!("load_scene('{scene_id}') ignored while loading");
            return Ok(());
        }

        if self.config.scene_fade_duration > 0.0 {
            let still = self.renderer.render(
                RenderView {
                    pitch: self.view.pitch.to_radians(),
                    yaw: self.view.yaw.to_radians(),
                    hfov: self.view.hfov.to_radians(),
                    roll: self.view.roll.to_radians(),
                },
                RenderOptions { return_image: true },
            );
            if let Some(still) = still {
                self.fade_frame = Some(still);
                self.loaded = false;
                self.pending_transition = Some(PendingTransition {
                    scene_id: scene_id.to_owned(),
                    pitch,
                    yaw,
                    hfov,
                });
                self.schedule();
                return Ok(());
            }
            // Capture unavailable — skip the fade and switch directly.
            log::warn!("fade capture unavailable; skipping crossfade");
        }

        self.enter_scene(&PendingTransition {
            scene_id: scene_id.to_owned(),
            pitch,
            yaw,
            hfov,
        })
    }

    /// Complete the transition whose fade still was prepared on a
    /// previous tick.
    pub(crate) fn finish_pending_transition(&mut self) {
        if let Some(transition) = self.pending_transition.take() {
            if let Err(e) = self.enter_scene(&transition) {
                self.show_error(&e);
            }
        }
    }

    /// Tear down the old scene, refold configuration, apply pointing,
    /// announce the change, and start a fresh load cycle.
    fn enter_scene(
        &mut self,
        transition: &PendingTransition,
    ) -> Result<(), PanoError> {
        let old_pitch = self.view.pitch;
        let old_yaw = self.view.yaw;
        let old_hfov = self.view.hfov;
        let old_north = self.view.north_offset;

        self.hotspots.destroy();

        let (config, locks) =
            self.tour.resolve(Some(transition.scene_id.as_str()))?;
        self.config = config;
        self.locks = locks;
        self.view.apply_config(&self.config);
        self.auto_rotate_stop_countdown = self.config.auto_rotate_stop_delay;

        // All residual motion stops at the boundary.
        self.inertia.clear();

        match transition.pitch {
            SceneTarget::SceneDefault => {}
            SceneTarget::Value(v) => self.view.pitch = v,
            SceneTarget::Same | SceneTarget::SameAzimuth => {
                self.view.pitch = old_pitch;
            }
        }
        match transition.yaw {
            SceneTarget::SceneDefault => {}
            SceneTarget::Value(v) => self.view.set_yaw(v),
            SceneTarget::Same => self.view.set_yaw(old_yaw),
            SceneTarget::SameAzimuth => {
                self.view.set_yaw(
                    old_yaw + old_north - self.view.north_offset,
                );
            }
        }
        let min_hfov = self.effective_min_hfov();
        match transition.hfov {
            SceneTarget::SceneDefault => {}
            SceneTarget::Value(v) => self.view.set_hfov(v, min_hfov),
            SceneTarget::Same | SceneTarget::SameAzimuth => {
                self.view.set_hfov(old_hfov, min_hfov);
            }
        }

        self.listeners.emit(&ViewerEvent::SceneChange {
            scene_id: transition.scene_id.clone(),
        });
        self.load();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use web_time::{Duration, Instant};

    use super::super::harness::{tick_until_idle, tour, viewer_with};
    use crate::config::SceneTarget;
    use crate::error::PanoError;
    use crate::event::{EventKind, ViewerEvent};

    #[test]
    fn same_pointing_survives_the_transition() {
        let (mut viewer, rig) = viewer_with(tour());
        let t0 = Instant::now();
        viewer.tick(t0);
        assert!(viewer.is_loaded());

        viewer.set_pitch(10.0);
        viewer.set_yaw(20.0);
        viewer.set_hfov(90.0);

        let events = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&events);
        let _ = viewer.on(
            EventKind::SceneChange,
            Box::new(move |e| {
                if let ViewerEvent::SceneChange { scene_id } = e {
                    seen.borrow_mut().push(format!("scenechange:{scene_id}"));
                }
            }),
        );
        let seen = Rc::clone(&events);
        let _ = viewer.on(
            EventKind::Load,
            Box::new(move |_| seen.borrow_mut().push("load".to_owned())),
        );

        viewer
            .load_scene(
                "hallway",
                SceneTarget::Same,
                SceneTarget::Same,
                SceneTarget::Same,
            )
            .unwrap();
        tick_until_idle(&mut viewer, t0 + Duration::from_millis(16));

        assert_eq!(viewer.scene(), Some("hallway"));
        assert_eq!(viewer.pitch(), 10.0);
        assert_eq!(viewer.yaw(), 20.0);
        assert_eq!(viewer.hfov(), 90.0);
        assert_eq!(
            *events.borrow(),
            vec!["scenechange:hallway".to_owned(), "load".to_owned()]
        );
        assert_eq!(rig.renderer.borrow().inits, 2);
    }

    #[test]
    fn same_azimuth_preserves_compass_heading() {
        let (mut viewer, _rig) = viewer_with(tour());
        let t0 = Instant::now();
        viewer.tick(t0);

        viewer.set_yaw(20.0);
        let old_north = viewer.north_offset();

        viewer
            .load_scene(
                "hallway",
                SceneTarget::Same,
                SceneTarget::SameAzimuth,
                SceneTarget::Same,
            )
            .unwrap();
        tick_until_idle(&mut viewer, t0 + Duration::from_millis(16));

        let new_north = viewer.north_offset();
        assert_ne!(old_north, new_north, "fixture norths must differ");
        assert_eq!(viewer.yaw(), 20.0 + old_north - new_north);
    }

    #[test]
    fn unknown_scene_is_rejected_and_state_retained() {
        let (mut viewer, _rig) = viewer_with(tour());
        let t0 = Instant::now();
        viewer.tick(t0);
        viewer.set_pitch(5.0);

        let result = viewer.load_scene(
            "basement",
            SceneTarget::Same,
            SceneTarget::Same,
            SceneTarget::Same,
        );
        assert!(matches!(result, Err(PanoError::SceneNotFound(_))));
        assert_eq!(viewer.scene(), Some("kitchen"));
        assert_eq!(viewer.pitch(), 5.0);
        assert!(viewer.is_loaded());
    }

    #[test]
    fn scene_default_pointing_uses_the_new_scene_config() {
        let mut tour = tour();
        let hall = tour.scenes.get_mut("hallway").unwrap();
        hall.pitch = Some(-15.0);
        hall.yaw = Some(60.0);

        let (mut viewer, _rig) = viewer_with(tour);
        let t0 = Instant::now();
        viewer.tick(t0);
        viewer.set_pitch(10.0);

        viewer
            .load_scene(
                "hallway",
                SceneTarget::SceneDefault,
                SceneTarget::SceneDefault,
                SceneTarget::SceneDefault,
            )
            .unwrap();
        tick_until_idle(&mut viewer, t0 + Duration::from_millis(16));

        assert_eq!(viewer.pitch(), -15.0);
        assert_eq!(viewer.yaw(), 60.0);
    }

    #[test]
    fn fade_capture_defers_the_switch_one_frame() {
        let mut tour = tour();
        tour.default.scene_fade_duration = Some(1000.0);
        let (mut viewer, rig) = viewer_with(tour);
        rig.renderer.borrow_mut().capture_supported = true;

        let t0 = Instant::now();
        viewer.tick(t0);
        assert!(viewer.is_loaded());

        viewer
            .load_scene(
                "hallway",
                SceneTarget::Same,
                SceneTarget::Same,
                SceneTarget::Same,
            )
            .unwrap();
        // Captured but not yet switched.
        assert_eq!(viewer.scene(), Some("kitchen"));
        assert!(!viewer.is_loaded());

        tick_until_idle(&mut viewer, t0 + Duration::from_millis(16));
        assert_eq!(viewer.scene(), Some("hallway"));
        assert!(viewer.is_loaded());
        assert!(viewer.take_fade_frame().is_some());
        assert!(viewer.take_fade_frame().is_none());
    }

    #[test]
    fn overlapping_transitions_let_the_last_target_win() {
        let mut tour = tour();
        tour.default.scene_fade_duration = Some(1000.0);
        let (mut viewer, rig) = viewer_with(tour);
        rig.renderer.borrow_mut().capture_supported = true;

        let t0 = Instant::now();
        viewer.tick(t0);

        viewer
            .load_scene(
                "hallway",
                SceneTarget::Same,
                SceneTarget::Same,
                SceneTarget::Same,
            )
            .unwrap();
        viewer
            .load_scene(
                "kitchen",
                SceneTarget::Value(1.0),
                SceneTarget::Value(2.0),
                SceneTarget::Same,
            )
            .unwrap();

        let captures = rig
            .renderer
            .borrow()
            .renders
            .iter()
            .filter(|(_, opts)| opts.return_image)
            .count();
        assert_eq!(captures, 1, "the fade still is captured once");

        tick_until_idle(&mut viewer, t0 + Duration::from_millis(16));
        assert_eq!(viewer.scene(), Some("kitchen"));
        assert_eq!(viewer.pitch(), 1.0);
        assert_eq!(viewer.yaw(), 2.0);
    }

    #[test]
    fn failed_capture_skips_the_fade() {
        let mut tour = tour();
        tour.default.scene_fade_duration = Some(1000.0);
        let (mut viewer, rig) = viewer_with(tour);
        // capture_supported stays false: render(return_image) yields None

        let t0 = Instant::now();
        viewer.tick(t0);

        viewer
            .load_scene(
                "hallway",
                SceneTarget::Same,
                SceneTarget::Same,
                SceneTarget::Same,
            )
            .unwrap();
        // Direct switch, no pending frame.
        assert_eq!(viewer.scene(), Some("hallway"));
        assert!(viewer.take_fade_frame().is_none());
        assert_eq!(rig.renderer.borrow().inits, 2);
    }

    #[test]
    fn scene_change_resets_inertia() {
        let (mut viewer, _rig) = viewer_with(tour());
        let t0 = Instant::now();
        viewer.tick(t0);

        viewer.inertia.yaw_speed = 3.0;
        viewer
            .load_scene(
                "hallway",
                SceneTarget::Same,
                SceneTarget::Same,
                SceneTarget::Same,
            )
            .unwrap();
        assert_eq!(viewer.inertia.yaw_speed, 0.0);
    }
}
