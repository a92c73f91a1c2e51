//! The per-instance viewer engine.
//!
//! [`Viewer`] owns all view state, folds the tour configuration per
//! scene, normalizes input into the drag model, runs the animation loop
//! against the host scheduler, and drives the external renderer. Multiple
//! viewers are independently constructible and destructible — there is no
//! process-wide state.

mod accessors;
mod animation;
#[cfg(test)]
pub(crate) mod harness;
mod input;
mod scene;

use web_time::{Duration, Instant};

use crate::animation::scheduler::Directive;
use crate::animation::{FrameHost, FrameScheduler, InertiaState, TickSignals};
use crate::camera::{projection, ViewState};
use crate::config::{Config, MetadataLocks, PhotoMetadata, TourConfig};
use crate::error::PanoError;
use crate::event::{ListenerRegistry, ViewerEvent};
use crate::hotspot::HotspotOverlay;
use crate::input::{DragSession, KeyState, PointerTracker};
use crate::renderer::{
    Projection, RenderInit, RenderOptions, RenderView, Renderer, StillFrame,
};
use crate::viewer::scene::PendingTransition;

/// Panorama viewer engine.
///
/// The embedding forwards input events to
/// [`handle_input`](Self::handle_input), runs
/// [`tick`](Self::tick)/[`wake`](Self::wake) when the host scheduler
/// fires, and reacts to [`ViewerEvent`]s. Scene selection is typically
/// driven externally, e.g. by a multiplayer session service calling
/// [`load_scene`](Self::load_scene).
pub struct Viewer {
    pub(crate) tour: TourConfig,
    pub(crate) config: Config,
    pub(crate) locks: MetadataLocks,
    pub(crate) view: ViewState,
    pub(crate) renderer: Box<dyn Renderer>,
    pub(crate) host: Box<dyn FrameHost>,
    pub(crate) listeners: ListenerRegistry,
    pub(crate) scheduler: FrameScheduler,
    pub(crate) inertia: InertiaState,
    pub(crate) keys: KeyState,
    pub(crate) pointers: PointerTracker,
    pub(crate) drag: Option<DragSession>,
    pub(crate) hotspots: HotspotOverlay,
    pub(crate) pending_transition: Option<PendingTransition>,
    pub(crate) fade_frame: Option<StillFrame>,
    pub(crate) loaded: bool,
    pub(crate) loading: bool,
    pub(crate) error_shown: bool,
    pub(crate) update_always: bool,
    pub(crate) fullscreen: bool,
    pub(crate) orientation_active: bool,
    pub(crate) destroyed: bool,
    pub(crate) latest_interaction: Instant,
    pub(crate) prev_tick: Option<Instant>,
    /// Speed to restore when auto-rotation resumes after inactivity.
    pub(crate) stashed_auto_rotate: f64,
    /// Remaining milliseconds before auto-rotation parks permanently.
    pub(crate) auto_rotate_stop_countdown: Option<f64>,
}

impl Viewer {
    /// Construct a viewer for a tour.
    ///
    /// Resolves the start scene's configuration immediately; with
    /// `autoLoad` set, loading begins right away, otherwise the embedding
    /// calls [`load`](Self::load) (typically from a click-to-load
    /// control).
    pub fn new(
        tour: TourConfig,
        renderer: Box<dyn Renderer>,
        host: Box<dyn FrameHost>,
    ) -> Result<Self, PanoError> {
        let scene_id = tour.start_scene().map(str::to_owned);
        let (config, locks) = tour.resolve(scene_id.as_deref())?;
        let view = ViewState::from_config(&config);
        let stop_countdown = config.auto_rotate_stop_delay;
        let auto_load = config.auto_load;

        let mut viewer = Self {
            tour,
            config,
            locks,
            view,
            renderer,
            host,
            listeners: ListenerRegistry::new(),
            scheduler: FrameScheduler::new(),
            inertia: InertiaState::new(),
            keys: KeyState::new(),
            pointers: PointerTracker::new(),
            drag: None,
            hotspots: HotspotOverlay::new(),
            pending_transition: None,
            fade_frame: None,
            loaded: false,
            loading: false,
            error_shown: false,
            update_always: false,
            fullscreen: false,
            orientation_active: false,
            destroyed: false,
            latest_interaction: Instant::now(),
            prev_tick: None,
            stashed_auto_rotate: 0.0,
            auto_rotate_stop_countdown: stop_countdown,
        };
        if auto_load {
            viewer.load();
        }
        Ok(viewer)
    }

    /// Begin loading the current scene's source.
    ///
    /// Failures surface through the `error` event and the log rather
    /// than a return value; the viewer stays usable for a retry.
    pub fn load(&mut self) {
        if let Err(e) = self.begin_load() {
            self.show_error(&e);
        }
    }

    /// Run one animation frame.
    ///
    /// The host calls this for every frame granted after
    /// [`FrameHost::request_frame`]. Order within the tick: finish a
    /// prepared scene transition, detect load completion, render and
    /// reproject hotspots, then advance key-repeat/auto-rotate/inertia
    /// and decide whether the loop keeps running.
    pub fn tick(&mut self, now: Instant) {
        if self.destroyed {
            return;
        }

        if self.pending_transition.is_some() {
            self.finish_pending_transition();
        }
        if self.loading && !self.renderer.is_loading() {
            self.complete_load();
        }
        self.render_frame();

        let dragging = self.drag.is_some();
        if !dragging
            && (self.keys.any_down()
                || self.view.auto_rotate != 0.0
                || self.inertia.is_coasting())
        {
            self.advance(now);
            // Resume auto-rotation mid-loop once the inactivity delay
            // has elapsed.
            if self.restart_due(now).is_some_and(|d| d.is_zero()) {
                self.view.auto_rotate = self.stashed_auto_rotate;
            }
        }

        let mut signals = TickSignals {
            dragging,
            keys_down: self.keys.any_down(),
            auto_rotating: self.view.auto_rotate != 0.0,
            coasting: self.inertia.is_coasting(),
            renderer_busy: self.loading || self.renderer.is_loading(),
            dynamic_update: self.config.dynamic && self.update_always,
            restart_in: None,
        };
        if !signals.dragging && !signals.auto_rotating {
            if let Some(due) = self.restart_due(now) {
                if due.is_zero() {
                    self.view.auto_rotate = self.stashed_auto_rotate;
                    signals.auto_rotating = true;
                } else {
                    signals.restart_in = Some(due);
                }
            }
        }

        match self.scheduler.after_tick(now, &signals) {
            Directive::RequestFrame => self.host.request_frame(),
            Directive::DeferRestart(delay) => self.host.defer_wake(delay),
            Directive::Sleep => {}
        }
    }

    /// The deferred auto-rotate restart fired.
    ///
    /// Stale wakes (cancelled or superseded) are ignored.
    pub fn wake(&mut self, now: Instant) {
        if self.destroyed {
            return;
        }
        if self.scheduler.wake() {
            if self.stashed_auto_rotate != 0.0 {
                self.view.auto_rotate = self.stashed_auto_rotate;
            }
            self.prev_tick = Some(now);
            self.host.request_frame();
        }
    }

    /// Derive angle-of-view and orientation options from embedded image
    /// metadata, respecting keys the tour set explicitly.
    ///
    /// The asset-loading layer calls this when the panorama carries
    /// photo-sphere XMP.
    pub fn apply_photo_metadata(&mut self, meta: &PhotoMetadata) {
        self.config.apply_photo_metadata(meta, self.locks);
        self.view.north_offset = self.config.north_offset;
    }

    /// Release the renderer, timers, sensor subscription, and listeners.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.loaded = false;
        self.loading = false;
        if self.scheduler.interrupt() {
            self.host.cancel_wake();
        }
        if self.orientation_active {
            self.orientation_active = false;
            self.host.unsubscribe_orientation();
        }
        self.renderer.destroy();
        self.hotspots.destroy();
        self.listeners.clear();
    }

    // ── Internals shared by the impl-split files ──

    /// Ensure the loop is running, preempting a pending deferred restart.
    pub(crate) fn schedule(&mut self) {
        if self.destroyed {
            return;
        }
        if self.scheduler.interrupt() {
            self.host.cancel_wake();
        }
        if self.scheduler.start() {
            self.host.request_frame();
        }
    }

    /// Canvas dimensions as floats.
    pub(crate) fn canvas_dims(&self) -> (f64, f64) {
        let (w, h) = self.renderer.canvas_size();
        (f64::from(w), f64::from(h))
    }

    /// Effective lower hfov bound; multires sources cannot zoom past
    /// their deepest tile level.
    pub(crate) fn effective_min_hfov(&self) -> f64 {
        let mut min = self.view.min_hfov;
        if self.config.projection == Projection::Multires {
            if let Some(spec) = &self.config.multi_res {
                let (w, _) = self.canvas_dims();
                min = min
                    .min(w / (f64::from(spec.cube_resolution) / 90.0 * 0.9));
            }
        }
        min
    }

    /// Time until the auto-rotate restart is due, if one is wanted.
    /// `Some(ZERO)` means it is already due.
    fn restart_due(&self, now: Instant) -> Option<Duration> {
        if self.stashed_auto_rotate == 0.0 || self.view.auto_rotate != 0.0 {
            return None;
        }
        let delay = self.config.auto_rotate_inactivity_delay;
        if delay < 0.0 {
            return None;
        }
        let since = now
            .saturating_duration_since(self.latest_interaction)
            .as_secs_f64()
            * 1000.0;
        let remaining = delay - since;
        if remaining <= 0.0 {
            Some(Duration::ZERO)
        } else {
            Some(Duration::from_secs_f64(remaining / 1000.0))
        }
    }

    /// Clamp the view against its bounds, render, and reproject
    /// hotspots.
    fn render_frame(&mut self) {
        if !self.loaded {
            return;
        }
        let (w, h) = self.canvas_dims();

        self.view.yaw = projection::wrap_yaw(self.view.yaw);
        let clamp = projection::clamp_yaw(
            self.view.yaw,
            self.view.min_yaw,
            self.view.max_yaw,
            self.view.hfov,
        );
        // Bounce auto-rotation off a restricted yaw range instead of
        // pinning against it.
        if clamp.clamped && self.view.auto_rotate != 0.0 {
            self.view.auto_rotate = -self.view.auto_rotate;
        }
        self.view.yaw = clamp.yaw;

        let vfov = projection::vertical_fov(self.view.hfov, w, h);
        self.view.pitch = projection::clamp_pitch(
            self.view.pitch,
            self.view.min_pitch,
            self.view.max_pitch,
            vfov,
        );

        let _ = self.renderer.render(
            RenderView {
                pitch: self.view.pitch.to_radians(),
                yaw: self.view.yaw.to_radians(),
                hfov: self.view.hfov.to_radians(),
                roll: self.view.roll.to_radians(),
            },
            RenderOptions::default(),
        );
        self.hotspots
            .project(self.view.pitch, self.view.yaw, self.view.hfov, w, h);
    }

    /// Hand the configured source to the renderer and start the loop.
    fn begin_load(&mut self) -> Result<(), PanoError> {
        self.clear_error();
        self.loaded = false;
        self.loading = true;
        let source = self.config.image_source()?;
        self.renderer.init(&RenderInit {
            source,
            projection: self.config.projection,
            dynamic: self.config.dynamic,
            haov: self.config.haov.to_radians(),
            vaov: self.config.vaov.to_radians(),
            v_offset: self.config.v_offset.to_radians(),
            horizon_pitch: self.config.horizon_pitch.map(f64::to_radians),
            horizon_roll: self.config.horizon_roll.map(f64::to_radians),
        })?;
        self.schedule();
        Ok(())
    }

    /// The renderer reported ready: the viewer becomes interactive.
    fn complete_load(&mut self) {
        self.loading = false;
        self.loaded = true;
        self.hotspots.create(&self.config.hot_spots);
        log::info!(
            "scene '{}' loaded",
            self.view.scene_id.as_deref().unwrap_or("standalone")
        );
        self.listeners.emit(&ViewerEvent::Load);
    }

    pub(crate) fn show_error(&mut self, err: &PanoError) {
        log::error!("{err}");
        self.loading = false;
        self.error_shown = true;
        self.listeners.emit(&ViewerEvent::Error {
            message: err.to_string(),
        });
    }

    pub(crate) fn clear_error(&mut self) {
        if self.error_shown {
            self.error_shown = false;
            self.listeners.emit(&ViewerEvent::ErrorCleared);
        }
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.destroy();
    }
}
