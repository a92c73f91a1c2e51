//! Test doubles: a recording renderer, a recording host, and tour
//! fixtures shared by the viewer test modules.

use std::cell::RefCell;
use std::rc::Rc;

use web_time::{Duration, Instant};

use crate::animation::FrameHost;
use crate::config::{ConfigLayer, HotSpot, HotSpotKind, TourConfig};
use crate::renderer::{
    RenderInit, RenderOptions, RenderView, Renderer, RendererError,
    StillFrame,
};
use crate::viewer::Viewer;

/// Everything the fake renderer records.
#[derive(Debug, Default)]
pub(crate) struct RendererLog {
    pub(crate) inits: usize,
    pub(crate) last_init: Option<RenderInit>,
    pub(crate) renders: Vec<(RenderView, RenderOptions)>,
    pub(crate) resizes: usize,
    pub(crate) loading: bool,
    pub(crate) capture_supported: bool,
    pub(crate) fail_init: Option<RendererError>,
    pub(crate) destroyed: bool,
}

pub(crate) struct FakeRenderer {
    log: Rc<RefCell<RendererLog>>,
}

impl FakeRenderer {
    pub(crate) fn with_log(log: Rc<RefCell<RendererLog>>) -> Self {
        Self { log }
    }
}

impl Renderer for FakeRenderer {
    fn init(&mut self, init: &RenderInit) -> Result<(), RendererError> {
        let mut log = self.log.borrow_mut();
        if let Some(err) = log.fail_init.take() {
            return Err(err);
        }
        log.inits += 1;
        log.last_init = Some(init.clone());
        Ok(())
    }

    fn render(
        &mut self,
        view: RenderView,
        opts: RenderOptions,
    ) -> Option<StillFrame> {
        let mut log = self.log.borrow_mut();
        log.renders.push((view, opts));
        (opts.return_image && log.capture_supported).then(|| StillFrame {
            rgba: vec![0; 4],
            width: 1,
            height: 1,
        })
    }

    fn canvas_size(&self) -> (u32, u32) {
        (800, 600)
    }

    fn resize(&mut self) {
        self.log.borrow_mut().resizes += 1;
    }

    fn is_loading(&self) -> bool {
        self.log.borrow().loading
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().destroyed = true;
    }
}

/// Everything the fake host records.
#[derive(Debug, Default)]
pub(crate) struct HostLog {
    pub(crate) frame_requests: usize,
    pub(crate) deferred: Option<Duration>,
    pub(crate) cancels: usize,
    pub(crate) orientation_subscribed: bool,
    pub(crate) fullscreen: Option<bool>,
}

pub(crate) struct FakeHost {
    log: Rc<RefCell<HostLog>>,
}

impl FakeHost {
    pub(crate) fn with_log(log: Rc<RefCell<HostLog>>) -> Self {
        Self { log }
    }
}

impl FrameHost for FakeHost {
    fn request_frame(&mut self) {
        self.log.borrow_mut().frame_requests += 1;
    }

    fn defer_wake(&mut self, delay: Duration) {
        self.log.borrow_mut().deferred = Some(delay);
    }

    fn cancel_wake(&mut self) {
        let mut log = self.log.borrow_mut();
        log.deferred = None;
        log.cancels += 1;
    }

    fn subscribe_orientation(&mut self) {
        self.log.borrow_mut().orientation_subscribed = true;
    }

    fn unsubscribe_orientation(&mut self) {
        self.log.borrow_mut().orientation_subscribed = false;
    }

    fn set_fullscreen(&mut self, enabled: bool) {
        self.log.borrow_mut().fullscreen = Some(enabled);
    }
}

/// Shared handles to the recording doubles.
pub(crate) struct Rig {
    pub(crate) renderer: Rc<RefCell<RendererLog>>,
    pub(crate) host: Rc<RefCell<HostLog>>,
}

/// Two-scene tour: a kitchen (north 30°, two hotspots) and a hallway
/// (north 120°), auto-loading, with no fade by default.
pub(crate) fn tour() -> TourConfig {
    let mut tour = TourConfig {
        first_scene: Some("kitchen".to_owned()),
        ..TourConfig::default()
    };
    tour.overrides.auto_load = Some(true);
    tour.default.base_path = Some("img/".to_owned());

    let kitchen = ConfigLayer {
        panorama: Some("kitchen.jpg".to_owned()),
        north_offset: Some(30.0),
        hot_spots: Some(vec![
            HotSpot::new("key", 0.0, 40.0),
            HotSpot {
                kind: HotSpotKind::Link,
                scene_id: Some("hallway".to_owned()),
                ..HotSpot::new("to-hallway", 0.0, 0.0)
            },
        ]),
        ..ConfigLayer::default()
    };
    let hallway = ConfigLayer {
        panorama: Some("hallway.jpg".to_owned()),
        north_offset: Some(120.0),
        ..ConfigLayer::default()
    };
    let _ = tour.scenes.insert("kitchen".to_owned(), kitchen);
    let _ = tour.scenes.insert("hallway".to_owned(), hallway);
    tour
}

/// Build a viewer over the recording doubles.
pub(crate) fn viewer_with(tour: TourConfig) -> (Viewer, Rig) {
    let renderer_log = Rc::new(RefCell::new(RendererLog::default()));
    let host_log = Rc::new(RefCell::new(HostLog::default()));
    let viewer = Viewer::new(
        tour,
        Box::new(FakeRenderer::with_log(Rc::clone(&renderer_log))),
        Box::new(FakeHost::with_log(Rc::clone(&host_log))),
    )
    .unwrap();
    (
        viewer,
        Rig {
            renderer: renderer_log,
            host: host_log,
        },
    )
}

/// Viewer over the default tour, ticked once so the scene is loaded.
pub(crate) fn loaded_viewer() -> (Viewer, Rig) {
    let (mut viewer, rig) = viewer_with(tour());
    viewer.tick(Instant::now());
    assert!(viewer.is_loaded());
    (viewer, rig)
}

/// Drive frames at ~60fps while the loop is running (a granted frame per
/// request, like a real host). Returns the final timestamp.
pub(crate) fn run_frames(
    viewer: &mut Viewer,
    start: Instant,
    frames: usize,
) -> Instant {
    let mut now = start;
    for _ in 0..frames {
        now += Duration::from_millis(16);
        if viewer.scheduler.is_running() {
            viewer.tick(now);
        }
    }
    now
}

/// Tick until the loop goes idle (bounded, for transitions and loads).
pub(crate) fn tick_until_idle(viewer: &mut Viewer, start: Instant) {
    let mut now = start;
    for _ in 0..64 {
        viewer.tick(now);
        if !viewer.scheduler.is_running() {
            return;
        }
        now += Duration::from_millis(16);
    }
}
