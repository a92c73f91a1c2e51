//! Hotspot overlay: per-scene markers projected onto the screen.
//!
//! The overlay owns the projected state of the active scene's hotspots.
//! It is created once per scene (idempotent until destroyed), reprojected
//! every tick, and torn down when the scene changes.

use glam::DVec2;

use crate::camera::projection;
use crate::config::HotSpot;

/// Marker icon edge length in CSS pixels. Anchors are offset by half of
/// it so the icon centers on the projected point.
pub const ICON_SIZE: f64 = 26.0;

/// A hotspot with its current screen projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedHotSpot {
    /// Static definition from the scene configuration.
    pub spot: HotSpot,
    /// Top-left anchor in CSS pixels, `None` while the marker is in the
    /// rear hemisphere (hidden and non-interactive).
    pub anchor: Option<DVec2>,
    /// Session-controlled display flag.
    pub shown: bool,
}

impl ProjectedHotSpot {
    /// Whether the marker can be displayed and clicked right now.
    #[must_use]
    pub fn interactive(&self) -> bool {
        self.shown && self.anchor.is_some()
    }
}

/// Owns the active scene's markers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotspotOverlay {
    spots: Vec<ProjectedHotSpot>,
    created: bool,
}

impl HotspotOverlay {
    /// Empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build markers for the entering scene. A second call is a no-op
    /// until [`destroy`](Self::destroy) resets the latch.
    pub fn create(&mut self, spots: &[HotSpot]) {
        if self.created {
            return;
        }
        self.spots = spots
            .iter()
            .map(|spot| ProjectedHotSpot {
                shown: spot.shown,
                spot: spot.clone(),
                anchor: None,
            })
            .collect();
        self.created = true;
    }

    /// Tear down all markers and reset the creation latch.
    pub fn destroy(&mut self) {
        self.spots.clear();
        self.created = false;
    }

    /// Whether markers exist for the current scene.
    #[must_use]
    pub fn is_created(&self) -> bool {
        self.created
    }

    /// The projected markers.
    #[must_use]
    pub fn spots(&self) -> &[ProjectedHotSpot] {
        &self.spots
    }

    /// Toggle session visibility of one marker. `false` for unknown ids.
    pub fn set_shown(&mut self, id: &str, shown: bool) -> bool {
        match self.spots.iter_mut().find(|p| p.spot.id == id) {
            Some(spot) => {
                spot.shown = shown;
                true
            }
            None => false,
        }
    }

    /// Reproject every marker against the current camera orientation.
    ///
    /// Visibility is the spherical dot-product test; visible markers get
    /// a top-left anchor for a fixed [`ICON_SIZE`] icon.
    pub fn project(
        &mut self,
        pitch: f64,
        yaw: f64,
        hfov: f64,
        width: f64,
        height: f64,
    ) {
        for p in &mut self.spots {
            p.anchor = projection::sphere_to_screen(
                p.spot.pitch,
                p.spot.yaw,
                pitch,
                yaw,
                hfov,
                width,
                height,
            )
            .map(|(x, y)| {
                DVec2::new(x - ICON_SIZE / 2.0, y - ICON_SIZE / 2.0)
            });
        }
    }

    /// Topmost interactive marker whose icon contains the point.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&HotSpot> {
        self.spots.iter().rev().find_map(|p| {
            if !p.interactive() {
                return None;
            }
            let anchor = p.anchor?;
            let inside = x >= anchor.x
                && x <= anchor.x + ICON_SIZE
                && y >= anchor.y
                && y <= anchor.y + ICON_SIZE;
            inside.then_some(&p.spot)
        })
    }
}
