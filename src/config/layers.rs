//! Configuration layers and the deterministic merge fold.
//!
//! Later layers override earlier ones per key; arrays and nested blocks
//! are replaced wholesale, never deep-merged. The one exception is the
//! hotspot list, which is owned exclusively by the scene layer.

use std::path::Path;

use rustc_hash::FxHashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::hotspot::HotSpot;
use super::{AutoRotate, Config};
use crate::error::PanoError;
use crate::renderer::{MultiResSpec, Projection};

/// One partial configuration layer: every recognized option, optional.
///
/// Serde names match the camelCase tour format, so a layer parses
/// directly from a tour file's `default` block, a scene block, or the
/// file's top level.
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigLayer {
    /// Initial horizontal field of view in degrees.
    pub hfov: Option<f64>,
    /// Minimum horizontal field of view.
    pub min_hfov: Option<f64>,
    /// Maximum horizontal field of view.
    pub max_hfov: Option<f64>,
    /// Initial pitch in degrees.
    pub pitch: Option<f64>,
    /// Minimum pitch.
    pub min_pitch: Option<f64>,
    /// Maximum pitch.
    pub max_pitch: Option<f64>,
    /// Initial yaw in degrees.
    pub yaw: Option<f64>,
    /// Minimum yaw.
    pub min_yaw: Option<f64>,
    /// Maximum yaw.
    pub max_yaw: Option<f64>,
    /// Initial roll in degrees.
    pub roll: Option<f64>,
    /// Horizontal angle of view of the source image.
    pub haov: Option<f64>,
    /// Vertical angle of view of the source image.
    pub vaov: Option<f64>,
    /// Vertical offset of a partial panorama.
    pub v_offset: Option<f64>,
    /// Auto-rotation speed or `false`.
    #[schemars(with = "Option<f64>")]
    pub auto_rotate: Option<AutoRotate>,
    /// Milliseconds of inactivity before auto-rotation resumes.
    pub auto_rotate_inactivity_delay: Option<f64>,
    /// Milliseconds of auto-rotation before it parks permanently.
    pub auto_rotate_stop_delay: Option<f64>,
    /// Projection of the source.
    #[serde(rename = "type")]
    pub projection: Option<Projection>,
    /// Yaw correction aligning image yaw zero to true north.
    pub north_offset: Option<f64>,
    /// Markers for this scene. Only honored on scene layers.
    pub hot_spots: Option<Vec<HotSpot>>,
    /// Crossfade duration between scenes in milliseconds.
    pub scene_fade_duration: Option<f64>,
    /// Base URL or directory prepended to relative asset paths.
    pub base_path: Option<String>,
    /// Preview image shown while loading.
    pub preview: Option<String>,
    /// Panorama title.
    pub title: Option<String>,
    /// Panorama author.
    pub author: Option<String>,
    /// Alternative viewer URL for unsupported environments.
    pub fallback: Option<String>,
    /// Compass display toggle.
    pub compass: Option<bool>,
    /// Horizon tilt forward/backward in degrees.
    pub horizon_pitch: Option<f64>,
    /// Horizon tilt sideways in degrees.
    pub horizon_roll: Option<f64>,
    /// Whether the chrome shows zoom controls.
    pub show_zoom_ctrl: Option<bool>,
    /// Whether the chrome shows a fullscreen toggle.
    pub show_fullscreen_ctrl: Option<bool>,
    /// Start loading at construction.
    pub auto_load: Option<bool>,
    /// Allow zooming from the keyboard.
    pub keyboard_zoom: Option<bool>,
    /// Allow zooming from the scroll wheel.
    pub mouse_zoom: Option<bool>,
    /// Source updates on its own (video/canvas).
    pub dynamic: Option<bool>,
    /// Equirectangular image path, or the dynamic source handle.
    pub panorama: Option<String>,
    /// Six cube-face paths.
    pub cube_map: Option<Vec<String>>,
    /// Multi-resolution tile set description.
    pub multi_res: Option<MultiResSpec>,
    /// Skip embedded photo-sphere metadata.
    #[serde(rename = "ignoreGPanoXMP")]
    pub ignore_gpano_xmp: Option<bool>,
    /// Scene activated at construction (meaningful on the `default`
    /// block and the tour top level).
    pub first_scene: Option<String>,
}

impl ConfigLayer {
    /// Generate a JSON Schema describing the recognized options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ConfigLayer)
    }
}

/// Photo-metadata keys pinned by an explicit configuration layer.
///
/// A key set by the tour (rather than derived from embedded image
/// metadata) must not be overwritten by metadata ingestion later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetadataLocks {
    /// `haov` was set explicitly.
    pub haov: bool,
    /// `vaov` was set explicitly.
    pub vaov: bool,
    /// `vOffset` was set explicitly.
    pub v_offset: bool,
    /// `northOffset` was set explicitly.
    pub north_offset: bool,
    /// `horizonPitch` was set explicitly.
    pub horizon_pitch: bool,
    /// `horizonRoll` was set explicitly.
    pub horizon_roll: bool,
}

impl MetadataLocks {
    fn record(&mut self, layer: &ConfigLayer) {
        self.haov |= layer.haov.is_some();
        self.vaov |= layer.vaov.is_some();
        self.v_offset |= layer.v_offset.is_some();
        self.north_offset |= layer.north_offset.is_some();
        self.horizon_pitch |= layer.horizon_pitch.is_some();
        self.horizon_roll |= layer.horizon_roll.is_some();
    }
}

/// Overlay `Some` layer fields onto concrete `Copy` config fields.
macro_rules! overlay {
    ($cfg:ident, $layer:ident, { $($field:ident),* $(,)? }) => {
        $( if let Some(v) = $layer.$field { $cfg.$field = v; } )*
    };
}

/// Overlay set layer fields onto optional `Copy` config fields.
macro_rules! overlay_opt {
    ($cfg:ident, $layer:ident, { $($field:ident),* $(,)? }) => {
        $( if $layer.$field.is_some() { $cfg.$field = $layer.$field; } )*
    };
}

/// Overlay set layer fields onto optional heap-allocated config fields.
macro_rules! overlay_owned {
    ($cfg:ident, $layer:ident, { $($field:ident),* $(,)? }) => {
        $( if $layer.$field.is_some() {
            $cfg.$field = $layer.$field.clone();
        } )*
    };
}

fn apply_layer(cfg: &mut Config, layer: &ConfigLayer) {
    overlay!(cfg, layer, {
        hfov, min_hfov, max_hfov,
        pitch, min_pitch, max_pitch,
        yaw, min_yaw, max_yaw,
        roll, haov, vaov, v_offset,
        auto_rotate, auto_rotate_inactivity_delay,
        projection, north_offset, scene_fade_duration,
        show_zoom_ctrl, show_fullscreen_ctrl,
        auto_load, keyboard_zoom, mouse_zoom, dynamic,
        ignore_gpano_xmp,
    });
    overlay_opt!(cfg, layer, {
        auto_rotate_stop_delay, compass, horizon_pitch, horizon_roll,
    });
    overlay_owned!(cfg, layer, {
        base_path, preview, title, author, fallback,
        panorama, cube_map, multi_res,
    });
}

/// Fold configuration layers into one active snapshot.
///
/// Precedence, later overrides earlier: `defaults` → `global` → `scene`
/// → `overrides`. Pure and order-sensitive; the returned
/// [`MetadataLocks`] record which photo-metadata keys any layer other
/// than the defaults set explicitly.
#[must_use]
pub fn compute_active_config(
    defaults: &Config,
    global: &ConfigLayer,
    scene: Option<(&str, &ConfigLayer)>,
    overrides: &ConfigLayer,
) -> (Config, MetadataLocks) {
    let mut cfg = defaults.clone();
    let mut locks = MetadataLocks::default();

    locks.record(global);
    apply_layer(&mut cfg, global);

    if let Some((id, layer)) = scene {
        locks.record(layer);
        apply_layer(&mut cfg, layer);
        // The hotspot list belongs to the scene alone.
        cfg.hot_spots = layer.hot_spots.clone().unwrap_or_default();
        cfg.scene_id = Some(id.to_owned());
    }

    locks.record(overrides);
    apply_layer(&mut cfg, overrides);

    (cfg, locks)
}

/// Complete tour description: session overrides, a tour-wide default
/// layer, and per-scene layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TourConfig {
    /// Scene activated at construction.
    pub first_scene: Option<String>,
    /// Layer applied to every scene.
    pub default: ConfigLayer,
    /// Per-scene layers keyed by scene id.
    pub scenes: FxHashMap<String, ConfigLayer>,
    /// Caller-supplied session overrides (the tour file's top-level
    /// keys).
    #[serde(flatten)]
    pub overrides: ConfigLayer,
}

impl TourConfig {
    /// Tour with a single anonymous panorama and no scene map.
    #[must_use]
    pub fn standalone(overrides: ConfigLayer) -> Self {
        Self {
            overrides,
            ..Self::default()
        }
    }

    /// Parse a tour from JSON.
    pub fn from_json(s: &str) -> Result<Self, PanoError> {
        serde_json::from_str(s)
            .map_err(|e| PanoError::Configuration(e.to_string()))
    }

    /// Parse a tour from TOML.
    pub fn from_toml(s: &str) -> Result<Self, PanoError> {
        toml::from_str(s).map_err(|e| PanoError::Configuration(e.to_string()))
    }

    /// Load a tour file, picking the parser from the file extension.
    pub fn load(path: &Path) -> Result<Self, PanoError> {
        let content = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "toml") {
            Self::from_toml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Scene to activate first, from the top level or the default layer.
    #[must_use]
    pub fn start_scene(&self) -> Option<&str> {
        self.first_scene
            .as_deref()
            .or(self.default.first_scene.as_deref())
    }

    /// Whether the tour defines the given scene.
    #[must_use]
    pub fn has_scene(&self, scene_id: &str) -> bool {
        self.scenes.contains_key(scene_id)
    }

    /// Resolve the active configuration for a scene (or the anonymous
    /// top-level panorama when `scene_id` is `None`).
    pub fn resolve(
        &self,
        scene_id: Option<&str>,
    ) -> Result<(Config, MetadataLocks), PanoError> {
        let scene = match scene_id {
            Some(id) => {
                let layer = self.scenes.get(id).ok_or_else(|| {
                    PanoError::SceneNotFound(id.to_owned())
                })?;
                Some((id, layer))
            }
            None => None,
        };
        Ok(compute_active_config(
            &Config::default(),
            &self.default,
            scene,
            &self.overrides,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tour_json() -> &'static str {
        r#"{
            "firstScene": "kitchen",
            "autoLoad": true,
            "default": {
                "sceneFadeDuration": 1000,
                "hfov": 110,
                "basePath": "img/"
            },
            "scenes": {
                "kitchen": {
                    "panorama": "kitchen.jpg",
                    "northOffset": 30,
                    "hotSpots": [
                        { "id": "key", "pitch": -8, "yaw": 40 }
                    ]
                },
                "hallway": {
                    "panorama": "hallway.jpg",
                    "northOffset": 120,
                    "hfov": 90
                }
            }
        }"#
    }

    #[test]
    fn fold_precedence_is_defaults_global_scene_overrides() {
        let tour = TourConfig::from_json(tour_json()).unwrap();
        let (cfg, _) = tour.resolve(Some("hallway")).unwrap();

        // scene overrides global
        assert_eq!(cfg.hfov, 90.0);
        // global overrides library default
        assert_eq!(cfg.scene_fade_duration, 1000.0);
        // library default survives untouched keys
        assert_eq!(cfg.max_hfov, 120.0);
        // top-level override wins over everything
        assert!(cfg.auto_load);
        assert_eq!(cfg.scene_id.as_deref(), Some("hallway"));
    }

    #[test]
    fn session_overrides_beat_scene_values() {
        let mut tour = TourConfig::from_json(tour_json()).unwrap();
        tour.overrides.hfov = Some(75.0);
        let (cfg, _) = tour.resolve(Some("hallway")).unwrap();
        assert_eq!(cfg.hfov, 75.0);
    }

    #[test]
    fn hotspots_come_from_the_scene_layer_alone() {
        let mut tour = TourConfig::from_json(tour_json()).unwrap();
        tour.default.hot_spots =
            Some(vec![HotSpot::new("global-spot", 0.0, 0.0)]);

        let (cfg, _) = tour.resolve(Some("kitchen")).unwrap();
        assert_eq!(cfg.hot_spots.len(), 1);
        assert_eq!(cfg.hot_spots[0].id, "key");

        // A scene without hotspots gets an empty list, not the global one.
        let (cfg, _) = tour.resolve(Some("hallway")).unwrap();
        assert!(cfg.hot_spots.is_empty());
    }

    #[test]
    fn unknown_scene_is_an_error() {
        let tour = TourConfig::from_json(tour_json()).unwrap();
        assert!(matches!(
            tour.resolve(Some("basement")),
            Err(PanoError::SceneNotFound(id)) if id == "basement"
        ));
    }

    #[test]
    fn metadata_locks_track_explicit_keys() {
        let tour = TourConfig::from_json(tour_json()).unwrap();

        let (_, locks) = tour.resolve(Some("kitchen")).unwrap();
        assert!(locks.north_offset);
        assert!(!locks.haov);
        assert!(!locks.horizon_pitch);

        let (_, locks) = tour.resolve(None).unwrap();
        assert!(!locks.north_offset);
    }

    #[test]
    fn pitch_bounds_default_to_nan() {
        let tour = TourConfig::from_json(tour_json()).unwrap();
        let (cfg, _) = tour.resolve(Some("kitchen")).unwrap();
        assert!(cfg.min_pitch.is_nan());
        assert!(cfg.max_pitch.is_nan());
    }

    #[test]
    fn start_scene_prefers_top_level() {
        let tour = TourConfig::from_json(tour_json()).unwrap();
        assert_eq!(tour.start_scene(), Some("kitchen"));

        let tour = TourConfig::from_json(
            r#"{ "default": { "firstScene": "attic" }, "scenes": {} }"#,
        )
        .unwrap();
        assert_eq!(tour.start_scene(), Some("attic"));
    }

    #[test]
    fn toml_tours_parse_too() {
        let tour = TourConfig::from_toml(
            r#"
firstScene = "kitchen"

[default]
hfov = 95.0

[scenes.kitchen]
panorama = "kitchen.jpg"
"#,
        )
        .unwrap();
        let (cfg, _) = tour.resolve(Some("kitchen")).unwrap();
        assert_eq!(cfg.hfov, 95.0);
        assert_eq!(cfg.panorama.as_deref(), Some("kitchen.jpg"));
    }

    #[test]
    fn schema_lists_recognized_options() {
        let schema =
            serde_json::to_value(ConfigLayer::json_schema()).unwrap();
        let props = schema["properties"].as_object().unwrap();

        for key in [
            "hfov", "minHfov", "maxHfov", "pitch", "minPitch", "maxPitch",
            "yaw", "minYaw", "maxYaw", "roll", "haov", "vaov", "vOffset",
            "autoRotate", "autoRotateInactivityDelay", "type",
            "northOffset", "hotSpots", "sceneFadeDuration", "basePath",
            "preview", "title", "author", "fallback", "showZoomCtrl",
            "showFullscreenCtrl", "autoLoad", "keyboardZoom", "mouseZoom",
            "dynamic",
        ] {
            assert!(props.contains_key(key), "schema is missing {key}");
        }
    }
}
