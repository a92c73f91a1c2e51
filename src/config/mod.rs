//! Layered viewer configuration.
//!
//! A tour carries up to four layers of options — library defaults, the
//! tour-wide `default` block, the selected scene's block, and top-level
//! session overrides — folded in that fixed order into one active
//! [`Config`] snapshot. The fold is recomputed on every scene change.

mod hotspot;
mod layers;
mod metadata;

use std::fmt;

pub use hotspot::{HotSpot, HotSpotKind, SceneTarget};
pub use layers::{compute_active_config, ConfigLayer, MetadataLocks, TourConfig};
pub use metadata::PhotoMetadata;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PanoError;
use crate::renderer::{ImageSource, MultiResSpec, Projection};

/// Auto-rotation setting: a signed speed, or off.
///
/// Tour JSON uses `false` for off and a number (degrees per second,
/// positive rotates the view left) for on, so this type has custom serde.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AutoRotate {
    /// No automatic rotation.
    #[default]
    Off,
    /// Continuous yaw drift in degrees per second.
    Speed(f64),
}

impl AutoRotate {
    /// The configured speed, if rotation is on.
    #[must_use]
    pub fn speed(self) -> Option<f64> {
        match self {
            Self::Off => None,
            Self::Speed(s) => Some(s),
        }
    }
}

impl Serialize for AutoRotate {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Off => s.serialize_bool(false),
            Self::Speed(v) => s.serialize_f64(*v),
        }
    }
}

impl<'de> Deserialize<'de> for AutoRotate {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct RotateVisitor;

        impl Visitor<'_> for RotateVisitor {
            type Value = AutoRotate;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a speed in degrees per second or false")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                if v {
                    Err(E::invalid_value(de::Unexpected::Bool(v), &self))
                } else {
                    Ok(AutoRotate::Off)
                }
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(AutoRotate::Speed(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(AutoRotate::Speed(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(AutoRotate::Speed(v as f64))
            }
        }

        d.deserialize_any(RotateVisitor)
    }
}

/// Active viewer configuration after folding all layers.
///
/// Field names map 1:1 onto the camelCase tour options; see
/// [`ConfigLayer`] for the partial (per-layer) form.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Initial horizontal field of view in degrees.
    pub hfov: f64,
    /// Minimum horizontal field of view.
    pub min_hfov: f64,
    /// Maximum horizontal field of view.
    pub max_hfov: f64,
    /// Initial pitch in degrees.
    pub pitch: f64,
    /// Minimum pitch; NaN means unrestricted (resolved to -90 at clamp
    /// time).
    pub min_pitch: f64,
    /// Maximum pitch; NaN means unrestricted (resolved to 90).
    pub max_pitch: f64,
    /// Initial yaw in degrees.
    pub yaw: f64,
    /// Minimum yaw in `[-180, 180]`.
    pub min_yaw: f64,
    /// Maximum yaw in `[-180, 180]`.
    pub max_yaw: f64,
    /// Initial roll in degrees. Only device-orientation input writes a
    /// non-zero roll at runtime.
    pub roll: f64,
    /// Horizontal angle of view of the source image.
    pub haov: f64,
    /// Vertical angle of view of the source image.
    pub vaov: f64,
    /// Vertical offset of a partial panorama.
    pub v_offset: f64,
    /// Auto-rotation speed or off.
    pub auto_rotate: AutoRotate,
    /// Milliseconds of inactivity before auto-rotation resumes; negative
    /// disables the restart.
    pub auto_rotate_inactivity_delay: f64,
    /// Milliseconds of auto-rotation after which it parks permanently.
    pub auto_rotate_stop_delay: Option<f64>,
    /// Projection of the source.
    pub projection: Projection,
    /// Yaw correction aligning image yaw zero to true north.
    pub north_offset: f64,
    /// Markers owned by the active scene.
    pub hot_spots: Vec<HotSpot>,
    /// Crossfade duration between scenes in milliseconds; zero disables
    /// the fade.
    pub scene_fade_duration: f64,
    /// Base URL or directory prepended to relative asset paths.
    pub base_path: Option<String>,
    /// Preview image shown while loading.
    pub preview: Option<String>,
    /// Panorama title shown by the chrome layer.
    pub title: Option<String>,
    /// Panorama author shown by the chrome layer.
    pub author: Option<String>,
    /// Alternative viewer URL offered when the environment is unsupported.
    pub fallback: Option<String>,
    /// Compass display; unset defers to embedded heading metadata.
    pub compass: Option<bool>,
    /// Horizon tilt forward/backward in degrees, when known.
    pub horizon_pitch: Option<f64>,
    /// Horizon tilt sideways in degrees, when known.
    pub horizon_roll: Option<f64>,
    /// Whether the chrome shows zoom controls.
    pub show_zoom_ctrl: bool,
    /// Whether the chrome shows a fullscreen toggle.
    pub show_fullscreen_ctrl: bool,
    /// Start loading at construction instead of waiting for `load()`.
    pub auto_load: bool,
    /// Allow zooming from the keyboard.
    pub keyboard_zoom: bool,
    /// Allow zooming from the scroll wheel.
    pub mouse_zoom: bool,
    /// Source updates on its own (video/canvas).
    pub dynamic: bool,
    /// Equirectangular image path, or the dynamic source handle.
    pub panorama: Option<String>,
    /// Six cube-face paths in standard order.
    pub cube_map: Option<Vec<String>>,
    /// Multi-resolution tile set description.
    pub multi_res: Option<MultiResSpec>,
    /// Skip embedded photo-sphere metadata entirely.
    pub ignore_gpano_xmp: bool,
    /// Id of the scene this snapshot was folded for.
    pub scene_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hfov: 100.0,
            min_hfov: 50.0,
            max_hfov: 120.0,
            pitch: 0.0,
            min_pitch: f64::NAN,
            max_pitch: f64::NAN,
            yaw: 0.0,
            min_yaw: -180.0,
            max_yaw: 180.0,
            roll: 0.0,
            haov: 360.0,
            vaov: 180.0,
            v_offset: 0.0,
            auto_rotate: AutoRotate::Off,
            auto_rotate_inactivity_delay: -1.0,
            auto_rotate_stop_delay: None,
            projection: Projection::Equirectangular,
            north_offset: 0.0,
            hot_spots: Vec::new(),
            scene_fade_duration: 0.0,
            base_path: None,
            preview: None,
            title: None,
            author: None,
            fallback: None,
            compass: None,
            horizon_pitch: None,
            horizon_roll: None,
            show_zoom_ctrl: true,
            show_fullscreen_ctrl: true,
            auto_load: false,
            keyboard_zoom: true,
            mouse_zoom: true,
            dynamic: false,
            panorama: None,
            cube_map: None,
            multi_res: None,
            ignore_gpano_xmp: false,
            scene_id: None,
        }
    }
}

impl Config {
    /// Whether the compass should be displayed.
    #[must_use]
    pub fn compass_enabled(&self) -> bool {
        self.compass.unwrap_or(false)
    }

    /// Resolve the configured source into a renderer [`ImageSource`],
    /// applying the base path to relative asset paths.
    pub fn image_source(&self) -> Result<ImageSource, PanoError> {
        match self.projection {
            Projection::Equirectangular => {
                let Some(panorama) = &self.panorama else {
                    return Err(PanoError::AssetLoad(
                        "no panorama image was specified".to_owned(),
                    ));
                };
                if self.dynamic {
                    Ok(ImageSource::Dynamic(panorama.clone()))
                } else {
                    Ok(ImageSource::Single(
                        join_base(self.base_path.as_deref(), panorama),
                    ))
                }
            }
            Projection::Cubemap => {
                let Some(faces) = &self.cube_map else {
                    return Err(PanoError::Configuration(
                        "cubemap projection without cubeMap faces".to_owned(),
                    ));
                };
                let [f0, f1, f2, f3, f4, f5] = faces.as_slice() else {
                    return Err(PanoError::Configuration(format!(
                        "cubeMap needs 6 faces, got {}",
                        faces.len()
                    )));
                };
                let base = self.base_path.as_deref();
                Ok(ImageSource::CubeFaces([
                    join_base(base, f0),
                    join_base(base, f1),
                    join_base(base, f2),
                    join_base(base, f3),
                    join_base(base, f4),
                    join_base(base, f5),
                ]))
            }
            Projection::Multires => {
                let Some(spec) = &self.multi_res else {
                    return Err(PanoError::Configuration(
                        "multires projection without multiRes block"
                            .to_owned(),
                    ));
                };
                let mut spec = spec.clone();
                // Only use the tile base path alone if it is absolute.
                spec.base_path = match (&self.base_path, &spec.base_path) {
                    (Some(outer), Some(inner)) if !absolute_url(inner) => {
                        Some(format!("{outer}{inner}"))
                    }
                    (_, Some(inner)) => Some(inner.clone()),
                    (Some(outer), None) => Some(outer.clone()),
                    (None, None) => None,
                };
                Ok(ImageSource::MultiRes(spec))
            }
        }
    }
}

/// Test whether a URL is absolute rather than relative.
#[must_use]
pub fn absolute_url(url: &str) -> bool {
    if url.starts_with('/') {
        return true;
    }
    // Scheme-relative (`//host`) or scheme-qualified (`https://host`).
    url.split_once("//").is_some_and(|(scheme, _)| {
        scheme.is_empty()
            || scheme.strip_suffix(':').is_some_and(|s| {
                !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())
            })
    })
}

/// Prepend the base path to relative asset paths.
fn join_base(base: Option<&str>, path: &str) -> String {
    match base {
        Some(base) if !absolute_url(path) => format!("{base}{path}"),
        _ => path.to_owned(),
    }
}
