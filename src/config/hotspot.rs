//! Hotspot configuration types.

use std::fmt;

use schemars::JsonSchema;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// What a hotspot represents.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum HotSpotKind {
    /// Plain positional marker.
    #[default]
    Marker,
    /// Link to another scene.
    Link,
    /// Informational marker with text and an optional URL.
    Info,
    /// Embedded video marker.
    Video,
    /// Embedded image marker.
    Image,
}

/// Target value for one view axis when entering a scene.
///
/// `"same"` keeps the current value across the transition and
/// `"sameAzimuth"` (yaw only) preserves the absolute compass heading by
/// compensating for the difference in scene north offsets. Absent values
/// fall back to the new scene's own configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SceneTarget {
    /// Use the value configured on the target scene.
    #[default]
    SceneDefault,
    /// Keep the current value.
    Same,
    /// Keep the absolute compass heading (yaw only).
    SameAzimuth,
    /// Absolute value in degrees.
    Value(f64),
}

impl SceneTarget {
    /// Whether this is the implicit scene-default marker.
    #[must_use]
    pub fn is_scene_default(&self) -> bool {
        *self == Self::SceneDefault
    }
}

impl Serialize for SceneTarget {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::SceneDefault | Self::Same => s.serialize_str("same"),
            Self::SameAzimuth => s.serialize_str("sameAzimuth"),
            Self::Value(v) => s.serialize_f64(*v),
        }
    }
}

impl<'de> Deserialize<'de> for SceneTarget {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct TargetVisitor;

        impl Visitor<'_> for TargetVisitor {
            type Value = SceneTarget;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number, \"same\", or \"sameAzimuth\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(SceneTarget::Value(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(SceneTarget::Value(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(SceneTarget::Value(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                match v {
                    "same" => Ok(SceneTarget::Same),
                    "sameAzimuth" => Ok(SceneTarget::SameAzimuth),
                    other => Err(E::invalid_value(
                        de::Unexpected::Str(other),
                        &self,
                    )),
                }
            }
        }

        d.deserialize_any(TargetVisitor)
    }
}

/// Interactive marker anchored to a spherical coordinate.
///
/// Hotspots are owned by the scene configuration layer and rebuilt on
/// every scene change; there is no cross-scene identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct HotSpot {
    /// Identifier referenced by the session layer to toggle visibility.
    pub id: String,
    /// Vertical anchor in degrees.
    pub pitch: f64,
    /// Horizontal anchor in degrees.
    pub yaw: f64,
    /// Marker behavior.
    #[serde(rename = "type")]
    pub kind: HotSpotKind,
    /// Scene to switch to when a link hotspot is activated.
    pub scene_id: Option<String>,
    /// Pitch to use after following the link.
    #[serde(skip_serializing_if = "SceneTarget::is_scene_default")]
    #[schemars(with = "Option<f64>")]
    pub target_pitch: SceneTarget,
    /// Yaw to use after following the link.
    #[serde(skip_serializing_if = "SceneTarget::is_scene_default")]
    #[schemars(with = "Option<f64>")]
    pub target_yaw: SceneTarget,
    /// Field of view to use after following the link.
    #[serde(skip_serializing_if = "SceneTarget::is_scene_default")]
    #[schemars(with = "Option<f64>")]
    pub target_hfov: SceneTarget,
    /// Tooltip text.
    pub text: Option<String>,
    /// External link opened on activation.
    pub url: Option<String>,
    /// Image asset path (image hotspots), joined with the base path.
    pub image: Option<String>,
    /// Video asset path (video hotspots), joined with the base path.
    pub video: Option<String>,
    /// Display width in CSS pixels for embedded media.
    pub width: Option<f64>,
    /// Marker image source overriding the default sprite.
    pub img_src: Option<String>,
    /// Initial session visibility (the session layer may toggle this at
    /// runtime without a scene reload).
    pub shown: bool,
}

impl Default for HotSpot {
    fn default() -> Self {
        Self {
            id: String::new(),
            pitch: 0.0,
            yaw: 0.0,
            kind: HotSpotKind::default(),
            scene_id: None,
            target_pitch: SceneTarget::default(),
            target_yaw: SceneTarget::default(),
            target_hfov: SceneTarget::default(),
            text: None,
            url: None,
            image: None,
            video: None,
            width: None,
            img_src: None,
            shown: true,
        }
    }
}

impl HotSpot {
    /// Marker with an id and spherical anchor, visible by default.
    #[must_use]
    pub fn new(id: impl Into<String>, pitch: f64, yaw: f64) -> Self {
        Self {
            id: id.into(),
            pitch,
            yaw,
            ..Self::default()
        }
    }
}
