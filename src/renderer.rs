//! Contract between the engine and the rendering backend.
//!
//! The engine is backend-agnostic: anything that can take an orientation
//! plus a field of view and produce pixels implements [`Renderer`]. The
//! backend owns textures, meshes, and the canvas; the engine owns all view
//! state and calls [`Renderer::render`] once per animation tick.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Projection type of the panorama source.
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
pub enum Projection {
    /// One equirectangular image.
    #[default]
    Equirectangular,
    /// Six cube faces.
    Cubemap,
    /// Tiled multi-resolution pyramid.
    Multires,
}

/// Tiled multi-resolution source description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MultiResSpec {
    /// Base URL or directory prepended to tile paths. Combined with the
    /// tour-level base path unless absolute.
    pub base_path: Option<String>,
    /// Tile path template (`/%l/%s%y_%x` style).
    pub path: String,
    /// File extension of the tiles.
    pub extension: String,
    /// Edge length in pixels of a full cube face at the deepest level.
    pub cube_resolution: u32,
    /// Edge length in pixels of one tile.
    pub tile_resolution: u32,
    /// Number of resolution levels.
    pub max_level: u32,
}

impl Default for MultiResSpec {
    fn default() -> Self {
        Self {
            base_path: None,
            path: "/%l/%s%y_%x".to_owned(),
            extension: "jpg".to_owned(),
            cube_resolution: 0,
            tile_resolution: 0,
            max_level: 0,
        }
    }
}

/// Resolved image source handed to the renderer, base paths applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// One equirectangular image URL or path.
    Single(String),
    /// Six cube-face URLs or paths.
    CubeFaces([String; 6]),
    /// Multi-resolution tile set.
    MultiRes(MultiResSpec),
    /// Dynamic source (video element, canvas) identified by a handle the
    /// backend understands. Redrawn continuously while updates are forced.
    Dynamic(String),
}

/// Everything the renderer needs to initialize a scene source.
///
/// Angles are radians; the engine converts from configuration degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderInit {
    /// Resolved image source.
    pub source: ImageSource,
    /// Projection of the source.
    pub projection: Projection,
    /// Whether the source updates on its own (video/canvas).
    pub dynamic: bool,
    /// Horizontal angle of view of the source.
    pub haov: f64,
    /// Vertical angle of view of the source.
    pub vaov: f64,
    /// Vertical offset of a partial panorama.
    pub v_offset: f64,
    /// Horizon tilt forward/backward, when known.
    pub horizon_pitch: Option<f64>,
    /// Horizon tilt sideways, when known.
    pub horizon_roll: Option<f64>,
}

/// Orientation and projection parameters for one rendered frame (radians).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Vertical tilt.
    pub pitch: f64,
    /// Horizontal heading.
    pub yaw: f64,
    /// Horizontal field of view.
    pub hfov: f64,
    /// In-plane rotation.
    pub roll: f64,
}

/// Per-call render options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Capture this frame as a still image and return it (used for scene
    /// crossfades).
    pub return_image: bool,
}

/// A captured still frame used to crossfade into the next scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StillFrame {
    /// Tightly packed RGBA8 pixels, row-major.
    pub rgba: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Renderer failure modes.
#[derive(Debug)]
pub enum RendererError {
    /// No usable graphics context on this device.
    Unsupported(String),
    /// The source exceeds the device texture size limit.
    SourceTooLarge {
        /// Source width in pixels.
        width: u32,
        /// Maximum supported width in pixels.
        max_width: u32,
    },
    /// An image or tile failed to fetch or decode.
    Asset(String),
}

impl fmt::Display for RendererError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(msg) => write!(f, "no graphics support: {msg}"),
            Self::SourceTooLarge { width, max_width } => write!(
                f,
                "source too large: {width}px wide, device limit {max_width}px"
            ),
            Self::Asset(msg) => write!(f, "asset error: {msg}"),
        }
    }
}

impl std::error::Error for RendererError {}

/// GPU rendering backend consumed by the viewer.
///
/// Loading may continue asynchronously after [`init`](Self::init) returns;
/// the engine keeps its animation loop alive while
/// [`is_loading`](Self::is_loading) reports `true` and treats the first
/// tick it reports `false` as load completion — exactly once per `init`.
/// [`render`](Self::render) is synchronous with respect to the calling
/// tick.
pub trait Renderer {
    /// Prepare GPU resources for a new scene source.
    fn init(&mut self, init: &RenderInit) -> Result<(), RendererError>;

    /// Draw one frame. Returns a still capture when
    /// [`RenderOptions::return_image`] is set and capture is supported,
    /// `None` otherwise.
    fn render(
        &mut self,
        view: RenderView,
        opts: RenderOptions,
    ) -> Option<StillFrame>;

    /// Current canvas size in physical pixels `(width, height)`.
    fn canvas_size(&self) -> (u32, u32);

    /// Propagate a container resize to the backing canvas.
    fn resize(&mut self);

    /// Whether the source is still streaming in (tiles, cube faces).
    fn is_loading(&self) -> bool;

    /// Release GPU resources. Further calls on the instance are no-ops.
    fn destroy(&mut self);
}
