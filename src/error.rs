//! Crate-level error types.

use std::fmt;

use crate::renderer::RendererError;

/// Errors produced by the panoview crate.
#[derive(Debug)]
pub enum PanoError {
    /// A panorama image, cube face, or tile could not be fetched or
    /// decoded. Non-fatal: the viewer stays usable for a retry.
    AssetLoad(String),
    /// No usable graphics backend for this viewer instance. Fatal for the
    /// instance; surfaced through the `error` event.
    UnsupportedEnvironment(String),
    /// Malformed configuration (inverted bounds, unparsable tour file).
    /// The offending operation is a no-op and prior state is retained.
    Configuration(String),
    /// A scene id that does not exist in the tour.
    SceneNotFound(String),
    /// Generic I/O failure while reading a tour file.
    Io(std::io::Error),
}

impl fmt::Display for PanoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssetLoad(msg) => write!(f, "asset load error: {msg}"),
            Self::UnsupportedEnvironment(msg) => {
                write!(f, "unsupported environment: {msg}")
            }
            Self::Configuration(msg) => {
                write!(f, "configuration error: {msg}")
            }
            Self::SceneNotFound(id) => write!(f, "unknown scene id: {id}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for PanoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PanoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<RendererError> for PanoError {
    fn from(e: RendererError) -> Self {
        match e {
            RendererError::Unsupported(msg) => {
                Self::UnsupportedEnvironment(msg)
            }
            RendererError::SourceTooLarge { width, max_width } => {
                Self::AssetLoad(format!(
                    "panorama is {width}px wide but the device only \
                     supports images up to {max_width}px"
                ))
            }
            RendererError::Asset(msg) => Self::AssetLoad(msg),
        }
    }
}
