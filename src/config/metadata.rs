//! Ingestion of orientation and crop metadata embedded in panoramas.

use super::{Config, MetadataLocks};

/// Orientation and crop metadata carried by a panorama image
/// (photo-sphere XMP), extracted by the asset-loading layer.
///
/// All pixel fields must be present for the crop geometry to be usable;
/// heading and horizon tilts are independent extras.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhotoMetadata {
    /// Full panorama width in pixels.
    pub full_width: Option<f64>,
    /// Cropped image width in pixels.
    pub cropped_width: Option<f64>,
    /// Full panorama height in pixels.
    pub full_height: Option<f64>,
    /// Cropped image height in pixels.
    pub cropped_height: Option<f64>,
    /// Offset of the cropped area from the panorama top, in pixels.
    pub top_pixels: Option<f64>,
    /// Pose heading in degrees.
    pub heading: Option<f64>,
    /// Pose pitch (horizon tilt forward/backward) in degrees.
    pub horizon_pitch: Option<f64>,
    /// Pose roll (horizon tilt sideways) in degrees.
    pub horizon_roll: Option<f64>,
}

impl PhotoMetadata {
    fn crop(&self) -> Option<(f64, f64, f64, f64, f64)> {
        Some((
            self.full_width?,
            self.cropped_width?,
            self.full_height?,
            self.cropped_height?,
            self.top_pixels?,
        ))
    }
}

impl Config {
    /// Derive angle-of-view and orientation options from embedded image
    /// metadata.
    ///
    /// Keys pinned by `locks` (explicitly set by a configuration layer)
    /// are left alone. A derived heading enables the compass unless the
    /// tour explicitly disabled it. No-op when `ignoreGPanoXMP` is set.
    pub fn apply_photo_metadata(
        &mut self,
        meta: &PhotoMetadata,
        locks: MetadataLocks,
    ) {
        if self.ignore_gpano_xmp {
            return;
        }
        let Some((full_w, crop_w, full_h, crop_h, top)) = meta.crop() else {
            return;
        };

        if !locks.haov {
            self.haov = crop_w / full_w * 360.0;
        }
        if !locks.vaov {
            self.vaov = crop_h / full_h * 180.0;
        }
        if !locks.v_offset {
            self.v_offset = ((top + crop_h / 2.0) / full_h - 0.5) * -180.0;
        }
        if let Some(heading) = meta.heading {
            if !locks.north_offset {
                self.north_offset = heading;
                if self.compass != Some(false) {
                    self.compass = Some(true);
                }
            }
        }
        if let (Some(pitch), Some(roll)) =
            (meta.horizon_pitch, meta.horizon_roll)
        {
            if !locks.horizon_pitch {
                self.horizon_pitch = Some(pitch);
            }
            if !locks.horizon_roll {
                self.horizon_roll = Some(roll);
            }
        }
    }
}
