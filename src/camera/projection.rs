//! Screen ↔ sphere transforms and per-tick bounds enforcement.
//!
//! All angles are degrees unless a name says otherwise; screen positions
//! are CSS pixels with the origin at the canvas top-left.

/// Wrap a yaw angle into `[-180, 180]`.
#[must_use]
pub fn wrap_yaw(yaw: f64) -> f64 {
    let mut yaw = yaw;
    while yaw > 180.0 {
        yaw -= 360.0;
    }
    while yaw < -180.0 {
        yaw += 360.0;
    }
    yaw
}

/// Vertical field of view derived from the horizontal one and the canvas
/// aspect ratio.
#[must_use]
pub fn vertical_fov(hfov: f64, width: f64, height: f64) -> f64 {
    2.0 * ((hfov / 2.0).to_radians().tan() * height / width).atan()
        .to_degrees()
}

/// Pitch and yaw of the view ray through a screen position.
///
/// Perspective unprojection with trigonometric back-substitution: rotate
/// around the current pitch, then recover yaw with `atan2`. Inverse of
/// [`sphere_to_screen`] for points in the visible hemisphere.
#[must_use]
pub fn screen_to_sphere(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    pitch: f64,
    yaw: f64,
    hfov: f64,
) -> (f64, f64) {
    let x = x / width * 2.0 - 1.0;
    let y = (1.0 - y / height * 2.0) * height / width;
    let focal = 1.0 / (hfov.to_radians() / 2.0).tan();
    let s = pitch.to_radians().sin();
    let c = pitch.to_radians().cos();
    let a = focal * c - y * s;
    let root = (x * x + a * a).sqrt();
    let hit_pitch = ((y * c + focal * s) / root).atan().to_degrees();
    let hit_yaw = (x / root).atan2(a / root).to_degrees() + yaw;
    (hit_pitch, hit_yaw)
}

/// Screen position of a spherical coordinate under the current camera,
/// or `None` when it lies in the rear hemisphere.
///
/// Visibility is the spherical dot product
/// `z = sin(hp)·sin(p) + cos(hp)·cos(yaw − hy)·cos(p)`; the returned
/// position is the projected center point.
#[must_use]
pub fn sphere_to_screen(
    hs_pitch: f64,
    hs_yaw: f64,
    pitch: f64,
    yaw: f64,
    hfov: f64,
    width: f64,
    height: f64,
) -> Option<(f64, f64)> {
    let hp_sin = hs_pitch.to_radians().sin();
    let hp_cos = hs_pitch.to_radians().cos();
    let p_sin = pitch.to_radians().sin();
    let p_cos = pitch.to_radians().cos();
    let yaw_cos = (yaw - hs_yaw).to_radians().cos();
    let z = hp_sin * p_sin + hp_cos * yaw_cos * p_cos;
    if z <= 0.0 {
        return None;
    }

    let hfov_tan = (hfov.to_radians() / 2.0).tan();
    let yaw_sin = (yaw - hs_yaw).to_radians().sin();
    let x = -width / hfov_tan * yaw_sin * hp_cos / z / 2.0 + width / 2.0;
    let y = -width / hfov_tan * (hp_sin * p_cos - hp_cos * yaw_cos * p_sin)
        / z
        / 2.0
        + height / 2.0;
    Some((x, y))
}

/// Result of clamping yaw against the configured range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YawClamp {
    /// Clamped yaw.
    pub yaw: f64,
    /// Whether a bound was hit (auto-rotation reverses on this).
    pub clamped: bool,
}

/// Clamp yaw so the edge of the field of view stays inside the allowed
/// range.
///
/// For ranges narrower than 360° the effective bounds shrink by half the
/// field of view; when the range is narrower than the field of view
/// itself, both edges expand symmetrically so at least one configured
/// bound stays visible and a valid yaw always exists.
#[must_use]
pub fn clamp_yaw(yaw: f64, min_yaw: f64, max_yaw: f64, hfov: f64) -> YawClamp {
    let range = max_yaw - min_yaw;
    let mut lo = -180.0;
    let mut hi = 180.0;
    if range < 360.0 {
        lo = min_yaw + hfov / 2.0;
        hi = max_yaw - hfov / 2.0;
        if range < hfov {
            let diff = hfov - range;
            lo -= diff;
            hi += diff;
        }
    }
    let clamped = yaw.min(hi).max(lo);
    YawClamp {
        yaw: clamped,
        clamped: clamped != yaw,
    }
}

/// Clamp pitch so the edge of the vertical field of view stays inside the
/// allowed range.
///
/// Same shrink/expand rules as [`clamp_yaw`] with the vertical field of
/// view; NaN bounds (unrestricted or degenerate arithmetic) fall back to
/// the full `[-90, 90]` range.
#[must_use]
pub fn clamp_pitch(pitch: f64, min_pitch: f64, max_pitch: f64, vfov: f64) -> f64 {
    let mut lo = min_pitch + vfov / 2.0;
    let mut hi = max_pitch - vfov / 2.0;
    let range = max_pitch - min_pitch;
    if range < vfov {
        let diff = vfov - range;
        lo -= diff;
        hi += diff;
    }
    if lo.is_nan() {
        lo = -90.0;
    }
    if hi.is_nan() {
        hi = 90.0;
    }
    pitch.min(hi).max(lo)
}
