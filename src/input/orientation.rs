//! Device-orientation sensor math.
//!
//! Sensor samples arrive as Tait-Bryan angles. They are converted to a
//! quaternion, adjusted by the fixed world transform and the current
//! screen rotation, and decomposed back into camera pitch/yaw/roll.

use glam::DQuat;

/// One device-orientation sensor sample, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationSample {
    /// Rotation about the device z axis.
    pub alpha: f64,
    /// Front-back tilt about the x axis.
    pub beta: f64,
    /// Left-right tilt about the y axis.
    pub gamma: f64,
    /// Screen orientation angle (0, 90, 180, 270).
    pub screen_angle: f64,
}

/// Camera angles derived from a sensor sample, in degrees.
///
/// `yaw` is the raw device heading; callers add the scene's north offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationAngles {
    /// Vertical tilt.
    pub pitch: f64,
    /// Horizontal heading before north correction.
    pub yaw: f64,
    /// In-plane rotation.
    pub roll: f64,
}

/// Quaternion for Tait-Bryan sensor angles (half-angle construction in
/// the device's rotation order).
fn tait_bryan_to_quat(alpha: f64, beta: f64, gamma: f64) -> DQuat {
    let r = [
        beta.to_radians() / 2.0,
        gamma.to_radians() / 2.0,
        alpha.to_radians() / 2.0,
    ];
    let c = [r[0].cos(), r[1].cos(), r[2].cos()];
    let s = [r[0].sin(), r[1].sin(), r[2].sin()];

    DQuat::from_xyzw(
        s[0] * c[1] * c[2] - c[0] * s[1] * s[2],
        c[0] * s[1] * c[2] + s[0] * c[1] * s[2],
        c[0] * c[1] * s[2] + s[0] * s[1] * c[2],
        c[0] * c[1] * c[2] - s[0] * s[1] * s[2],
    )
}

/// Device quaternion with world and screen transforms applied.
fn device_quaternion(sample: &OrientationSample) -> DQuat {
    let q = tait_bryan_to_quat(sample.alpha, sample.beta, sample.gamma);
    // World transform: tilt the device frame upright.
    let half = 0.5_f64.sqrt();
    let q = q * DQuat::from_xyzw(-half, 0.0, 0.0, half);
    // Screen transform: compensate for display rotation.
    let angle = -sample.screen_angle.to_radians() / 2.0;
    q * DQuat::from_xyzw(0.0, -angle.sin(), 0.0, angle.cos())
}

/// Decompose a sensor sample into camera angles.
#[must_use]
pub fn sample_to_angles(sample: &OrientationSample) -> OrientationAngles {
    let q = device_quaternion(sample);
    let phi = (2.0 * (q.w * q.x + q.y * q.z))
        .atan2(1.0 - 2.0 * (q.x * q.x + q.y * q.y));
    let theta = (2.0 * (q.w * q.y - q.z * q.x)).clamp(-1.0, 1.0).asin();
    let psi = (2.0 * (q.w * q.z + q.x * q.y))
        .atan2(1.0 - 2.0 * (q.y * q.y + q.z * q.z));

    OrientationAngles {
        pitch: phi.to_degrees(),
        roll: -theta.to_degrees(),
        yaw: -psi.to_degrees(),
    }
}
