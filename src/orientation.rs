use std::f64::consts::PI;

use nalgebra::{Matrix3, Vector3};

// Gravity readings below 10% of normal strength cannot define "down".
const FREE_FALL_GRAVITY_SQUARED: f64 = 0.01 * 9.81 * 9.81;

/// Device orientation in radians. Azimuth is the rotation about the vertical
/// axis in (-pi, pi], 0 at magnetic north, positive toward east.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub azimuth: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// Builds the device-to-earth rotation matrix from a gravity reading and a
/// geomagnetic reading. Rows are the earth east/north/up directions expressed
/// in device coordinates.
///
/// Degenerate input (free fall, vanishing field, field parallel to gravity)
/// yields the identity matrix, so callers always get a usable decomposition.
pub fn rotation_matrix(gravity: &Vector3<f64>, geomagnetic: &Vector3<f64>) -> Matrix3<f64> {
    if gravity.norm_squared() < FREE_FALL_GRAVITY_SQUARED {
        return Matrix3::identity();
    }

    let h = geomagnetic.cross(gravity);
    if h.norm() < 0.1 {
        // field vanishing or (anti)parallel to gravity
        return Matrix3::identity();
    }

    let h = h.normalize();
    let a = gravity.normalize();
    let m = a.cross(&h);

    Matrix3::from_rows(&[h.transpose(), m.transpose(), a.transpose()])
}

/// Decodes azimuth, pitch and roll from a rotation matrix.
pub fn orientation_angles(r: &Matrix3<f64>) -> Orientation {
    let azimuth = r[(0, 1)].atan2(r[(1, 1)]);
    Orientation {
        // atan2 yields [-pi, pi]; fold the closed end onto +pi
        azimuth: if azimuth == -PI { PI } else { azimuth },
        pitch: (-r[(2, 1)]).asin(),
        roll: (-r[(2, 0)]).atan2(r[(2, 2)]),
    }
}

/// Orientation from the latest raw readings. Stateless; safe to call every
/// tick at arbitrary frequency.
pub fn estimate(gravity: &Vector3<f64>, geomagnetic: &Vector3<f64>) -> Orientation {
    orientation_angles(&rotation_matrix(gravity, geomagnetic))
}

/// Screen rotation for a heading, in degrees. The sign is inverted so the
/// drawn shape turns against the device, matching the sensor convention.
pub fn rotation_degrees(azimuth: f64) -> f64 {
    -azimuth.to_degrees()
}
