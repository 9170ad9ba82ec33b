use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::foundation::core::Point;
use crate::foundation::error::{SymmetraError, SymmetraResult};
use crate::foundation::math::{Mat3, Vec3};

/// Rotates the sphere seen through an equirectangular chart.
///
/// The canvas `x` axis spans one turn of azimuth and `y` spans pole to pole. A point is lifted
/// onto the unit sphere, rotated by `Rz(yaw) * Ry(pitch)` and charted back, with `asin`
/// recovering the elevation. With `inverse` set the rotation is undone instead, so
/// `m.inverse()` composed with `m` is the identity away from the poles and the azimuth seam.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Spherical {
    /// Rotation about the polar axis, radians.
    pub yaw: f64,
    /// Tilt about the horizontal axis, radians.
    pub pitch: f64,
    /// Apply the inverse rotation.
    pub inverse: bool,
}

impl Default for Spherical {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            inverse: false,
        }
    }
}

impl Spherical {
    /// Mapping with the given rotation angles.
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self {
            yaw,
            pitch,
            inverse: false,
        }
    }

    /// Mapping that undoes this one.
    pub fn inverse(&self) -> Self {
        Self {
            inverse: !self.inverse,
            ..*self
        }
    }

    pub(crate) fn validate(&self) -> SymmetraResult<()> {
        if !(self.yaw.is_finite() && self.pitch.is_finite()) {
            return Err(SymmetraError::mapping("spherical angles must be finite"));
        }
        Ok(())
    }

    fn rotation(&self) -> Mat3 {
        if self.inverse {
            Mat3::rotation_y(-self.pitch).mul(&Mat3::rotation_z(-self.yaw))
        } else {
            Mat3::rotation_z(self.yaw).mul(&Mat3::rotation_y(self.pitch))
        }
    }

    pub(crate) fn apply(&self, p: Point) -> Option<Point> {
        let (azimuth, elevation) = normalize_angles(p.x * PI, p.y * FRAC_PI_2);
        let (sa, ca) = azimuth.sin_cos();
        let (se, ce) = elevation.sin_cos();
        let v = self.rotation().apply(Vec3::new(ce * ca, ce * sa, se));

        let elevation = v.z.clamp(-1.0, 1.0).asin();
        let azimuth = v.y.atan2(v.x);
        Some(Point::new(azimuth / PI, elevation / FRAC_PI_2))
    }
}

/// Wrap azimuth into `[-pi, pi)` and reflect elevation beyond a pole back onto the sphere.
pub(crate) fn normalize_angles(azimuth: f64, elevation: f64) -> (f64, f64) {
    let mut azimuth = azimuth;
    let mut elevation = wrap_angle(elevation);
    if elevation > FRAC_PI_2 {
        elevation = PI - elevation;
        azimuth += PI;
    } else if elevation < -FRAC_PI_2 {
        elevation = -PI - elevation;
        azimuth += PI;
    }
    (wrap_angle(azimuth), elevation)
}

fn wrap_angle(a: f64) -> f64 {
    (a + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/spherical.rs"]
mod tests;
