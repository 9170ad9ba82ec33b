use kurbo::Affine;

use crate::foundation::core::Point;

/// Pinwheel rearrangement: each quadrant is rotated about its own center.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Retile {
    /// Rotation applied inside every quadrant, radians.
    pub angle: f64,
}

impl Default for Retile {
    fn default() -> Self {
        Self {
            angle: std::f64::consts::FRAC_PI_2,
        }
    }
}

impl Retile {
    pub(crate) fn apply(&self, p: Point) -> Option<Point> {
        let center = kurbo::Point::new(0.5f64.copysign(p.x), 0.5f64.copysign(p.y));
        Some((Affine::rotate_about(self.angle, center) * kurbo::Point::from(p)).into())
    }
}

/// Rotation about the canvas center.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Rotate {
    /// Counter-clockwise angle, radians.
    pub angle: f64,
}

impl Rotate {
    /// Rotation by `angle` radians.
    pub fn new(angle: f64) -> Self {
        Self { angle }
    }

    pub(crate) fn apply(&self, p: Point) -> Option<Point> {
        Some((Affine::rotate(self.angle) * kurbo::Point::from(p)).into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/retile.rs"]
mod tests;
