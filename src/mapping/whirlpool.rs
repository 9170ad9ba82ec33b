use crate::foundation::core::Point;
use crate::foundation::error::{SymmetraError, SymmetraResult};

/// Logarithmic-spiral warp.
///
/// While a point is inside the central region it is rotated by `angle` and scaled by `scale`.
/// Escalation stops before the point would leave the canvas. A point still inside the central
/// region after `max_steps` is undefined, and results within `trim` of the canvas border are
/// discarded to keep the seam out of the render.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Whirlpool {
    /// Rotation per step, radians.
    pub angle: f64,
    /// Radial scale per step, `> 1`.
    pub scale: f64,
    /// Radius of the central region that keeps escalating.
    pub inner_radius: f64,
    /// Border band (normalized units) whose results are discarded.
    pub trim: f64,
    /// Escalation bound.
    pub max_steps: u32,
}

impl Default for Whirlpool {
    fn default() -> Self {
        Self {
            angle: std::f64::consts::FRAC_PI_8,
            scale: 1.5,
            inner_radius: 0.5,
            trim: 0.02,
            max_steps: 64,
        }
    }
}

impl Whirlpool {
    pub(crate) fn validate(&self) -> SymmetraResult<()> {
        if !self.angle.is_finite() {
            return Err(SymmetraError::mapping("whirlpool angle must be finite"));
        }
        if !(self.scale.is_finite() && self.scale > 1.0) {
            return Err(SymmetraError::mapping("whirlpool scale must be > 1"));
        }
        if !(self.inner_radius > 0.0 && self.inner_radius <= 1.0) {
            return Err(SymmetraError::mapping(
                "whirlpool inner_radius must be in (0, 1]",
            ));
        }
        if !(0.0..1.0).contains(&self.trim) {
            return Err(SymmetraError::mapping("whirlpool trim must be in [0, 1)"));
        }
        if self.max_steps == 0 {
            return Err(SymmetraError::mapping("whirlpool max_steps must be >= 1"));
        }
        Ok(())
    }

    pub(crate) fn apply(&self, p: Point) -> Option<Point> {
        let mut q = p;
        let mut steps = 0;
        while q.length() < self.inner_radius {
            if steps == self.max_steps {
                return None;
            }
            let next = q.rotate(self.angle).scale(self.scale);
            if next.max_norm() > 1.0 {
                break;
            }
            q = next;
            steps += 1;
        }
        if q.max_norm() > 1.0 - self.trim {
            return None;
        }
        Some(q)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/whirlpool.rs"]
mod tests;
