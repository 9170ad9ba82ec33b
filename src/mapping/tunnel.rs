use crate::foundation::core::Point;
use crate::foundation::error::{SymmetraError, SymmetraResult};

/// Radial zoom tunnel.
///
/// A point is pushed outward by `scale` for as long as the result stays inside the unit
/// square, so every ring `(1/scale, 1]` (square norm) repeats toward the center. The center
/// itself has no direction to grow along and is undefined, as is anything that has not reached
/// the outer ring after `max_steps`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Tunnel {
    /// Radial growth per step, `> 1`.
    pub scale: f64,
    /// Escalation bound.
    pub max_steps: u32,
}

impl Default for Tunnel {
    fn default() -> Self {
        Self {
            scale: 2.0,
            max_steps: 64,
        }
    }
}

impl Tunnel {
    pub(crate) fn validate(&self) -> SymmetraResult<()> {
        if !(self.scale.is_finite() && self.scale > 1.0) {
            return Err(SymmetraError::mapping("tunnel scale must be > 1"));
        }
        if self.max_steps == 0 {
            return Err(SymmetraError::mapping("tunnel max_steps must be >= 1"));
        }
        Ok(())
    }

    pub(crate) fn apply(&self, p: Point) -> Option<Point> {
        let radius = p.max_norm();
        if radius == 0.0 || !radius.is_finite() {
            return None;
        }
        let mut q = p;
        for _ in 0..self.max_steps {
            let next = q.scale(self.scale);
            if next.max_norm() > 1.0 {
                return Some(q);
            }
            q = next;
        }
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/tunnel.rs"]
mod tests;
