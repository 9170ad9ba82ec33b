use crate::foundation::core::Point;
use crate::foundation::error::{SymmetraError, SymmetraResult};
use crate::foundation::math::IdentityBytes;

/// Inclusion region over a mapping's output (normalized canvas coordinates).
///
/// All bounds are inclusive. The default admits the whole canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewMask {
    /// Smallest admitted distance from the center.
    pub min_radius: f64,
    /// Largest admitted distance from the center.
    pub max_radius: f64,
    /// Smallest admitted `x`.
    pub min_x: f64,
    /// Largest admitted `x`.
    pub max_x: f64,
    /// Smallest admitted `y`.
    pub min_y: f64,
    /// Largest admitted `y`.
    pub max_y: f64,
}

impl Default for ViewMask {
    fn default() -> Self {
        Self {
            min_radius: 0.0,
            max_radius: f64::MAX,
            min_x: -1.0,
            max_x: 1.0,
            min_y: -1.0,
            max_y: 1.0,
        }
    }
}

impl ViewMask {
    /// Annulus `min_radius ..= max_radius` over the whole canvas.
    pub fn annulus(min_radius: f64, max_radius: f64) -> Self {
        Self {
            min_radius,
            max_radius,
            ..Self::default()
        }
    }

    /// `true` when `p` lies inside every bound.
    pub fn contains(&self, p: Point) -> bool {
        let r = p.length();
        r >= self.min_radius
            && r <= self.max_radius
            && p.x >= self.min_x
            && p.x <= self.max_x
            && p.y >= self.min_y
            && p.y <= self.max_y
    }

    /// `true` for the default, admit-everything mask.
    pub fn is_unbounded(&self) -> bool {
        *self == Self::default()
    }

    /// Reject NaN or empty bound pairs.
    pub fn validate(&self) -> SymmetraResult<()> {
        let pairs = [
            ("radius", self.min_radius, self.max_radius),
            ("x", self.min_x, self.max_x),
            ("y", self.min_y, self.max_y),
        ];
        for (name, lo, hi) in pairs {
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(SymmetraError::validation(format!(
                    "view mask {name} bounds are empty: [{lo}, {hi}]"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn write_identity(&self, h: &mut IdentityBytes) {
        for v in [
            self.min_radius,
            self.max_radius,
            self.min_x,
            self.max_x,
            self.min_y,
            self.max_y,
        ] {
            h.write_f64(v);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/mask.rs"]
mod tests;
