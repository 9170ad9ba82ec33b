use crate::foundation::core::Point;

const SQRT_3: f64 = 1.732_050_807_568_877_2;
const HALF_HEIGHT: f64 = SQRT_3 / 2.0;

/// Regular flat-top hexagon inscribed in the canvas.
///
/// Vertices sit at `(±1, 0)` and `(±1/2, ±√3/2)`. Inside points map to themselves. Outside
/// points are undefined, or with `wrap` redirected to their point reflection through the
/// canvas center.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Hex {
    /// Redirect excluded points instead of discarding them.
    pub wrap: bool,
}

impl Hex {
    /// Hexagon mask.
    pub fn mask() -> Self {
        Self { wrap: false }
    }

    /// Hexagon wrap.
    pub fn wrap() -> Self {
        Self { wrap: true }
    }

    /// `true` when `p` lies in the closed hexagon.
    pub fn contains(p: Point) -> bool {
        let (ax, ay) = (p.x.abs(), p.y.abs());
        ay <= HALF_HEIGHT && SQRT_3 * ax + ay <= SQRT_3
    }

    pub(crate) fn apply(&self, p: Point) -> Option<Point> {
        if Self::contains(p) {
            Some(p)
        } else if self.wrap {
            Some(-p)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/hex.rs"]
mod tests;
