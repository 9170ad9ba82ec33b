use std::f64::consts::{PI, TAU};

use smallvec::SmallVec;

use crate::foundation::core::Point;
use crate::foundation::error::{SymmetraError, SymmetraResult};

const MAX_POLYGON_SIDES: u32 = 64;

/// Disk model the canvas is interpreted in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiskModel {
    /// Conformal Poincaré disk.
    #[default]
    Poincare = 0,
    /// Beltrami-Klein disk (geodesics are straight chords).
    Klein = 1,
    /// Poincaré disk with squared radius, `r -> r^2`, inverted by `r -> sqrt(r)`.
    Squared = 2,
}

impl DiskModel {
    /// Convert a point in this model to the Poincaré disk.
    pub fn to_poincare(self, p: Point) -> Option<Point> {
        match self {
            Self::Poincare => Some(p),
            Self::Klein => {
                let r2 = p.x * p.x + p.y * p.y;
                if r2 >= 1.0 {
                    return None;
                }
                Some(p.scale(1.0 / (1.0 + (1.0 - r2).sqrt())))
            }
            Self::Squared => Some(p.scale(p.length())),
        }
    }

    /// Convert a Poincaré disk point into this model.
    pub fn from_poincare(self, p: Point) -> Option<Point> {
        match self {
            Self::Poincare => Some(p),
            Self::Klein => {
                let r2 = p.x * p.x + p.y * p.y;
                Some(p.scale(2.0 / (1.0 + r2)))
            }
            Self::Squared => {
                let r = p.length();
                if r == 0.0 {
                    return Some(p);
                }
                Some(p.scale(1.0 / r.sqrt()))
            }
        }
    }
}

/// Regular `{p, q}` hyperbolic tiling folded onto its central tile.
///
/// The central regular `p`-gon is centered at the origin of the Poincaré disk with `q` tiles
/// meeting at each vertex. A point is reflected across the geodesic side it lies beyond until
/// it falls inside the central tile, at most `depth` times; points needing more reflections
/// are undefined.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Hyperbolic {
    /// Polygon sides.
    pub p: u32,
    /// Polygons meeting at each vertex.
    pub q: u32,
    /// Maximum reflections (combinatorial depth of the expansion).
    pub depth: u32,
    /// Model the canvas is interpreted in.
    pub model: DiskModel,
    /// Inputs farther than this from the center are undefined.
    pub max_radius: f64,
    /// Rotation of the central tile, radians.
    pub rotation: f64,
}

impl Default for Hyperbolic {
    fn default() -> Self {
        Self {
            p: 7,
            q: 3,
            depth: 64,
            model: DiskModel::Poincare,
            max_radius: 0.99,
            rotation: 0.0,
        }
    }
}

/// Geodesic side of the central tile: a circle orthogonal to the unit circle.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Side {
    pub(crate) center: Point,
    pub(crate) radius: f64,
}

impl Hyperbolic {
    /// `{p, q}` tiling in the Poincaré model with default depth and radius.
    pub fn new(p: u32, q: u32) -> Self {
        Self {
            p,
            q,
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> SymmetraResult<()> {
        if self.p < 3 || self.q < 3 || self.p > MAX_POLYGON_SIDES {
            return Err(SymmetraError::mapping(format!(
                "hyperbolic tiling needs 3 <= p <= {MAX_POLYGON_SIDES} and q >= 3, got {{{}, {}}}",
                self.p, self.q
            )));
        }
        if u64::from(self.p - 2) * u64::from(self.q - 2) <= 4 {
            return Err(SymmetraError::mapping(format!(
                "{{{}, {}}} is not a hyperbolic tiling; (p-2)(q-2) must exceed 4",
                self.p, self.q
            )));
        }
        if self.depth == 0 {
            return Err(SymmetraError::mapping("hyperbolic depth must be >= 1"));
        }
        if !(self.max_radius > 0.0 && self.max_radius <= 1.0) {
            return Err(SymmetraError::mapping(
                "hyperbolic max_radius must be in (0, 1]",
            ));
        }
        Ok(())
    }

    /// Euclidean distance from the origin to each side's midpoint in the Poincaré disk.
    pub(crate) fn inradius(&self) -> f64 {
        let a = PI / f64::from(self.p);
        let b = PI / f64::from(self.q);
        let cosh_h = b.cos() / a.sin();
        ((cosh_h - 1.0) / (cosh_h + 1.0)).sqrt()
    }

    pub(crate) fn sides(&self) -> SmallVec<[Side; 8]> {
        let t = self.inradius();
        let d = (t + 1.0 / t) / 2.0;
        let radius = (1.0 / t - t) / 2.0;
        (0..self.p)
            .map(|i| {
                let angle = self.rotation + TAU * f64::from(i) / f64::from(self.p);
                Side {
                    center: Point::new(d * angle.cos(), d * angle.sin()),
                    radius,
                }
            })
            .collect()
    }

    pub(crate) fn apply(&self, p: Point) -> Option<Point> {
        if p.length() > self.max_radius {
            return None;
        }
        let mut z = self.model.to_poincare(p)?;
        if z.length() >= 1.0 {
            return None;
        }

        let sides = self.sides();
        let mut reflections = 0;
        loop {
            let Some(side) = sides
                .iter()
                .find(|s| (z - s.center).length() < s.radius)
            else {
                break;
            };
            if reflections == self.depth {
                return None;
            }
            z = invert(z, side)?;
            reflections += 1;
        }
        self.model.from_poincare(z)
    }
}

/// Inversion in a side's circle (hyperbolic reflection across the geodesic).
fn invert(z: Point, side: &Side) -> Option<Point> {
    let d = z - side.center;
    let d2 = d.x * d.x + d.y * d.y;
    if d2 == 0.0 {
        return None;
    }
    Some(side.center + d.scale(side.radius * side.radius / d2))
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/hyperbolic.rs"]
mod tests;
