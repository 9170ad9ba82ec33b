use std::sync::OnceLock;

use crate::foundation::core::Point;
use crate::foundation::error::{SymmetraError, SymmetraResult};
use crate::foundation::math::{Mat3, Vec3};
use crate::mapping::MappingDomain;

/// Rotation group of a regular polyhedron.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationGroup {
    /// Order 12.
    Tetrahedral = 0,
    /// Order 24.
    Octahedral = 1,
    /// Order 60.
    Icosahedral = 2,
}

impl RotationGroup {
    /// Number of rotations in the group.
    pub fn order(self) -> usize {
        match self {
            Self::Tetrahedral => 12,
            Self::Octahedral => 24,
            Self::Icosahedral => 60,
        }
    }

    /// Group elements, generated once per process.
    pub(crate) fn elements(self) -> &'static [Mat3] {
        static TETRAHEDRAL: OnceLock<Vec<Mat3>> = OnceLock::new();
        static OCTAHEDRAL: OnceLock<Vec<Mat3>> = OnceLock::new();
        static ICOSAHEDRAL: OnceLock<Vec<Mat3>> = OnceLock::new();

        let diagonal = Vec3::new(1.0, 1.0, 1.0);
        let third = Mat3::from_axis_angle(diagonal, std::f64::consts::TAU / 3.0);
        match self {
            Self::Tetrahedral => TETRAHEDRAL.get_or_init(|| {
                close_group(&[third, Mat3::rotation_z(std::f64::consts::PI)])
            }),
            Self::Octahedral => OCTAHEDRAL.get_or_init(|| {
                close_group(&[third, Mat3::rotation_z(std::f64::consts::FRAC_PI_2)])
            }),
            Self::Icosahedral => ICOSAHEDRAL.get_or_init(|| {
                let phi = (1.0 + 5f64.sqrt()) / 2.0;
                let vertex = Vec3::new(0.0, 1.0, phi);
                close_group(&[
                    third,
                    Mat3::from_axis_angle(vertex, std::f64::consts::TAU / 5.0),
                ])
            }),
        }
    }
}

/// Closure of the generators under multiplication.
fn close_group(generators: &[Mat3]) -> Vec<Mat3> {
    let mut elements = vec![Mat3::IDENTITY];
    let mut frontier = vec![Mat3::IDENTITY];
    while let Some(m) = frontier.pop() {
        for g in generators {
            let next = g.mul(&m);
            if !elements.iter().any(|e| e.approx_eq(&next, 1e-9)) {
                elements.push(next);
                frontier.push(next);
            }
        }
    }
    elements
}

/// Folds the sphere by a polyhedral rotation group onto its primary tile.
///
/// The canvas is a chart on the unit sphere. Every group element is applied to the charted
/// point and the image closest to the primary tile's reference direction wins; that image is
/// charted back. Without `expand` the chart is orthographic on the unit disk (upper
/// hemisphere). With `expand` the input chart is an inverse stereographic projection covering
/// the whole canvas, so one fundamental domain repeats across every pixel.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Polyhedral {
    /// Symmetry group.
    pub group: RotationGroup,
    /// Tile expansion across the full canvas.
    pub expand: bool,
    /// Input scale applied before charting.
    pub zoom: f64,
}

impl Default for Polyhedral {
    fn default() -> Self {
        Self {
            group: RotationGroup::Icosahedral,
            expand: false,
            zoom: 1.0,
        }
    }
}

impl Polyhedral {
    /// Off-axis so no non-trivial rotation fixes it; the Voronoi cell around it is the tile.
    pub(crate) fn reference() -> Vec3 {
        Vec3::new(0.05, 0.1, 1.0)
            .normalized()
            .unwrap_or(Vec3::new(0.0, 0.0, 1.0))
    }

    /// Fold over `group` restricted to the unit disk.
    pub fn new(group: RotationGroup) -> Self {
        Self {
            group,
            ..Self::default()
        }
    }

    /// Tile expansion of `group` over the whole canvas.
    pub fn expanded(group: RotationGroup) -> Self {
        Self {
            group,
            expand: true,
            ..Self::default()
        }
    }

    pub(crate) fn domain(&self) -> MappingDomain {
        if self.expand {
            MappingDomain::Square
        } else {
            MappingDomain::Disk
        }
    }

    pub(crate) fn validate(&self) -> SymmetraResult<()> {
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(SymmetraError::mapping("polyhedral zoom must be > 0"));
        }
        Ok(())
    }

    pub(crate) fn apply(&self, p: Point) -> Option<Point> {
        let p = p.scale(self.zoom);
        let v = if self.expand {
            stereographic_lift(p)
        } else {
            orthographic_lift(p)?
        };
        let folded = fold(self.group.elements(), v, Self::reference())?;
        orthographic_drop(folded)
    }
}

/// Group element image of `v` closest to `reference`.
pub(crate) fn fold(elements: &[Mat3], v: Vec3, reference: Vec3) -> Option<Vec3> {
    elements
        .iter()
        .map(|g| g.apply(v))
        .map(|w| (w.dot(reference), w))
        .filter(|(d, _)| d.is_finite())
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, w)| w)
}

fn orthographic_lift(p: Point) -> Option<Vec3> {
    let r2 = p.x * p.x + p.y * p.y;
    if r2 > 1.0 {
        return None;
    }
    Some(Vec3::new(p.x, p.y, (1.0 - r2).sqrt()))
}

fn stereographic_lift(p: Point) -> Vec3 {
    let r2 = p.x * p.x + p.y * p.y;
    let d = 1.0 + r2;
    Vec3::new(2.0 * p.x / d, 2.0 * p.y / d, (1.0 - r2) / d)
}

fn orthographic_drop(v: Vec3) -> Option<Point> {
    if v.z < 0.0 {
        return None;
    }
    Some(Point::new(v.x, v.y))
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/polyhedral.rs"]
mod tests;
