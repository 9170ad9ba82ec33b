//! Coordinate mappings: pure functions from an output canvas point to the source canvas point
//! it samples, or `None` where the mapping is undefined.
//!
//! Every family is a variant of the closed [`Mapping`] enum carrying its own parameter record.
//! Arithmetic failures inside a mapping (domain errors, division by zero, NaN) surface as
//! `None`; nothing panics and nothing is propagated as an error.

/// Hexagonal mask and wrap.
pub mod hex;
/// Regular hyperbolic tilings of the disk.
pub mod hyperbolic;
/// Polyhedral rotation-group folds.
pub mod polyhedral;
/// Quadrant pinwheel and plain rotation.
pub mod retile;
/// Sphere rotations.
pub mod spherical;
/// Radial tunnel.
pub mod tunnel;
/// Logarithmic whirlpool.
pub mod whirlpool;

use crate::foundation::core::Point;
use crate::foundation::error::SymmetraResult;
use crate::foundation::math::IdentityBytes;

pub use hex::Hex;
pub use hyperbolic::{DiskModel, Hyperbolic};
pub use polyhedral::{Polyhedral, RotationGroup};
pub use retile::{Retile, Rotate};
pub use spherical::Spherical;
pub use tunnel::Tunnel;
pub use whirlpool::Whirlpool;

/// Region the mapping output is further intersected with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingDomain {
    /// The unit square (whole canvas).
    Square,
    /// The closed unit disk (circular canvas).
    Disk,
}

impl MappingDomain {
    /// `true` when `p` lies inside this domain.
    pub fn contains(self, p: Point) -> bool {
        match self {
            Self::Square => p.max_norm() <= 1.0,
            Self::Disk => p.length() <= 1.0,
        }
    }
}

/// One symmetry family with its parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mapping {
    /// Every point samples itself.
    Identity,
    /// Rotation about the canvas center.
    Rotate(Rotate),
    /// Sphere rotation through an equirectangular chart.
    Spherical(Spherical),
    /// Fold by a finite rotation group of a regular polyhedron.
    Polyhedral(Polyhedral),
    /// Regular `{p, q}` hyperbolic tiling.
    Hyperbolic(Hyperbolic),
    /// Logarithmic-spiral warp.
    Whirlpool(Whirlpool),
    /// Radial zoom tunnel.
    Tunnel(Tunnel),
    /// Per-quadrant pinwheel rotation.
    Retile(Retile),
    /// Inscribed hexagon mask or wrap.
    Hex(Hex),
}

impl Mapping {
    /// Map an output point to its source point.
    pub fn apply(&self, p: Point) -> Option<Point> {
        if !p.is_finite() {
            return None;
        }
        let out = match self {
            Self::Identity => Some(p),
            Self::Rotate(m) => m.apply(p),
            Self::Spherical(m) => m.apply(p),
            Self::Polyhedral(m) => m.apply(p),
            Self::Hyperbolic(m) => m.apply(p),
            Self::Whirlpool(m) => m.apply(p),
            Self::Tunnel(m) => m.apply(p),
            Self::Retile(m) => m.apply(p),
            Self::Hex(m) => m.apply(p),
        };
        out.filter(|q| q.is_finite())
    }

    /// Domain the output is intersected with before rasterization.
    pub fn domain(&self) -> MappingDomain {
        match self {
            Self::Spherical(_) | Self::Identity | Self::Rotate(_) | Self::Retile(_) => {
                MappingDomain::Square
            }
            Self::Polyhedral(m) => m.domain(),
            Self::Hyperbolic(_) => MappingDomain::Disk,
            Self::Whirlpool(_) | Self::Tunnel(_) | Self::Hex(_) => MappingDomain::Square,
        }
    }

    /// Reject parameter records that cannot describe a mapping.
    pub fn validate(&self) -> SymmetraResult<()> {
        match self {
            Self::Identity | Self::Rotate(_) | Self::Retile(_) | Self::Hex(_) => Ok(()),
            Self::Spherical(m) => m.validate(),
            Self::Polyhedral(m) => m.validate(),
            Self::Hyperbolic(m) => m.validate(),
            Self::Whirlpool(m) => m.validate(),
            Self::Tunnel(m) => m.validate(),
        }
    }

    /// Stable 64-bit identity of the family and every parameter.
    pub fn identity_hash(&self) -> u64 {
        let mut h = IdentityBytes::new();
        self.write_identity(&mut h);
        h.hash()
    }

    pub(crate) fn write_identity(&self, h: &mut IdentityBytes) {
        match self {
            Self::Identity => h.write_u8(0),
            Self::Rotate(m) => {
                h.write_u8(1);
                h.write_f64(m.angle);
            }
            Self::Spherical(m) => {
                h.write_u8(2);
                h.write_f64(m.yaw);
                h.write_f64(m.pitch);
                h.write_u8(u8::from(m.inverse));
            }
            Self::Polyhedral(m) => {
                h.write_u8(3);
                h.write_u8(m.group as u8);
                h.write_u8(u8::from(m.expand));
                h.write_f64(m.zoom);
            }
            Self::Hyperbolic(m) => {
                h.write_u8(4);
                h.write_u32(m.p);
                h.write_u32(m.q);
                h.write_u32(m.depth);
                h.write_u8(m.model as u8);
                h.write_f64(m.max_radius);
                h.write_f64(m.rotation);
            }
            Self::Whirlpool(m) => {
                h.write_u8(5);
                h.write_f64(m.angle);
                h.write_f64(m.scale);
                h.write_f64(m.inner_radius);
                h.write_f64(m.trim);
                h.write_u32(m.max_steps);
            }
            Self::Tunnel(m) => {
                h.write_u8(6);
                h.write_f64(m.scale);
                h.write_u32(m.max_steps);
            }
            Self::Retile(m) => {
                h.write_u8(7);
                h.write_f64(m.angle);
            }
            Self::Hex(m) => {
                h.write_u8(8);
                h.write_u8(u8::from(m.wrap));
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/mod.rs"]
mod tests;
