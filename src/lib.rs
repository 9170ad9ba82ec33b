//! symmetra renders symmetry-group transformations onto a rectangular canvas and optimizes that
//! canvas against an external objective.
//!
//! - Describe a symmetry as a [`Mapping`] and rasterize it into a [`PixelIndexMap`]
//! - Wrap mappings in [`View`]s, whose index maps are cached per canvas size, locally or in a
//!   shared [`ViewCache`]
//! - Compose views into a [`Pipeline`] (plain views, soft symmetry, [`Kaleidoscope`]s)
//! - Run an [`Optimizer`] over a [`ResolutionSchedule`] against any [`LossProvider`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod algebra;
pub mod effects;
pub mod mapping;
pub mod optimize;
pub mod view;

pub use crate::foundation::core::{Dimensions, ImageTensor, Point, Resample};
pub use crate::foundation::error::{SymmetraError, SymmetraResult};

pub use crate::algebra::permutation::Permutation;
pub use crate::effects::pipeline::{Pipeline, RenderStages, RenderTrace, Rendered, StageSpec};
pub use crate::effects::symmetrize::{Kaleidoscope, Symmetrized, Symmetrizer};
pub use crate::mapping::{
    DiskModel, Hex, Hyperbolic, Mapping, MappingDomain, Polyhedral, Retile, Rotate, RotationGroup,
    Spherical, Tunnel, Whirlpool,
};
pub use crate::optimize::config::{OptimizerConfig, Precision};
pub use crate::optimize::controller::{
    Optimized, Optimizer, Phase, TerminationCause, TrainingResult,
};
pub use crate::optimize::provider::{Evaluation, LossProvider};
pub use crate::optimize::schedule::ResolutionSchedule;
pub use crate::optimize::sink::{InMemorySink, NullSink, Snapshot, SnapshotSink};
pub use crate::view::cache::{CacheScope, View, ViewCache, ViewKey};
pub use crate::view::index_map::{PixelIndexMap, build_pixel_index_map};
pub use crate::view::mask::ViewMask;
pub use crate::view::stage::TransformStage;
