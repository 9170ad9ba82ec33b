use std::f64::consts::TAU;
use std::sync::Arc;

use crate::algebra::permutation::Permutation;
use crate::foundation::core::{Dimensions, ImageTensor};
use crate::foundation::error::{SymmetraError, SymmetraResult};
use crate::mapping::{Mapping, Rotate};
use crate::view::cache::{View, ViewCache};
use crate::view::stage::TransformStage;

/// Output of [`Symmetrizer::forward`].
#[derive(Clone, Debug)]
pub struct Symmetrized {
    /// Clamped branch mean.
    pub image: ImageTensor,
    /// Per-value flag: the mean fell outside the display range and was clamped.
    pub clamped: Vec<bool>,
}

/// Mean of several transformed copies of one image, clamped to the display range.
///
/// A `None` branch contributes the input unchanged.
#[derive(Clone, Debug)]
pub struct Symmetrizer {
    dims: Dimensions,
    branches: Vec<Option<TransformStage>>,
}

impl Symmetrizer {
    /// Combine `branches` over a `dims` canvas. At least one branch is required and every
    /// stage must be built for `dims`.
    pub fn new(dims: Dimensions, branches: Vec<Option<TransformStage>>) -> SymmetraResult<Self> {
        let dims = dims.validate()?;
        if branches.is_empty() {
            return Err(SymmetraError::validation(
                "symmetrizer needs at least one branch",
            ));
        }
        if let Some(stage) = branches.iter().flatten().find(|s| s.dims() != dims) {
            let d = stage.dims();
            return Err(SymmetraError::validation(format!(
                "symmetrizer branch built for {}x{}x{}, canvas is {}x{}x{}",
                d.width, d.height, d.channels, dims.width, dims.height, dims.channels
            )));
        }
        Ok(Self { dims, branches })
    }

    /// Canvas shape.
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Number of averaged branches.
    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// Branch stages; `None` is the identity.
    pub fn branches(&self) -> &[Option<TransformStage>] {
        &self.branches
    }

    /// Average every branch's view of `input`.
    pub fn forward(&self, input: &ImageTensor) -> SymmetraResult<Symmetrized> {
        if input.dims() != self.dims {
            return Err(SymmetraError::validation(
                "symmetrizer input does not match its canvas",
            ));
        }
        let mut sum = vec![0.0f32; self.dims.len()];
        for branch in &self.branches {
            match branch {
                Some(stage) => add_into(&mut sum, stage.forward(input)?.data()),
                None => add_into(&mut sum, input.data()),
            }
        }

        let n = self.branches.len() as f32;
        let mut clamped = vec![false; sum.len()];
        for (v, flag) in sum.iter_mut().zip(clamped.iter_mut()) {
            let mean = *v / n;
            *flag = !(ImageTensor::VALUE_MIN..=ImageTensor::VALUE_MAX).contains(&mean);
            *v = mean.clamp(ImageTensor::VALUE_MIN, ImageTensor::VALUE_MAX);
        }
        Ok(Symmetrized {
            image: ImageTensor::new(self.dims, sum)?,
            clamped,
        })
    }

    /// Route `grad_output` back to the input: zero where the forward pass clamped, divided by
    /// the branch count, then through every branch.
    pub fn backward(
        &self,
        clamped: &[bool],
        grad_output: &ImageTensor,
    ) -> SymmetraResult<ImageTensor> {
        if grad_output.dims() != self.dims || clamped.len() != self.dims.len() {
            return Err(SymmetraError::validation(
                "symmetrizer gradient does not match its canvas",
            ));
        }
        let n = self.branches.len() as f32;
        let scaled = grad_output
            .data()
            .iter()
            .zip(clamped)
            .map(|(&g, &c)| if c { 0.0 } else { g / n })
            .collect::<Vec<f32>>();
        let scaled = ImageTensor::new(self.dims, scaled)?;

        let mut grad = vec![0.0f32; self.dims.len()];
        for branch in &self.branches {
            match branch {
                Some(stage) => add_into(&mut grad, stage.backward(&scaled)?.data()),
                None => add_into(&mut grad, scaled.data()),
            }
        }
        ImageTensor::new(self.dims, grad)
    }
}

fn add_into(acc: &mut [f32], src: &[f32]) {
    for (a, s) in acc.iter_mut().zip(src) {
        *a += s;
    }
}

/// N-fold radial symmetry: the mean of `segments` rotations by `2πi / segments`, where
/// rotation `i` also permutes channels by `channels^i`.
#[derive(Clone, Debug, PartialEq)]
pub struct Kaleidoscope {
    segments: u32,
    channels: Permutation,
}

impl Kaleidoscope {
    /// Kaleidoscope with `segments` rotations. `channels` must close after `segments`
    /// applications, otherwise the last copy would not line up with the first.
    pub fn new(segments: u32, channels: Permutation) -> SymmetraResult<Self> {
        if segments == 0 {
            return Err(SymmetraError::validation(
                "kaleidoscope needs at least one segment",
            ));
        }
        if !channels.closes_after(segments) {
            return Err(SymmetraError::validation(format!(
                "channel permutation {channels} does not return to unity after {segments} segments"
            )));
        }
        Ok(Self { segments, channels })
    }

    /// Kaleidoscope with no channel permutation on a `channels`-channel canvas.
    pub fn plain(segments: u32, channels: usize) -> SymmetraResult<Self> {
        Self::new(segments, Permutation::unity(channels))
    }

    /// Number of rotated copies.
    pub fn segments(&self) -> u32 {
        self.segments
    }

    /// Per-segment channel permutation.
    pub fn channels(&self) -> &Permutation {
        &self.channels
    }

    /// One view per segment; segment 0 is the identity. Views read through `cache` when given.
    pub fn views(
        &self,
        cache: Option<&Arc<ViewCache>>,
    ) -> SymmetraResult<Vec<Option<Arc<View>>>> {
        let mut views = Vec::with_capacity(self.segments as usize);
        views.push(None);
        for i in 1..self.segments {
            let angle = TAU * f64::from(i) / f64::from(self.segments);
            let mut view = View::new(Mapping::Rotate(Rotate::new(angle)))?
                .with_channels(self.channels.power(i));
            if let Some(cache) = cache {
                view = view.shared(Arc::clone(cache));
            }
            views.push(Some(Arc::new(view)));
        }
        Ok(views)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/symmetrize.rs"]
mod tests;
