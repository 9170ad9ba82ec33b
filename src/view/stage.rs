use std::sync::Arc;

use rayon::prelude::*;

use crate::algebra::permutation::Permutation;
use crate::foundation::core::{Dimensions, ImageTensor};
use crate::foundation::error::{SymmetraError, SymmetraResult};
use crate::view::index_map::PixelIndexMap;

/// A differentiable gather over one pixel index map.
///
/// `forward` reads every output pixel from its mapped source pixel (zero where the map has
/// no source). `backward` scatters output gradients back onto the sources they were read from.
#[derive(Clone, Debug)]
pub struct TransformStage {
    dims: Dimensions,
    map: Arc<PixelIndexMap>,
    channels: Option<Permutation>,
}

impl TransformStage {
    /// Stage over `map` for a `dims` canvas, optionally permuting channels.
    pub fn new(
        dims: Dimensions,
        map: Arc<PixelIndexMap>,
        channels: Option<Permutation>,
    ) -> SymmetraResult<Self> {
        let dims = dims.validate()?;
        if map.width() != dims.width || map.height() != dims.height {
            return Err(SymmetraError::validation(format!(
                "index map is {}x{}, canvas is {}x{}",
                map.width(),
                map.height(),
                dims.width,
                dims.height
            )));
        }
        if let Some(p) = &channels
            && p.rank() != dims.channels as usize
        {
            return Err(SymmetraError::validation(format!(
                "channel permutation of rank {} on a {}-channel canvas",
                p.rank(),
                dims.channels
            )));
        }
        Ok(Self {
            dims,
            map,
            channels,
        })
    }

    /// Canvas shape.
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// The shared index map.
    pub fn map(&self) -> &Arc<PixelIndexMap> {
        &self.map
    }

    /// Channel permutation, if any.
    pub fn channels(&self) -> Option<&Permutation> {
        self.channels.as_ref()
    }

    /// `true` when both stages read through the same cached map.
    pub fn shares_map_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.map, &other.map)
    }

    fn channel_source(&self, c: usize) -> (usize, bool) {
        match &self.channels {
            Some(p) => p.source(c),
            None => (c, false),
        }
    }

    fn check(&self, image: &ImageTensor) -> SymmetraResult<()> {
        if image.dims() != self.dims {
            let d = image.dims();
            return Err(SymmetraError::validation(format!(
                "stage built for {}x{}x{} received {}x{}x{}",
                self.dims.width,
                self.dims.height,
                self.dims.channels,
                d.width,
                d.height,
                d.channels
            )));
        }
        Ok(())
    }

    /// Gather the transformed image.
    pub fn forward(&self, input: &ImageTensor) -> SymmetraResult<ImageTensor> {
        self.check(input)?;
        let channels = self.dims.channels as usize;
        let src = input.data();
        let mut out = vec![0.0f32; self.dims.len()];
        out.par_chunks_mut(channels)
            .enumerate()
            .for_each(|(pixel, px)| {
                let Some(from) = self.map.source(pixel) else {
                    return;
                };
                let base = from * channels;
                for (c, slot) in px.iter_mut().enumerate() {
                    let (sc, inverted) = self.channel_source(c);
                    let v = src[base + sc];
                    *slot = if inverted {
                        ImageTensor::VALUE_MAX - v
                    } else {
                        v
                    };
                }
            });
        ImageTensor::new(self.dims, out)
    }

    /// Accumulate `grad_output` onto the source pixels read by [`forward`](Self::forward).
    pub fn backward(&self, grad_output: &ImageTensor) -> SymmetraResult<ImageTensor> {
        self.check(grad_output)?;
        let channels = self.dims.channels as usize;
        let mut grad = vec![0.0f32; self.dims.len()];
        for (pixel, g) in grad_output.data().chunks_exact(channels).enumerate() {
            let Some(from) = self.map.source(pixel) else {
                continue;
            };
            let base = from * channels;
            for (c, &gv) in g.iter().enumerate() {
                let (sc, inverted) = self.channel_source(c);
                grad[base + sc] += if inverted { -gv } else { gv };
            }
        }
        ImageTensor::new(self.dims, grad)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/stage.rs"]
mod tests;
