use rayon::prelude::*;

use crate::foundation::core::{Dimensions, Point};
use crate::foundation::error::{SymmetraError, SymmetraResult};
use crate::mapping::{Mapping, MappingDomain};
use crate::view::mask::ViewMask;

/// Per-pixel lookup table: output pixel `i` samples source pixel `indices[i]`.
///
/// Immutable after construction and shared through the view caches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelIndexMap {
    width: u32,
    height: u32,
    indices: Vec<u32>,
}

impl PixelIndexMap {
    /// Entry meaning "no source pixel".
    pub const SENTINEL: u32 = u32::MAX;

    /// Map where every pixel samples itself.
    pub fn identity(width: u32, height: u32) -> Self {
        let n = (width as usize) * (height as usize);
        Self {
            width,
            height,
            indices: (0..n as u32).collect(),
        }
    }

    /// Output width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of entries (`width * height`).
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// `true` for a zero-pixel map.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Raw entries, sentinel included.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Source pixel for output pixel `pixel`, if any.
    pub fn source(&self, pixel: usize) -> Option<usize> {
        match self.indices.get(pixel) {
            Some(&i) if i != Self::SENTINEL => Some(i as usize),
            _ => None,
        }
    }

    /// Number of pixels with a source.
    pub fn defined_count(&self) -> usize {
        self.indices
            .iter()
            .filter(|&&i| i != Self::SENTINEL)
            .count()
    }
}

/// Rasterize `mapping` over a `dims` canvas.
///
/// Each output pixel center is mapped; a defined result that lies in the mapping's domain,
/// inside `mask`, and rounds to an on-canvas pixel records that pixel's linear index. Anything
/// else records [`PixelIndexMap::SENTINEL`]. Rows are built in parallel.
#[tracing::instrument(skip(mapping, mask))]
pub fn build_pixel_index_map(
    dims: Dimensions,
    mapping: &Mapping,
    mask: &ViewMask,
) -> SymmetraResult<PixelIndexMap> {
    let dims = dims.validate()?;
    mapping.validate()?;
    mask.validate()?;
    if dims.pixel_count() >= PixelIndexMap::SENTINEL as usize {
        return Err(SymmetraError::validation(format!(
            "{}x{} canvas is too large for a pixel index map",
            dims.width, dims.height
        )));
    }

    let domain = mapping.domain();
    let mut indices = vec![PixelIndexMap::SENTINEL; dims.pixel_count()];
    indices
        .par_chunks_mut(dims.width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, slot) in row.iter_mut().enumerate() {
                let center = dims.pixel_center(x as u32, y as u32);
                if let Some(src) = source_index(dims, mapping, domain, mask, center) {
                    *slot = src;
                }
            }
        });

    let map = PixelIndexMap {
        width: dims.width,
        height: dims.height,
        indices,
    };
    tracing::debug!(
        defined = map.defined_count(),
        total = map.len(),
        "built pixel index map"
    );
    Ok(map)
}

fn source_index(
    dims: Dimensions,
    mapping: &Mapping,
    domain: MappingDomain,
    mask: &ViewMask,
    center: Point,
) -> Option<u32> {
    let q = mapping.apply(center)?;
    if !domain.contains(q) || !mask.contains(q) {
        return None;
    }
    let (sx, sy) = dims.nearest_pixel(q)?;
    Some(sy * dims.width + sx)
}

#[cfg(test)]
#[path = "../../tests/unit/view/index_map.rs"]
mod tests;
