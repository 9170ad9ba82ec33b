use crate::foundation::core::Dimensions;
use crate::foundation::error::{SymmetraError, SymmetraResult};

/// Canvas widths to optimize at, smallest first. Heights follow the canvas aspect ratio.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct ResolutionSchedule {
    widths: Vec<u32>,
}

impl ResolutionSchedule {
    /// Schedule over `widths`, sorted ascending with duplicates removed.
    pub fn new(widths: impl IntoIterator<Item = u32>) -> SymmetraResult<Self> {
        let mut widths = widths.into_iter().collect::<Vec<_>>();
        if widths.is_empty() {
            return Err(SymmetraError::validation(
                "resolution schedule must not be empty",
            ));
        }
        if widths.contains(&0) {
            return Err(SymmetraError::validation(
                "resolution schedule widths must be >= 1",
            ));
        }
        widths.sort_unstable();
        widths.dedup();
        Ok(Self { widths })
    }

    /// A single resolution.
    pub fn single(width: u32) -> SymmetraResult<Self> {
        Self::new([width])
    }

    /// Widths in processing order.
    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    /// Number of resolutions.
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// Always `false`; schedules are never empty.
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Canvas shape at every step for a canvas shaped like `canvas`.
    pub fn dimensions(&self, canvas: Dimensions) -> Vec<Dimensions> {
        self.widths
            .iter()
            .map(|&w| canvas.scaled_to_width(w))
            .collect()
    }
}

impl TryFrom<Vec<u32>> for ResolutionSchedule {
    type Error = SymmetraError;

    fn try_from(widths: Vec<u32>) -> SymmetraResult<Self> {
        Self::new(widths)
    }
}

impl From<ResolutionSchedule> for Vec<u32> {
    fn from(s: ResolutionSchedule) -> Self {
        s.widths
    }
}

#[cfg(test)]
#[path = "../../tests/unit/optimize/schedule.rs"]
mod tests;
