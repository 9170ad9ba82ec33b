use crate::foundation::core::ImageTensor;
use crate::foundation::error::SymmetraResult;
use crate::optimize::config::Precision;
use crate::optimize::orientation::dot;

/// Loss and canvas gradient at one point.
#[derive(Clone, Debug)]
pub(crate) struct Measured {
    pub(crate) loss: f64,
    pub(crate) gradient: ImageTensor,
}

/// An accepted line-search trial.
#[derive(Clone, Debug)]
pub(crate) struct Accepted {
    pub(crate) canvas: ImageTensor,
    pub(crate) measured: Measured,
    pub(crate) step: f64,
}

/// Backtracking search along a fixed direction with sufficient-decrease acceptance.
/// Trial points are projected onto `[lo, hi]` element-wise.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LineSearch {
    pub(crate) max_steps: u32,
    pub(crate) armijo: f64,
    pub(crate) backtrack: f64,
    pub(crate) lo: f32,
    pub(crate) hi: f32,
}

impl LineSearch {
    /// `Ok(None)` when no trial decreases the loss enough.
    pub(crate) fn search(
        &self,
        canvas: &ImageTensor,
        at: &Measured,
        direction: &[f32],
        precision: Precision,
        mut evaluate: impl FnMut(&ImageTensor) -> SymmetraResult<Measured>,
    ) -> SymmetraResult<Option<Accepted>> {
        let mut step = 1.0f64;
        for trial in 0..self.max_steps {
            let mut next = canvas.clone();
            for (v, &d) in next.data_mut().iter_mut().zip(direction) {
                *v = (*v + (step as f32) * d).clamp(self.lo, self.hi);
            }
            let moved = next
                .data()
                .iter()
                .zip(canvas.data())
                .map(|(&a, &b)| a - b)
                .collect::<Vec<f32>>();
            let slope = dot(at.gradient.data(), &moved, precision);
            if slope.is_nan() || slope >= 0.0 {
                tracing::debug!(trial, step, slope, "projected step does not descend");
                return Ok(None);
            }

            let measured = evaluate(&next)?;
            if measured.loss.is_finite() && measured.loss <= at.loss + self.armijo * slope {
                return Ok(Some(Accepted {
                    canvas: next,
                    measured,
                    step,
                }));
            }
            tracing::trace!(trial, step, loss = measured.loss, "line search trial rejected");
            step *= self.backtrack;
        }
        Ok(None)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/optimize/line_search.rs"]
mod tests;
