use std::collections::VecDeque;

use crate::optimize::config::Precision;

/// Inner product accumulated at the requested precision.
pub(crate) fn dot(a: &[f32], b: &[f32], precision: Precision) -> f64 {
    match precision {
        Precision::Reduced => f64::from(a.iter().zip(b).map(|(&x, &y)| x * y).sum::<f32>()),
        Precision::Full => a
            .iter()
            .zip(b)
            .map(|(&x, &y)| f64::from(x) * f64::from(y))
            .sum(),
    }
}

pub(crate) fn max_abs(v: &[f32]) -> f32 {
    v.iter().fold(0.0f32, |m, &x| m.max(x.abs()))
}

fn zero_frozen(v: &mut [f32], frozen: Option<&[bool]>) {
    if let Some(frozen) = frozen {
        for (x, &f) in v.iter_mut().zip(frozen) {
            if f {
                *x = 0.0;
            }
        }
    }
}

#[derive(Debug)]
struct CurvaturePair {
    s: Vec<f32>,
    y: Vec<f32>,
    rho: f64,
}

/// Limited-memory BFGS direction from the last few accepted steps.
#[derive(Debug)]
pub(crate) struct QuasiNewton {
    memory: usize,
    pairs: VecDeque<CurvaturePair>,
}

impl QuasiNewton {
    pub(crate) fn new(memory: usize) -> Self {
        Self {
            memory,
            pairs: VecDeque::with_capacity(memory),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.pairs.len()
    }

    pub(crate) fn reset(&mut self) {
        self.pairs.clear();
    }

    /// Remember step `s` and gradient change `y`; pairs without positive curvature are skipped.
    pub(crate) fn update(&mut self, s: Vec<f32>, y: Vec<f32>, precision: Precision) -> bool {
        if self.memory == 0 {
            return false;
        }
        let sy = dot(&s, &y, precision);
        let yy = dot(&y, &y, precision);
        if !(sy.is_finite() && yy.is_finite()) || sy <= f64::EPSILON * yy || yy == 0.0 {
            return false;
        }
        if self.pairs.len() == self.memory {
            self.pairs.pop_front();
        }
        self.pairs.push_back(CurvaturePair { s, y, rho: 1.0 / sy });
        true
    }

    /// Descent direction for `grad` (two-loop recursion). Frozen entries are zero. Falls back
    /// to steepest descent, clearing the history, when the recursion does not descend.
    pub(crate) fn direction(
        &mut self,
        grad: &[f32],
        precision: Precision,
        frozen: Option<&[bool]>,
    ) -> Vec<f32> {
        let mut q = grad.to_vec();
        zero_frozen(&mut q, frozen);
        let mut alphas = Vec::with_capacity(self.pairs.len());
        for pair in self.pairs.iter().rev() {
            let a = pair.rho * dot(&pair.s, &q, precision);
            for (qi, &yi) in q.iter_mut().zip(&pair.y) {
                *qi -= (a as f32) * yi;
            }
            alphas.push(a);
        }

        let gamma = match self.pairs.back() {
            Some(last) => {
                let yy = dot(&last.y, &last.y, precision);
                1.0 / (last.rho * yy)
            }
            None => 1.0,
        };
        for qi in &mut q {
            *qi *= gamma as f32;
        }

        for (pair, &a) in self.pairs.iter().zip(alphas.iter().rev()) {
            let b = pair.rho * dot(&pair.y, &q, precision);
            for (qi, &si) in q.iter_mut().zip(&pair.s) {
                *qi += ((a - b) as f32) * si;
            }
        }

        let mut d = q.into_iter().map(|v| -v).collect::<Vec<f32>>();
        zero_frozen(&mut d, frozen);
        let slope = dot(grad, &d, precision);
        if !self.pairs.is_empty() && (!slope.is_finite() || slope >= 0.0) {
            tracing::debug!(slope, "quasi-Newton direction is not descending, resetting");
            self.reset();
            d = grad.iter().map(|&g| -g).collect();
            zero_frozen(&mut d, frozen);
        }
        d
    }
}

/// Per-element step bound that grows after accepted steps and shrinks after rejected ones.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TrustRegion {
    radius: f64,
    max: f64,
    min: f64,
}

impl TrustRegion {
    pub(crate) fn new(initial: f64, max: f64) -> Self {
        Self {
            radius: initial.min(max),
            max,
            min: max * 1e-6,
        }
    }

    pub(crate) fn radius(&self) -> f64 {
        self.radius
    }

    pub(crate) fn expand(&mut self) {
        self.radius = (self.radius * 2.0).min(self.max);
    }

    pub(crate) fn shrink(&mut self) {
        self.radius = (self.radius * 0.5).max(self.min);
    }

    /// Scale `d` so no element exceeds the radius. A first step (`normalize`) is scaled up
    /// to the radius as well, since its length carries no curvature information.
    pub(crate) fn constrain(&self, d: &mut [f32], normalize: bool) {
        let m = f64::from(max_abs(d));
        if m == 0.0 || !m.is_finite() {
            return;
        }
        if normalize || m > self.radius {
            let scale = (self.radius / m) as f32;
            for v in d.iter_mut() {
                *v *= scale;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/optimize/orientation.rs"]
mod tests;
