use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;

use crate::foundation::core::{ImageTensor, Resample};
use crate::foundation::error::{SymmetraError, SymmetraResult};
use crate::view::mask::ViewMask;

/// Numeric precision of one optimization step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// Fast path: inner products accumulate in `f32`.
    #[default]
    Reduced,
    /// Recovery path after a failed step: inner products accumulate in `f64`.
    Full,
}

/// Knobs of [`Optimizer`](crate::optimize::controller::Optimizer).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerConfig {
    /// Step budget per run; rejected steps count too.
    pub max_iterations: u32,
    /// Wall-clock budget per run, milliseconds.
    pub timeout_ms: Option<u64>,
    /// Loss at or below which a run succeeds.
    pub target_loss: Option<f64>,
    /// A run succeeds once an accepted step improves the loss by less than this fraction.
    pub relative_tolerance: f64,
    /// Largest per-element change a single step may make.
    pub max_step: f64,
    /// Starting per-element trust radius.
    pub initial_trust_radius: f64,
    /// Curvature pairs remembered by the quasi-Newton orientation.
    pub history: usize,
    /// Trial evaluations per line search.
    pub max_line_search_steps: u32,
    /// Sufficient-decrease constant.
    pub armijo: f64,
    /// Step shrink factor between line-search trials.
    pub backtrack: f64,
    /// Consecutive full-precision step failures that fail a run.
    pub max_step_failures: u32,
    /// Reruns after a failed run, at most [`Self::MAX_RETRIES`].
    pub max_retries: u32,
    /// Noise magnitude (fraction of the value range) before the first retry; doubles per retry.
    pub initial_noise: f64,
    /// Lower canvas bound.
    pub value_min: f32,
    /// Upper canvas bound.
    pub value_max: f32,
    /// Filter used when moving between resolutions.
    pub resample: Resample,
    /// Emit a snapshot every this many accepted steps; `0` disables snapshots.
    pub snapshot_every: u32,
    /// Pixels whose centers fall inside this region are never modified.
    pub frozen: Option<ViewMask>,
    /// Seed of the retry noise generator.
    pub seed: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            timeout_ms: None,
            target_loss: None,
            relative_tolerance: 1e-6,
            max_step: 32.0,
            initial_trust_radius: 8.0,
            history: 8,
            max_line_search_steps: 12,
            armijo: 1e-4,
            backtrack: 0.5,
            max_step_failures: 3,
            max_retries: 3,
            initial_noise: 0.1,
            value_min: ImageTensor::VALUE_MIN,
            value_max: ImageTensor::VALUE_MAX,
            resample: Resample::Bilinear,
            snapshot_every: 0,
            frozen: None,
            seed: 0,
        }
    }
}

impl OptimizerConfig {
    /// Largest accepted `max_retries`.
    pub const MAX_RETRIES: u32 = 32;

    /// Parse a configuration from JSON text. Missing fields take their defaults.
    pub fn from_json(text: &str) -> SymmetraResult<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON reader.
    pub fn from_reader(r: impl Read) -> SymmetraResult<Self> {
        let cfg: Self = serde_json::from_reader(r)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SymmetraResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SymmetraError::validation(format!("open optimizer config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Wall-clock budget, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Reject settings the controller cannot run with.
    pub fn validate(&self) -> SymmetraResult<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.max_step) {
            return Err(SymmetraError::validation("max_step must be > 0"));
        }
        if !positive(self.initial_trust_radius) || self.initial_trust_radius > self.max_step {
            return Err(SymmetraError::validation(
                "initial_trust_radius must be in (0, max_step]",
            ));
        }
        if !(self.relative_tolerance.is_finite() && self.relative_tolerance >= 0.0) {
            return Err(SymmetraError::validation("relative_tolerance must be >= 0"));
        }
        if !(self.armijo > 0.0 && self.armijo < 1.0) {
            return Err(SymmetraError::validation("armijo must be in (0, 1)"));
        }
        if !(self.backtrack > 0.0 && self.backtrack < 1.0) {
            return Err(SymmetraError::validation("backtrack must be in (0, 1)"));
        }
        if self.max_line_search_steps == 0 {
            return Err(SymmetraError::validation(
                "max_line_search_steps must be >= 1",
            ));
        }
        if self.max_step_failures == 0 {
            return Err(SymmetraError::validation("max_step_failures must be >= 1"));
        }
        if !(self.initial_noise.is_finite() && self.initial_noise >= 0.0) {
            return Err(SymmetraError::validation("initial_noise must be >= 0"));
        }
        if self.max_retries > Self::MAX_RETRIES {
            return Err(SymmetraError::validation(format!(
                "max_retries must be <= {}",
                Self::MAX_RETRIES
            )));
        }
        // Noise doubles before every retry.
        if !(self.initial_noise * 2f64.powi(self.max_retries as i32)).is_finite() {
            return Err(SymmetraError::validation(
                "initial_noise overflows over max_retries doublings",
            ));
        }
        if !(self.value_min.is_finite() && self.value_max.is_finite())
            || self.value_min >= self.value_max
        {
            return Err(SymmetraError::validation(
                "value_min must be below value_max",
            ));
        }
        if let Some(t) = self.target_loss
            && !t.is_finite()
        {
            return Err(SymmetraError::validation("target_loss must be finite"));
        }
        if let Some(mask) = &self.frozen {
            mask.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/optimize/config.rs"]
mod tests;
