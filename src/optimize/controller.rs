use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::effects::pipeline::{Pipeline, RenderStages};
use crate::foundation::core::{Dimensions, ImageTensor};
use crate::foundation::error::{SymmetraError, SymmetraResult};
use crate::optimize::config::{OptimizerConfig, Precision};
use crate::optimize::line_search::{LineSearch, Measured};
use crate::optimize::orientation::{QuasiNewton, TrustRegion, max_abs};
use crate::optimize::provider::LossProvider;
use crate::optimize::schedule::ResolutionSchedule;
use crate::optimize::sink::{NullSink, Snapshot, SnapshotSink};
use crate::view::mask::ViewMask;

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationCause {
    /// Converged, reached the target loss, or used its budget without a target to miss.
    Succeeded,
    /// Too many consecutive full-precision step failures.
    Failed,
    /// Budget exhausted before the target loss was reached.
    TimedOut,
}

/// Summary of one [`Optimizer::optimize`] call across every resolution and retry.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TrainingResult {
    /// Cause of the last run.
    pub cause: TerminationCause,
    /// Loss of the returned canvas.
    pub final_loss: f64,
    /// Steps attempted over all runs.
    pub iterations: u32,
    /// Wall-clock time of the whole call.
    pub elapsed: Duration,
    /// Runs executed, retries included.
    pub runs: u32,
    /// Noise magnitude applied before each retry, in order.
    pub noise_magnitudes: Vec<f64>,
}

/// Final canvas and its summary.
#[derive(Clone, Debug)]
pub struct Optimized {
    /// Canvas at the last scheduled resolution reached.
    pub canvas: ImageTensor,
    /// What happened.
    pub result: TrainingResult,
}

/// States of one optimization run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Evaluate loss and gradient at the current canvas.
    Rendering,
    /// Check budgets, then orient and line-search one step.
    Measuring,
    /// A step lowered the loss.
    StepAccepted,
    /// No step lowered the loss enough.
    StepRejected,
    /// The run is over.
    Terminated(TerminationCause),
}

/// Multi-resolution canvas optimizer.
#[derive(Clone, Debug, Default)]
pub struct Optimizer {
    config: OptimizerConfig,
    pipeline: Pipeline,
}

impl Optimizer {
    /// Optimizer with `config` and an empty pipeline.
    pub fn new(config: OptimizerConfig) -> SymmetraResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            pipeline: Pipeline::new(),
        })
    }

    /// Render the canvas through `pipeline` before every evaluation.
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Active pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Optimize `canvas` against `provider` at every width of `schedule`, without snapshots.
    pub fn optimize(
        &self,
        canvas: &ImageTensor,
        provider: &mut dyn LossProvider,
        schedule: &ResolutionSchedule,
    ) -> SymmetraResult<Optimized> {
        self.optimize_with_sink(canvas, provider, schedule, &mut NullSink)
    }

    /// Optimize `canvas` against `provider`, reporting progress to `sink`.
    ///
    /// Resolutions run smallest first, each starting from the previous result resampled to its
    /// size. A resolution whose last run fails ends the schedule early.
    #[tracing::instrument(skip_all, fields(widths = ?schedule.widths()))]
    pub fn optimize_with_sink(
        &self,
        canvas: &ImageTensor,
        provider: &mut dyn LossProvider,
        schedule: &ResolutionSchedule,
        sink: &mut dyn SnapshotSink,
    ) -> SymmetraResult<Optimized> {
        let cfg = &self.config;
        let started = Instant::now();
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let mut canvas = canvas.clone();
        let mut summary = Summary::default();

        for (resolution, dims) in schedule.dimensions(canvas.dims()).into_iter().enumerate() {
            canvas = canvas.resize(dims, cfg.resample, cfg.value_min, cfg.value_max)?;
            for v in canvas.data_mut() {
                *v = v.clamp(cfg.value_min, cfg.value_max);
            }
            let stages = self.pipeline.build(dims)?;
            let frozen = cfg.frozen.as_ref().map(|m| frozen_values(m, dims));
            let ctx = RunContext {
                config: cfg,
                stages: &stages,
                frozen: frozen.as_deref(),
                resolution,
            };

            let outcome = ctx.run_with_retries(canvas, provider, sink, &mut rng, &mut summary)?;
            canvas = outcome.canvas;
            tracing::info!(
                resolution,
                width = dims.width,
                height = dims.height,
                cause = ?outcome.cause,
                loss = outcome.loss,
                "resolution finished"
            );
            let note = format!(
                "{}x{}: {:?} at loss {:.6} after {} steps",
                dims.width, dims.height, outcome.cause, outcome.loss, summary.iterations
            );
            if let Err(e) = sink.note(&note) {
                tracing::warn!(error = %e, "snapshot sink rejected a note");
            }
            summary.cause = Some(outcome.cause);
            summary.final_loss = outcome.loss;
            if outcome.cause == TerminationCause::Failed {
                break;
            }
        }

        let cause = summary
            .cause
            .ok_or_else(|| SymmetraError::evaluation("resolution schedule produced no run"))?;
        Ok(Optimized {
            canvas,
            result: TrainingResult {
                cause,
                final_loss: summary.final_loss,
                iterations: summary.iterations,
                elapsed: started.elapsed(),
                runs: summary.runs,
                noise_magnitudes: summary.noise_magnitudes,
            },
        })
    }
}

#[derive(Debug, Default)]
struct Summary {
    cause: Option<TerminationCause>,
    final_loss: f64,
    iterations: u32,
    runs: u32,
    noise_magnitudes: Vec<f64>,
}

struct RunOutcome {
    canvas: ImageTensor,
    cause: TerminationCause,
    loss: f64,
}

struct RunContext<'a> {
    config: &'a OptimizerConfig,
    stages: &'a RenderStages,
    frozen: Option<&'a [bool]>,
    resolution: usize,
}

impl RunContext<'_> {
    fn run_with_retries(
        &self,
        mut canvas: ImageTensor,
        provider: &mut dyn LossProvider,
        sink: &mut dyn SnapshotSink,
        rng: &mut StdRng,
        summary: &mut Summary,
    ) -> SymmetraResult<RunOutcome> {
        let cfg = self.config;
        let mut noise = cfg.initial_noise;
        let mut attempt = 0u32;
        loop {
            if attempt > 0 {
                tracing::warn!(attempt, noise, "run failed, retrying from a perturbed canvas");
                perturb(&mut canvas, noise, cfg, self.frozen, rng)?;
                summary.noise_magnitudes.push(noise);
                noise *= 2.0;
            }

            let mut run = Run::new(self, canvas, attempt);
            let cause = run.execute(provider, sink)?;
            summary.runs += 1;
            summary.iterations += run.iterations;
            let loss = run.measured.as_ref().map_or(f64::NAN, |m| m.loss);
            canvas = run.canvas;

            if cause != TerminationCause::Failed || attempt >= cfg.max_retries {
                return Ok(RunOutcome {
                    canvas,
                    cause,
                    loss,
                });
            }
            attempt += 1;
        }
    }
}

struct Run<'a> {
    ctx: &'a RunContext<'a>,
    index: u32,
    started: Instant,
    canvas: ImageTensor,
    measured: Option<Measured>,
    precision: Precision,
    failures: u32,
    iterations: u32,
    accepted: u32,
    improvement: f64,
    trust: TrustRegion,
    quasi_newton: QuasiNewton,
}

impl<'a> Run<'a> {
    fn new(ctx: &'a RunContext<'a>, canvas: ImageTensor, index: u32) -> Self {
        let cfg = ctx.config;
        Self {
            ctx,
            index,
            started: Instant::now(),
            canvas,
            measured: None,
            precision: Precision::Reduced,
            failures: 0,
            iterations: 0,
            accepted: 0,
            improvement: f64::INFINITY,
            trust: TrustRegion::new(cfg.initial_trust_radius, cfg.max_step),
            quasi_newton: QuasiNewton::new(cfg.history),
        }
    }

    fn execute(
        &mut self,
        provider: &mut dyn LossProvider,
        sink: &mut dyn SnapshotSink,
    ) -> SymmetraResult<TerminationCause> {
        let mut phase = Phase::Rendering;
        loop {
            if let Phase::Terminated(cause) = phase {
                tracing::debug!(
                    run = self.index,
                    ?cause,
                    iterations = self.iterations,
                    "run ended"
                );
                return Ok(cause);
            }
            let next = self.transition(phase, provider, sink)?;
            tracing::trace!(?phase, ?next, "phase transition");
            phase = next;
        }
    }

    fn transition(
        &mut self,
        phase: Phase,
        provider: &mut dyn LossProvider,
        sink: &mut dyn SnapshotSink,
    ) -> SymmetraResult<Phase> {
        match phase {
            Phase::Rendering => self.render(provider),
            Phase::Measuring => self.measure(provider),
            Phase::StepAccepted => Ok(self.accept(sink)),
            Phase::StepRejected => Ok(self.reject()),
            Phase::Terminated(cause) => Ok(Phase::Terminated(cause)),
        }
    }

    fn loss(&self) -> f64 {
        self.measured.as_ref().map_or(f64::NAN, |m| m.loss)
    }

    fn target_reached(&self) -> bool {
        self.ctx.config.target_loss.is_some_and(|t| self.loss() <= t)
    }

    fn budget_cause(&self) -> TerminationCause {
        match self.ctx.config.target_loss {
            Some(_) if !self.target_reached() => TerminationCause::TimedOut,
            _ => TerminationCause::Succeeded,
        }
    }

    fn budget_exhausted(&self) -> bool {
        let cfg = self.ctx.config;
        self.iterations >= cfg.max_iterations
            || cfg.timeout().is_some_and(|t| self.started.elapsed() >= t)
    }

    fn render(&mut self, provider: &mut dyn LossProvider) -> SymmetraResult<Phase> {
        let measured = evaluate(self.ctx.stages, provider, &self.canvas, self.precision)?;
        self.measured = Some(measured);
        if self.target_reached() {
            return Ok(Phase::Terminated(TerminationCause::Succeeded));
        }
        Ok(Phase::Measuring)
    }

    fn measure(&mut self, provider: &mut dyn LossProvider) -> SymmetraResult<Phase> {
        if self.budget_exhausted() {
            return Ok(Phase::Terminated(self.budget_cause()));
        }
        let Some(at) = self.measured.as_ref() else {
            return Ok(Phase::Rendering);
        };
        self.iterations += 1;

        let cfg = self.ctx.config;
        let precision = self.precision;
        let mut direction = self
            .quasi_newton
            .direction(at.gradient.data(), precision, self.ctx.frozen);
        if !at.loss.is_finite() || direction.iter().any(|v| !v.is_finite()) {
            tracing::debug!(loss = at.loss, "non-finite loss or gradient");
            return Ok(Phase::StepRejected);
        }
        if max_abs(&direction) == 0.0 {
            tracing::debug!("gradient vanished on the free canvas");
            return Ok(Phase::Terminated(TerminationCause::Succeeded));
        }
        self.trust
            .constrain(&mut direction, self.quasi_newton.len() == 0);

        let search = LineSearch {
            max_steps: cfg.max_line_search_steps,
            armijo: cfg.armijo,
            backtrack: cfg.backtrack,
            lo: cfg.value_min,
            hi: cfg.value_max,
        };
        let stages = self.ctx.stages;
        let found = search.search(&self.canvas, at, &direction, precision, |c| {
            evaluate(stages, &mut *provider, c, precision)
        })?;
        let Some(accepted) = found else {
            return Ok(Phase::StepRejected);
        };

        let s = difference(accepted.canvas.data(), self.canvas.data());
        let y = difference(accepted.measured.gradient.data(), at.gradient.data());
        let before = at.loss;
        self.improvement = (before - accepted.measured.loss) / before.abs().max(f64::MIN_POSITIVE);
        self.quasi_newton.update(s, y, precision);
        tracing::debug!(
            iteration = self.iterations,
            step = accepted.step,
            loss = accepted.measured.loss,
            ?precision,
            "step accepted"
        );
        self.canvas = accepted.canvas;
        self.measured = Some(accepted.measured);
        Ok(Phase::StepAccepted)
    }

    fn accept(&mut self, sink: &mut dyn SnapshotSink) -> Phase {
        let cfg = self.ctx.config;
        self.failures = 0;
        self.accepted += 1;
        if self.precision == Precision::Full {
            tracing::debug!("step succeeded, returning to reduced precision");
            self.precision = Precision::Reduced;
        }
        self.trust.expand();

        if cfg.snapshot_every > 0 && self.accepted % cfg.snapshot_every == 0 {
            let snap = Snapshot::capture(
                self.ctx.resolution,
                self.index,
                self.accepted,
                self.loss(),
                &self.canvas,
            );
            if let Err(e) = sink.snapshot(&snap) {
                tracing::warn!(error = %e, "snapshot sink rejected a snapshot");
            }
        }

        if self.target_reached() || self.improvement < cfg.relative_tolerance {
            return Phase::Terminated(TerminationCause::Succeeded);
        }
        Phase::Measuring
    }

    fn reject(&mut self) -> Phase {
        self.trust.shrink();
        self.quasi_newton.reset();
        match self.precision {
            Precision::Reduced => {
                tracing::warn!(
                    iteration = self.iterations,
                    "step failed in reduced precision, escalating"
                );
                self.precision = Precision::Full;
                Phase::Rendering
            }
            Precision::Full => {
                self.failures += 1;
                tracing::debug!(
                    failures = self.failures,
                    radius = self.trust.radius(),
                    "step failed in full precision"
                );
                if self.failures >= self.ctx.config.max_step_failures {
                    Phase::Terminated(TerminationCause::Failed)
                } else {
                    Phase::Measuring
                }
            }
        }
    }
}

fn evaluate(
    stages: &RenderStages,
    provider: &mut dyn LossProvider,
    canvas: &ImageTensor,
    precision: Precision,
) -> SymmetraResult<Measured> {
    let rendered = stages.forward(canvas)?;
    let evaluation = provider.evaluate(&rendered.image, precision)?;
    if evaluation.gradient.dims() != rendered.image.dims() {
        return Err(SymmetraError::evaluation(
            "loss provider returned a gradient of the wrong shape",
        ));
    }
    let gradient = stages.backward(&rendered.trace, &evaluation.gradient)?;
    Ok(Measured {
        loss: evaluation.loss,
        gradient,
    })
}

fn difference(a: &[f32], b: &[f32]) -> Vec<f32> {
    a.iter().zip(b).map(|(&x, &y)| x - y).collect()
}

/// Per-value frozen flags for pixels whose centers lie inside `mask`.
fn frozen_values(mask: &ViewMask, dims: Dimensions) -> Vec<bool> {
    let mut out = Vec::with_capacity(dims.len());
    for y in 0..dims.height {
        for x in 0..dims.width {
            let inside = mask.contains(dims.pixel_center(x, y));
            out.extend(std::iter::repeat_n(inside, dims.channels as usize));
        }
    }
    out
}

fn perturb(
    canvas: &mut ImageTensor,
    magnitude: f64,
    cfg: &OptimizerConfig,
    frozen: Option<&[bool]>,
    rng: &mut StdRng,
) -> SymmetraResult<()> {
    if !(magnitude.is_finite() && magnitude >= 0.0) {
        return Err(SymmetraError::evaluation(format!(
            "retry noise magnitude {magnitude} is not a finite non-negative value"
        )));
    }
    let (lo, hi) = (f64::from(cfg.value_min), f64::from(cfg.value_max));
    let span = hi - lo;
    for (i, v) in canvas.data_mut().iter_mut().enumerate() {
        if frozen.is_some_and(|f| f[i]) {
            continue;
        }
        let noise = rng.gen_range(-magnitude..=magnitude) * span;
        *v = (f64::from(*v) + noise).clamp(lo, hi) as f32;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/optimize/controller.rs"]
mod tests;
