//! Canvas optimization: a multi-resolution quasi-Newton loop that renders the canvas through a
//! [`Pipeline`](crate::effects::pipeline::Pipeline), asks a [`LossProvider`](provider::LossProvider)
//! for loss and gradient, escalates numeric precision when steps fail, and retries failed runs
//! from a noise-perturbed canvas.

/// Optimizer configuration.
pub mod config;
/// The optimization state machine.
pub mod controller;
pub(crate) mod line_search;
pub(crate) mod orientation;
/// Objective interface.
pub mod provider;
/// Resolution schedules.
pub mod schedule;
/// Snapshot sinks.
pub mod sink;
