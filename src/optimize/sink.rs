use crate::foundation::core::{Dimensions, ImageTensor};
use crate::foundation::error::SymmetraResult;

/// A periodic view of the canvas while it is being optimized.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Position in the resolution schedule.
    pub resolution: usize,
    /// Canvas shape at that resolution.
    pub dims: Dimensions,
    /// Run number at that resolution, starting at 0; retries count up.
    pub run: u32,
    /// Accepted steps so far in the run.
    pub iteration: u32,
    /// Loss of the canvas shown.
    pub loss: f64,
    /// The canvas quantized for display.
    pub image: image::RgbImage,
}

impl Snapshot {
    pub(crate) fn capture(
        resolution: usize,
        run: u32,
        iteration: u32,
        loss: f64,
        canvas: &ImageTensor,
    ) -> Self {
        Self {
            resolution,
            dims: canvas.dims(),
            run,
            iteration,
            loss,
            image: canvas.to_rgb8(),
        }
    }
}

/// Receiver of snapshots and progress notes.
///
/// Sinks are observers: an error returned here is logged and never changes the optimization.
pub trait SnapshotSink {
    /// Consume one snapshot.
    fn snapshot(&mut self, snapshot: &Snapshot) -> SymmetraResult<()>;

    /// Consume a free-form progress line.
    fn note(&mut self, _text: &str) -> SymmetraResult<()> {
        Ok(())
    }
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn snapshot(&mut self, _snapshot: &Snapshot) -> SymmetraResult<()> {
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    /// Snapshots in emission order.
    pub snapshots: Vec<Snapshot>,
    /// Notes in emission order.
    pub notes: Vec<String>,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotSink for InMemorySink {
    fn snapshot(&mut self, snapshot: &Snapshot) -> SymmetraResult<()> {
        self.snapshots.push(snapshot.clone());
        Ok(())
    }

    fn note(&mut self, text: &str) -> SymmetraResult<()> {
        self.notes.push(text.to_owned());
        Ok(())
    }
}
