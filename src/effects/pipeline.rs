use std::sync::Arc;

use crate::effects::symmetrize::{Kaleidoscope, Symmetrizer};
use crate::foundation::core::{Dimensions, ImageTensor};
use crate::foundation::error::{SymmetraError, SymmetraResult};
use crate::view::cache::{View, ViewCache};
use crate::view::stage::TransformStage;

/// Resolution-independent description of one render stage.
#[derive(Clone, Debug)]
pub enum StageSpec {
    /// Resample the canvas through a view.
    View(Arc<View>),
    /// Mean of the listed views; `None` is the identity.
    Symmetrize(Vec<Option<Arc<View>>>),
}

impl StageSpec {
    /// Average `view` with the untransformed canvas.
    pub fn soft(view: Arc<View>) -> Self {
        Self::Symmetrize(vec![None, Some(view)])
    }

    /// Expand a kaleidoscope into its rotated branches.
    pub fn kaleidoscope(
        kaleidoscope: &Kaleidoscope,
        cache: Option<&Arc<ViewCache>>,
    ) -> SymmetraResult<Self> {
        Ok(Self::Symmetrize(kaleidoscope.views(cache)?))
    }

    fn build(&self, dims: Dimensions) -> SymmetraResult<Stage> {
        match self {
            Self::View(view) => Ok(Stage::Transform(view.get_view(dims)?)),
            Self::Symmetrize(views) => {
                let branches = views
                    .iter()
                    .map(|v| v.as_ref().map(|v| v.get_view(dims)).transpose())
                    .collect::<SymmetraResult<Vec<_>>>()?;
                Ok(Stage::Symmetrize(Symmetrizer::new(dims, branches)?))
            }
        }
    }
}

/// Ordered stage descriptions applied canvas first, rendered image last.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    stages: Vec<StageSpec>,
}

impl Pipeline {
    /// Pipeline that renders the canvas unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn then(mut self, stage: StageSpec) -> Self {
        self.stages.push(stage);
        self
    }

    /// Stage descriptions in application order.
    pub fn stages(&self) -> &[StageSpec] {
        &self.stages
    }

    /// `true` when no stage is configured.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Materialize every stage for a `dims` canvas, going through the views' caches.
    #[tracing::instrument(skip(self), fields(stages = self.stages.len()))]
    pub fn build(&self, dims: Dimensions) -> SymmetraResult<RenderStages> {
        let dims = dims.validate()?;
        let stages = self
            .stages
            .iter()
            .map(|s| s.build(dims))
            .collect::<SymmetraResult<Vec<_>>>()?;
        Ok(RenderStages { dims, stages })
    }
}

#[derive(Clone, Debug)]
enum Stage {
    Transform(TransformStage),
    Symmetrize(Symmetrizer),
}

/// Per-stage state recorded by a forward pass and consumed by the matching backward pass.
#[derive(Clone, Debug, Default)]
pub struct RenderTrace {
    clamped: Vec<Option<Vec<bool>>>,
}

/// A rendered canvas together with its trace.
#[derive(Clone, Debug)]
pub struct Rendered {
    /// Final image handed to the objective.
    pub image: ImageTensor,
    /// State for [`RenderStages::backward`].
    pub trace: RenderTrace,
}

/// Stages materialized for one canvas shape.
#[derive(Clone, Debug)]
pub struct RenderStages {
    dims: Dimensions,
    stages: Vec<Stage>,
}

impl RenderStages {
    /// Canvas shape.
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// `true` when rendering is the identity.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Render `canvas` through every stage.
    pub fn forward(&self, canvas: &ImageTensor) -> SymmetraResult<Rendered> {
        if canvas.dims() != self.dims {
            return Err(SymmetraError::validation(
                "canvas does not match the render stages",
            ));
        }
        let mut image = canvas.clone();
        let mut trace = RenderTrace {
            clamped: Vec::with_capacity(self.stages.len()),
        };
        for stage in &self.stages {
            match stage {
                Stage::Transform(t) => {
                    image = t.forward(&image)?;
                    trace.clamped.push(None);
                }
                Stage::Symmetrize(s) => {
                    let out = s.forward(&image)?;
                    image = out.image;
                    trace.clamped.push(Some(out.clamped));
                }
            }
        }
        Ok(Rendered { image, trace })
    }

    /// Gradient with respect to the canvas, given the gradient of the rendered image.
    pub fn backward(
        &self,
        trace: &RenderTrace,
        grad: &ImageTensor,
    ) -> SymmetraResult<ImageTensor> {
        if trace.clamped.len() != self.stages.len() {
            return Err(SymmetraError::evaluation(
                "render trace does not belong to these stages",
            ));
        }
        let mut grad = grad.clone();
        for (stage, clamped) in self.stages.iter().zip(&trace.clamped).rev() {
            grad = match (stage, clamped) {
                (Stage::Transform(t), None) => t.backward(&grad)?,
                (Stage::Symmetrize(s), Some(c)) => s.backward(c, &grad)?,
                _ => {
                    return Err(SymmetraError::evaluation(
                        "render trace does not belong to these stages",
                    ));
                }
            };
        }
        Ok(grad)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/pipeline.rs"]
mod tests;
