use crate::foundation::core::ImageTensor;
use crate::foundation::error::SymmetraResult;
use crate::optimize::config::Precision;

/// Loss and its gradient with respect to the rendered image.
#[derive(Clone, Debug)]
pub struct Evaluation {
    /// Scalar objective; lower is better.
    pub loss: f64,
    /// Gradient of `loss`, same shape as the evaluated image.
    pub gradient: ImageTensor,
}

/// The objective the optimizer minimizes.
///
/// Errors returned here abort the optimization and reach the caller unchanged.
pub trait LossProvider {
    /// Evaluate `image` at the requested numeric precision.
    fn evaluate(&mut self, image: &ImageTensor, precision: Precision)
    -> SymmetraResult<Evaluation>;
}

impl<F> LossProvider for F
where
    F: FnMut(&ImageTensor, Precision) -> SymmetraResult<Evaluation>,
{
    fn evaluate(
        &mut self,
        image: &ImageTensor,
        precision: Precision,
    ) -> SymmetraResult<Evaluation> {
        self(image, precision)
    }
}
