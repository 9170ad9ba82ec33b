//! Composite render stages built on top of views: symmetrizing averages, kaleidoscopes, and
//! the ordered pipeline the optimizer renders through.

/// Ordered render stages.
pub mod pipeline;
/// Branch averaging and kaleidoscopes.
pub mod symmetrize;
