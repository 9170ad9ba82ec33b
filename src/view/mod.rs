//! Rasterized views: pixel index maps built from coordinate mappings, their caches, and the
//! transform stages that apply them to images.

/// Index map caches and views.
pub mod cache;
/// Pixel index maps.
pub mod index_map;
/// Output masks.
pub mod mask;
/// Gather stages over index maps.
pub mod stage;
