//! Snapshot rendering: layout, colors, and rasterization.

/// Frame type and the rasterization seam.
pub mod backend;
/// Continuous state-to-color mapping.
pub mod colormap;
/// Layer-banded node placement.
pub mod layout;
/// Scene resolution and the frame renderer.
pub mod scene;
/// `resvg` rasterizer.
pub mod svg;

pub(crate) mod surface_pool;
