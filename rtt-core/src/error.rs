/// Errors raised while building or querying primitive geometry
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Sphere tessellation needs a positive even band count
    #[error("sphere density must be a positive even integer, got {0}")]
    InvalidDensity(u32),

    #[error("rectangle dimensions must be finite and positive, got {width} x {height} x {depth}")]
    InvalidDimensions { width: f32, height: f32, depth: f32 },

    #[error("wall corner ({i}, {j}) is out of range, both indices must be 0 or 1")]
    CornerOutOfRange { i: usize, j: usize },
}
