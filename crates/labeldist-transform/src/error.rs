use labeldist_grid::GridError;

/// An error type for the transform operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TransformError {
    /// Error when the extents of two grids do not match.
    #[error("Grid extents do not match: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        /// Extents of the primary grid.
        expected: Vec<usize>,
        /// Extents of the companion input.
        found: Vec<usize>,
    },

    /// Error when a chamfer mask carries a non-positive weight.
    #[error("Chamfer mask weights must be > 0")]
    InvalidWeight,

    /// Error when a chamfer mask has no offsets.
    #[error("Chamfer mask must contain at least one offset")]
    EmptyMask,

    /// Error when a per-class weight list has an unsupported length.
    #[error("Chamfer weight count must be 1 to 3, got {0}")]
    InvalidWeightCount(usize),

    /// Error when a spacing is not positive and finite.
    #[error("Spacing along axis {0} must be positive and finite, got {1}")]
    InvalidSpacing(usize, f64),

    /// Error coming from the grid crate.
    #[error(transparent)]
    Grid(#[from] GridError),
}
