/// An error type for the grid module.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum GridError {
    /// Error when the data length does not match the grid extents.
    #[error("Data length ({0}) does not match the grid size ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when a grid axis has zero extent.
    #[error("Grid extent along axis {0} must be > 0")]
    ZeroExtent(usize),
}
