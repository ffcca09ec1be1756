#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// grid error types.
pub mod error;

/// dense N-dimensional grid container.
pub mod grid;

pub use crate::error::GridError;
pub use crate::grid::{Grid, GridSize, LabelGrid};
