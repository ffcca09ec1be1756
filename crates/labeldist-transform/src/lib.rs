#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// weighted chamfer distance propagation module.
pub mod chamfer;

/// distance value domains (integer sentinel / float infinity).
pub mod distance;

/// error types for the transform operations.
pub mod error;

/// exact separable Euclidean distance transform module.
pub mod euclidean;

/// label-constrained dilation module.
pub mod label_dilation;

/// chamfer mask catalog and offset partitioning.
pub mod mask;

/// observational progress reporting.
pub mod progress;

pub use crate::error::TransformError;
