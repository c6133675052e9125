#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// pure coordinate remapping utilities.
pub mod coords;

/// error types for the grid module.
pub mod error;

/// dense 2D sample grid representation.
pub mod grid;

pub use crate::error::GridError;
pub use crate::grid::{Grid, GridSize, GridView};
