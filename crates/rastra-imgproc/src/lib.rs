#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// error types for grid processing operations.
pub mod error;

/// grid filtering module.
pub mod filter;

/// kernel launch geometry and dispatch utilities.
pub mod launch;

pub use crate::error::ImgprocError;
