//! Filter operations
//!
//! This module provides edge-preserving filter operations for sample grids.

/// Bilateral filter operations
mod bilateral;
pub use bilateral::*;
