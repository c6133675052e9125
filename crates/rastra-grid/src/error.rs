/// An error type for the grid module.
#[derive(thiserror::Error, Debug)]
pub enum GridError {
    /// Error when the data length does not match the grid extent.
    #[error("Data length ({0}) does not match the grid size ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when two grids that must agree in shape do not.
    #[error("Grid sizes do not match: expected {0}x{1}, got {2}x{3}")]
    InvalidGridSize(usize, usize, usize, usize),

    /// Error when a value cannot be represented in the requested type.
    #[error("Failed to cast value to {0}")]
    CastError(String),
}
