use rastra_grid::GridError;

use crate::launch::DispatchStatus;

/// An error type for grid processing operations.
#[derive(thiserror::Error, Debug)]
pub enum ImgprocError {
    /// A grid precondition failed before any work was dispatched.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// The dispatched computation faulted. The output grid contents are
    /// unspecified after this error.
    #[error("Kernel execution failed ({0}): {1}")]
    Execution(DispatchStatus, String),
}

impl ImgprocError {
    /// Translate a dispatch fault status into a typed execution error.
    pub fn execution(status: DispatchStatus, message: &str) -> Self {
        Self::Execution(status, message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_error_carries_status() {
        let err = ImgprocError::execution(
            DispatchStatus::InvalidBlockDim(0, 16),
            "error launching the kernel",
        );
        let msg = err.to_string();
        assert!(msg.contains("error launching the kernel"));
        assert!(msg.contains("0x16"));
    }

    #[test]
    fn test_grid_error_converts() {
        let err: ImgprocError = GridError::InvalidGridSize(3, 3, 4, 4).into();
        assert!(matches!(
            err,
            ImgprocError::Grid(GridError::InvalidGridSize(3, 3, 4, 4))
        ));
    }
}
