use rayon::prelude::*;

use rastra_grid::GridSize;

/// Default worker block extent, in workers per axis.
pub const DEFAULT_BLOCK: (usize, usize) = (16, 16);

/// Fault status reported by a kernel dispatch.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchStatus {
    /// The launch geometry was rejected before any worker ran.
    #[error("invalid block dimensions {0}x{1}")]
    InvalidBlockDim(usize, usize),

    /// A worker faulted while the grid was executing.
    #[error("worker fault: {0}")]
    WorkerFault(String),
}

/// Worker-grid geometry for one kernel dispatch.
///
/// `block` is the fixed extent of one worker block and `grid` the number of
/// blocks along each axis. A geometry built with [`LaunchDims::cover`]
/// spans every element of the target grid; blocks past the right and
/// bottom edges are overprovisioned and those workers are skipped at
/// dispatch time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaunchDims {
    /// Workers per block, as (x, y).
    pub block: (usize, usize),
    /// Blocks in the worker grid, as (x, y).
    pub grid: (usize, usize),
}

impl LaunchDims {
    /// Compute a geometry covering every element of a grid of `size`.
    pub fn cover(size: GridSize) -> Self {
        Self {
            block: DEFAULT_BLOCK,
            grid: (
                size.width.div_ceil(DEFAULT_BLOCK.0),
                size.height.div_ceil(DEFAULT_BLOCK.1),
            ),
        }
    }

    /// Whether this geometry spans every element of a grid of `size`.
    pub fn covers(&self, size: GridSize) -> bool {
        self.block.0 * self.grid.0 >= size.width && self.block.1 * self.grid.1 >= size.height
    }
}

/// Shared handle to the output cells of one dispatch.
///
/// Workers write through a raw pointer without synchronization. This is
/// sound only because the block grid partitions the output coordinates:
/// each in-bounds cell is written by exactly one worker.
struct OutputCells<T> {
    ptr: *mut T,
    len: usize,
}

unsafe impl<T: Send> Sync for OutputCells<T> {}

impl<T> OutputCells<T> {
    /// # Safety
    ///
    /// `idx` must be in range and no other worker may write the same index.
    unsafe fn write(&self, idx: usize, value: T) {
        debug_assert!(idx < self.len);
        unsafe { self.ptr.add(idx).write(value) };
    }
}

/// Execute `kernel` once per worker coordinate of the block grid, writing
/// each in-bounds result into `dst`.
///
/// `dst` is interpreted as a row-major grid with `cols` elements per row.
/// Workers whose coordinate falls outside that extent perform no work and
/// write nothing. Blocks run concurrently on the rayon thread pool; the
/// call blocks until the entire worker grid has finished.
///
/// # Errors
///
/// A geometry with a zero block extent is rejected before any worker runs.
/// If a worker faults mid-execution, the fault is reported after the
/// blocking wait and the contents of `dst` are unspecified.
pub fn dispatch<T, F>(
    dims: &LaunchDims,
    dst: &mut [T],
    cols: usize,
    kernel: F,
) -> Result<(), DispatchStatus>
where
    T: Copy + Send,
    F: Fn(usize, usize) -> T + Sync,
{
    if dims.block.0 == 0 || dims.block.1 == 0 {
        return Err(DispatchStatus::InvalidBlockDim(dims.block.0, dims.block.1));
    }

    let rows = if cols == 0 { 0 } else { dst.len() / cols };
    let blocks = dims.grid.0 * dims.grid.1;
    let cells = OutputCells {
        ptr: dst.as_mut_ptr(),
        len: dst.len(),
    };

    let run = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        (0..blocks).into_par_iter().for_each(|b| {
            let (bx, by) = (b % dims.grid.0, b / dims.grid.0);
            for ty in 0..dims.block.1 {
                for tx in 0..dims.block.0 {
                    let (x, y) = (bx * dims.block.0 + tx, by * dims.block.1 + ty);
                    if x < cols && y < rows {
                        let value = kernel(x, y);
                        // SAFETY: (x, y) is in bounds and belongs to exactly
                        // one block, so no other worker writes this index.
                        unsafe { cells.write(y * cols + x, value) };
                    }
                }
            }
        });
    }));

    run.map_err(|payload| DispatchStatus::WorkerFault(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown worker fault".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_cover_exact_multiple() {
        let dims = LaunchDims::cover(GridSize {
            width: 32,
            height: 16,
        });
        assert_eq!(dims.block, (16, 16));
        assert_eq!(dims.grid, (2, 1));
        assert!(dims.covers(GridSize {
            width: 32,
            height: 16
        }));
    }

    #[test]
    fn test_cover_overprovisions() {
        let size = GridSize {
            width: 33,
            height: 17,
        };
        let dims = LaunchDims::cover(size);
        assert_eq!(dims.grid, (3, 2));
        assert!(dims.covers(size));
    }

    #[test]
    fn test_cover_empty() {
        let dims = LaunchDims::cover(GridSize {
            width: 0,
            height: 0,
        });
        assert_eq!(dims.grid, (0, 0));
    }

    #[test]
    fn test_dispatch_writes_every_cell_once() -> Result<(), DispatchStatus> {
        let size = GridSize {
            width: 21,
            height: 7,
        };
        let dims = LaunchDims::cover(size);

        let counts: Vec<AtomicUsize> = (0..size.width * size.height)
            .map(|_| AtomicUsize::new(0))
            .collect();
        let mut dst = vec![0usize; size.width * size.height];

        dispatch(&dims, &mut dst, size.width, |x, y| {
            counts[y * size.width + x].fetch_add(1, Ordering::Relaxed);
            y * size.width + x
        })?;

        for (i, count) in counts.iter().enumerate() {
            assert_eq!(count.load(Ordering::Relaxed), 1, "cell {} write count", i);
            assert_eq!(dst[i], i);
        }

        Ok(())
    }

    #[test]
    fn test_dispatch_empty_grid() -> Result<(), DispatchStatus> {
        let dims = LaunchDims::cover(GridSize {
            width: 0,
            height: 0,
        });
        let mut dst: Vec<f32> = Vec::new();
        dispatch(&dims, &mut dst, 0, |_, _| 1.0)?;
        assert!(dst.is_empty());
        Ok(())
    }

    #[test]
    fn test_dispatch_rejects_zero_block() {
        let dims = LaunchDims {
            block: (0, 16),
            grid: (1, 1),
        };
        let mut dst = vec![0.0f32; 4];
        let res = dispatch(&dims, &mut dst, 2, |_, _| 1.0);
        assert_eq!(res, Err(DispatchStatus::InvalidBlockDim(0, 16)));
    }

    #[test]
    fn test_dispatch_reports_worker_fault() {
        let size = GridSize {
            width: 8,
            height: 8,
        };
        let dims = LaunchDims::cover(size);
        let mut dst = vec![0.0f32; size.width * size.height];

        let res = dispatch(&dims, &mut dst, size.width, |x, y| {
            if (x, y) == (3, 5) {
                panic!("bad cell");
            }
            0.0
        });

        match res {
            Err(DispatchStatus::WorkerFault(msg)) => assert!(msg.contains("bad cell")),
            other => panic!("expected worker fault, got {:?}", other),
        }
    }
}
