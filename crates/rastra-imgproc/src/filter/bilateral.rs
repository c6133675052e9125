use rastra_grid::{Grid, GridError, GridView};

use crate::error::ImgprocError;
use crate::launch::{self, LaunchDims};

/// Trait for sample types the bilateral kernels operate on.
///
/// Weight and accumulation arithmetic always runs in f32; the element type
/// is widened per sample and the result narrowed back only on the final
/// write, so integer grids never truncate the running sums.
pub trait GridDtype: Copy + Send + Sync + PartialOrd {
    /// Widen to f32 for kernel arithmetic.
    fn to_f32(self) -> f32;
    /// Narrow an f32 kernel result back to the element type.
    fn from_f32(val: f32) -> Self;
}

impl GridDtype for f32 {
    fn to_f32(self) -> f32 {
        self
    }

    fn from_f32(val: f32) -> Self {
        val
    }
}

impl GridDtype for f64 {
    fn to_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(val: f32) -> Self {
        val as f64
    }
}

impl GridDtype for u8 {
    fn to_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(val: f32) -> Self {
        val.round().clamp(0.0, 255.0) as u8
    }
}

impl GridDtype for u16 {
    fn to_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(val: f32) -> Self {
        val.round().clamp(0.0, 65535.0) as u16
    }
}

/// Compute the bilaterally filtered value for one output coordinate.
///
/// `(x, y)` must lie inside the view. Neighbors are fetched with
/// clamped-range addressing, so samples past an edge replicate the nearest
/// edge sample.
fn bilateral_pixel<T: GridDtype>(
    src: &GridView<'_, T>,
    x: usize,
    y: usize,
    gs: f32,
    gr: f32,
    radius: usize,
) -> T {
    let p = src.get_clamped(x as isize, y as isize).to_f32();
    let radius = radius as isize;

    let mut sum = 0.0f32;
    let mut sumw = 0.0f32;

    for r in -radius..=radius {
        for c in -radius..=radius {
            let q = src.get_clamped(x as isize + c, y as isize + r).to_f32();
            let sd2 = (r * r + c * c) as f32;
            let id = p - q;
            let sw = (-sd2 / (2.0 * gs * gs)).exp();
            let iw = (-(id * id) / (2.0 * gr * gr)).exp();
            let w = sw * iw;
            sumw += w;
            sum += w * q;
        }
    }

    T::from_f32(sum / sumw)
}

/// Compute the threshold-limited bilaterally filtered value for one output
/// coordinate.
///
/// Samples below `minval` are treated as missing data: an excluded center
/// contributes no window at all, and excluded neighbors are skipped. A
/// window with no qualifying sample divides zero by zero, which is the
/// defined degenerate output (NaN), not an error.
fn bilateral_limited_pixel<T: GridDtype>(
    src: &GridView<'_, T>,
    x: usize,
    y: usize,
    gs: f32,
    gr: f32,
    minval: T,
    radius: usize,
) -> T {
    let center = src.get_clamped(x as isize, y as isize);
    let p = center.to_f32();
    let radius = radius as isize;

    let mut sum = 0.0f32;
    let mut sumw = 0.0f32;

    if center >= minval {
        for r in -radius..=radius {
            for c in -radius..=radius {
                let neighbor = src.get_clamped(x as isize + c, y as isize + r);
                if neighbor >= minval {
                    let q = neighbor.to_f32();
                    let sd2 = (r * r + c * c) as f32;
                    let id = p - q;
                    let sw = (-sd2 / (2.0 * gs * gs)).exp();
                    let iw = (-(id * id) / (2.0 * gr * gr)).exp();
                    let w = sw * iw;
                    sumw += w;
                    sum += w * q;
                }
            }
        }
    }

    T::from_f32(sum / sumw)
}

/// Apply a bilateral filter to a sample grid.
///
/// Each output sample is the weighted average of the `(2 * radius + 1)^2`
/// window around it, with weights decaying over spatial distance (`gs`)
/// and over intensity difference (`gr`). Window samples past an edge
/// replicate the nearest edge sample. The computation runs one worker per
/// output sample, grouped into fixed-size blocks, and blocks until the
/// whole worker grid has finished.
///
/// # Arguments
///
/// * `src` - The source grid.
/// * `dst` - The destination grid. Must have the same size as `src`.
/// * `gs` - Standard deviation of the spatial weight.
/// * `gr` - Standard deviation of the intensity weight.
/// * `radius` - Half-extent of the square filter window.
///
/// # Errors
///
/// Fails with a size mismatch before any work is dispatched if `src` and
/// `dst` disagree in shape, or with an execution error if the dispatched
/// computation faults (the contents of `dst` are then unspecified).
///
/// # Examples
///
/// ```
/// use rastra_grid::{Grid, GridSize};
/// use rastra_imgproc::filter::bilateral;
///
/// let src = Grid::<f32>::new(GridSize { width: 5, height: 5 }, vec![1.0; 25]).unwrap();
/// let mut dst = Grid::from_size_val(src.size(), 0.0).unwrap();
///
/// bilateral(&src, &mut dst, 1.0, 1.0, 1).unwrap();
/// assert_eq!(dst.as_slice(), &[1.0; 25]);
/// ```
pub fn bilateral<T>(
    src: &Grid<T>,
    dst: &mut Grid<T>,
    gs: T,
    gr: T,
    radius: usize,
) -> Result<(), ImgprocError>
where
    T: GridDtype,
{
    if src.size() != dst.size() {
        return Err(GridError::InvalidGridSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        )
        .into());
    }

    let dims = LaunchDims::cover(src.size());
    let (gs, gr) = (gs.to_f32(), gr.to_f32());
    let view = src.view();
    let cols = src.width();

    launch::dispatch(&dims, dst.as_slice_mut(), cols, |x, y| {
        bilateral_pixel(&view, x, y, gs, gr, radius)
    })
    .map_err(|status| ImgprocError::execution(status, "error launching the bilateral kernel"))?;

    Ok(())
}

/// Apply a threshold-limited bilateral filter to a sample grid.
///
/// Same windowed weighted average as [`bilateral`], but samples below
/// `minval` are treated as missing data and excluded from the
/// accumulation. An output sample whose center is below `minval`, or whose
/// window holds no qualifying sample, is the result of dividing zero by
/// zero (NaN in the f32 arithmetic domain); this degenerate value is the
/// defined output, not an error.
///
/// # Arguments
///
/// * `src` - The source grid.
/// * `dst` - The destination grid. Must have the same size as `src`.
/// * `gs` - Standard deviation of the spatial weight.
/// * `gr` - Standard deviation of the intensity weight.
/// * `minval` - Inclusive threshold below which samples are excluded.
/// * `radius` - Half-extent of the square filter window.
///
/// # Errors
///
/// Fails with a size mismatch before any work is dispatched if `src` and
/// `dst` disagree in shape, or with an execution error if the dispatched
/// computation faults (the contents of `dst` are then unspecified).
pub fn bilateral_limited<T>(
    src: &Grid<T>,
    dst: &mut Grid<T>,
    gs: T,
    gr: T,
    minval: T,
    radius: usize,
) -> Result<(), ImgprocError>
where
    T: GridDtype,
{
    if src.size() != dst.size() {
        return Err(GridError::InvalidGridSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        )
        .into());
    }

    let dims = LaunchDims::cover(src.size());
    let (gs, gr) = (gs.to_f32(), gr.to_f32());
    let view = src.view();
    let cols = src.width();

    launch::dispatch(&dims, dst.as_slice_mut(), cols, |x, y| {
        bilateral_limited_pixel(&view, x, y, gs, gr, minval, radius)
    })
    .map_err(|status| ImgprocError::execution(status, "error launching the bilateral kernel"))?;

    Ok(())
}
