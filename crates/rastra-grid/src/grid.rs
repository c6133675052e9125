use crate::coords::clamp_to_range;
use crate::error::GridError;

/// Grid size in samples
///
/// A struct to represent the size of a sample grid.
///
/// # Examples
///
/// ```
/// use rastra_grid::GridSize;
///
/// let grid_size = GridSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(grid_size.width, 10);
/// assert_eq!(grid_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    /// Width of the grid in samples
    pub width: usize,
    /// Height of the grid in samples
    pub height: usize,
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "GridSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for GridSize {
    fn from(size: [usize; 2]) -> Self {
        GridSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Represents a dense 2D grid of samples.
///
/// The grid is stored row-major, with shape (H, W). The element type is kept
/// generic so the same storage serves float sample fields as well as
/// quantized ones.
#[derive(Clone)]
pub struct Grid<T> {
    size: GridSize,
    data: Vec<T>,
}

impl<T> Grid<T> {
    /// Create a new grid from sample data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the grid in samples.
    /// * `data` - The sample data in row-major order.
    ///
    /// # Errors
    ///
    /// If the length of the data does not match the grid size, an error is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use rastra_grid::{Grid, GridSize};
    ///
    /// let grid = Grid::<f32>::new(
    ///     GridSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0.0f32; 10 * 20],
    /// ).unwrap();
    ///
    /// assert_eq!(grid.size().width, 10);
    /// assert_eq!(grid.size().height, 20);
    /// ```
    pub fn new(size: GridSize, data: Vec<T>) -> Result<Self, GridError> {
        if data.len() != size.width * size.height {
            return Err(GridError::InvalidDataLength(
                data.len(),
                size.width * size.height,
            ));
        }

        Ok(Self { size, data })
    }

    /// Create a new grid with the given size, filled with a default value.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the grid in samples.
    /// * `val` - The value to fill the grid with.
    pub fn from_size_val(size: GridSize, val: T) -> Result<Self, GridError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height];
        Grid::new(size, data)
    }

    /// The size of the grid in samples.
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// The width of the grid in samples.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// The height of the grid in samples.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// The sample data as a row-major slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The sample data as a mutable row-major slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get a reference to the sample at `(x, y)`, or `None` if the
    /// coordinate is out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.data.get(y * self.size.width + x)
    }

    /// Get a mutable reference to the sample at `(x, y)`, or `None` if the
    /// coordinate is out of bounds.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.data.get_mut(y * self.size.width + x)
    }

    /// A non-owning read view over the grid.
    pub fn view(&self) -> GridView<'_, T> {
        GridView {
            size: self.size,
            data: &self.data,
        }
    }

    /// Cast the sample data of the grid to a different type.
    ///
    /// # Errors
    ///
    /// Returns an error if any value cannot be represented in the target
    /// type.
    pub fn cast<U>(&self) -> Result<Grid<U>, GridError>
    where
        T: Copy + num_traits::NumCast,
        U: num_traits::NumCast,
    {
        let casted_data = self
            .data
            .iter()
            .map(|&x| {
                U::from(x).ok_or_else(|| {
                    GridError::CastError(std::any::type_name::<U>().to_string())
                })
            })
            .collect::<Result<Vec<U>, GridError>>()?;

        Grid::new(self.size, casted_data)
    }
}

/// A non-owning read view over a [`Grid`].
///
/// This is the form the filtering kernels consume: the view exposes the
/// grid extent, bounds-checked indexing, and clamped-range indexing where
/// out-of-range coordinates resolve to the nearest edge sample.
#[derive(Clone, Copy)]
pub struct GridView<'a, T> {
    size: GridSize,
    data: &'a [T],
}

impl<'a, T> GridView<'a, T> {
    /// The size of the viewed grid in samples.
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// The width of the viewed grid in samples.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// The height of the viewed grid in samples.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get a reference to the sample at `(x, y)`, or `None` if the
    /// coordinate is out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.data.get(y * self.size.width + x)
    }

    /// Get the sample at `(x, y)` with clamped-range addressing.
    ///
    /// Out-of-range coordinates resolve to the nearest in-range coordinate
    /// (replicate-border), so the call never faults on a non-empty grid.
    pub fn get_clamped(&self, x: isize, y: isize) -> T
    where
        T: Copy,
    {
        let cx = clamp_to_range(x, self.size.width);
        let cy = clamp_to_range(y, self.size.height);
        self.data[cy * self.size.width + cx]
    }
}
