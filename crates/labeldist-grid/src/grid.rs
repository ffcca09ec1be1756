use crate::error::GridError;

/// Grid extents per axis.
///
/// Axis 0 is the fastest-varying (x) axis, so `extents` reads as
/// `[width, height]` in 2D and `[width, height, depth]` in 3D.
///
/// # Examples
///
/// ```
/// use labeldist_grid::GridSize;
///
/// let size = GridSize::from([10, 20]);
///
/// assert_eq!(size.extents, [10, 20]);
/// assert_eq!(size.numel(), 200);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize<const D: usize> {
    /// Extent of the grid along each axis, in elements.
    pub extents: [usize; D],
}

impl<const D: usize> GridSize<D> {
    /// Total number of elements in the grid.
    pub fn numel(&self) -> usize {
        self.extents.iter().product()
    }

    /// Extent of the grid along the given axis.
    pub fn extent(&self, axis: usize) -> usize {
        self.extents[axis]
    }
}

impl<const D: usize> std::fmt::Display for GridSize<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "GridSize {{ extents: {:?} }}", self.extents)
    }
}

impl<const D: usize> From<[usize; D]> for GridSize<D> {
    fn from(extents: [usize; D]) -> Self {
        GridSize { extents }
    }
}

/// A dense grid of values over a 2D or 3D index space.
///
/// Storage is row-major with axis 0 contiguous; the linear index of
/// `[x, y, z]` is `x + w * (y + h * z)`. Stride-based indexing lets the
/// scan algorithms run unchanged for `D = 2` and `D = 3`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T, const D: usize> {
    size: GridSize<D>,
    strides: [usize; D],
    data: Vec<T>,
}

/// A grid of region labels, where 0 denotes background and any positive
/// value denotes membership in exactly one region.
pub type LabelGrid<const D: usize> = Grid<u32, D>;

impl<T, const D: usize> Grid<T, D> {
    /// Create a new grid from raw element data.
    ///
    /// # Arguments
    ///
    /// * `size` - The extents of the grid.
    /// * `data` - The element data in row-major order.
    ///
    /// # Errors
    ///
    /// Returns an error if any extent is zero or the data length does not
    /// match the extents.
    ///
    /// # Examples
    ///
    /// ```
    /// use labeldist_grid::{Grid, GridSize};
    ///
    /// let grid = Grid::<u32, 2>::new([3, 2].into(), vec![0u32; 6]).unwrap();
    ///
    /// assert_eq!(grid.size().extents, [3, 2]);
    /// assert_eq!(grid.numel(), 6);
    /// ```
    pub fn new(size: GridSize<D>, data: Vec<T>) -> Result<Self, GridError> {
        if let Some(axis) = size.extents.iter().position(|&e| e == 0) {
            return Err(GridError::ZeroExtent(axis));
        }
        if data.len() != size.numel() {
            return Err(GridError::InvalidDataLength(data.len(), size.numel()));
        }

        let mut strides = [1usize; D];
        for axis in 1..D {
            strides[axis] = strides[axis - 1] * size.extents[axis - 1];
        }

        Ok(Self {
            size,
            strides,
            data,
        })
    }

    /// Create a new grid with every element set to `val`.
    pub fn from_size_val(size: GridSize<D>, val: T) -> Result<Self, GridError>
    where
        T: Clone,
    {
        let data = vec![val; size.numel()];
        Grid::new(size, data)
    }

    /// The extents of the grid.
    pub fn size(&self) -> GridSize<D> {
        self.size
    }

    /// Total number of elements in the grid.
    pub fn numel(&self) -> usize {
        self.size.numel()
    }

    /// Extent of the grid along the given axis.
    pub fn extent(&self, axis: usize) -> usize {
        self.size.extents[axis]
    }

    /// The linear stride of each axis, in elements.
    pub fn strides(&self) -> [usize; D] {
        self.strides
    }

    /// The linear index of the given coordinates.
    ///
    /// Coordinates are not bounds-checked; indexing the slice with the
    /// result of out-of-range coordinates may panic or alias another
    /// element.
    pub fn linear_index(&self, coords: [usize; D]) -> usize {
        let mut index = 0;
        for axis in 0..D {
            index += coords[axis] * self.strides[axis];
        }
        index
    }

    /// The coordinates of the given linear index.
    pub fn coords_of(&self, index: usize) -> [usize; D] {
        let mut coords = [0usize; D];
        let mut rest = index;
        for axis in 0..D {
            coords[axis] = rest % self.size.extents[axis];
            rest /= self.size.extents[axis];
        }
        coords
    }

    /// Get a reference to the element at the given coordinates, or `None`
    /// when out of range.
    pub fn get(&self, coords: [usize; D]) -> Option<&T> {
        for axis in 0..D {
            if coords[axis] >= self.size.extents[axis] {
                return None;
            }
        }
        self.data.get(self.linear_index(coords))
    }

    /// Get a mutable reference to the element at the given coordinates, or
    /// `None` when out of range.
    pub fn get_mut(&mut self, coords: [usize; D]) -> Option<&mut T> {
        for axis in 0..D {
            if coords[axis] >= self.size.extents[axis] {
                return None;
            }
        }
        let index = self.linear_index(coords);
        self.data.get_mut(index)
    }

    /// The linear index of `coords + delta`, or `None` when the displaced
    /// coordinates fall outside the grid.
    pub fn offset_index(&self, coords: [usize; D], delta: [isize; D]) -> Option<usize> {
        let mut index = 0;
        for axis in 0..D {
            let c = coords[axis] as isize + delta[axis];
            if c < 0 || c as usize >= self.size.extents[axis] {
                return None;
            }
            index += c as usize * self.strides[axis];
        }
        Some(index)
    }

    /// The element data as a slice, row-major with axis 0 contiguous.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The element data as a mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the grid and return the underlying data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_2d() -> Result<(), GridError> {
        let grid = Grid::<u32, 2>::new([4, 3].into(), (0..12).collect())?;
        assert_eq!(grid.numel(), 12);
        assert_eq!(grid.strides(), [1, 4]);
        assert_eq!(grid.get([2, 1]), Some(&6));
        assert_eq!(grid.get([4, 0]), None);
        Ok(())
    }

    #[test]
    fn new_grid_3d() -> Result<(), GridError> {
        let grid = Grid::<u32, 3>::new([3, 2, 2].into(), (0..12).collect())?;
        assert_eq!(grid.strides(), [1, 3, 6]);
        assert_eq!(grid.get([1, 1, 1]), Some(&10));
        assert_eq!(grid.coords_of(10), [1, 1, 1]);
        Ok(())
    }

    #[test]
    fn new_grid_invalid_length() {
        let res = Grid::<u32, 2>::new([4, 3].into(), vec![0; 11]);
        assert_eq!(res, Err(GridError::InvalidDataLength(11, 12)));
    }

    #[test]
    fn new_grid_zero_extent() {
        let res = Grid::<u32, 2>::new([4, 0].into(), vec![]);
        assert_eq!(res, Err(GridError::ZeroExtent(1)));
    }

    #[test]
    fn offset_index_bounds() -> Result<(), GridError> {
        let grid = Grid::<u32, 2>::new([4, 3].into(), vec![0; 12])?;
        assert_eq!(grid.offset_index([0, 0], [-1, 0]), None);
        assert_eq!(grid.offset_index([3, 2], [1, 0]), None);
        assert_eq!(grid.offset_index([1, 1], [1, -1]), Some(2));
        Ok(())
    }

    #[test]
    fn from_size_val() -> Result<(), GridError> {
        let grid = Grid::<f64, 3>::from_size_val([2, 2, 2].into(), 1.5)?;
        assert!(grid.as_slice().iter().all(|&v| v == 1.5));
        Ok(())
    }
}
