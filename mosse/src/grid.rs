use std::ops::{Index, IndexMut};

/// Row-major 2D array addressed as `(row, col)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Grid<T> {
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "data length must equal rows * cols"
        );
        Self { data, rows, cols }
    }

    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { data, rows, cols }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &T {
        debug_assert!(row < self.rows && col < self.cols);
        &self.data[row * self.cols + col]
    }

    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        debug_assert!(row < self.rows && col < self.cols);
        &mut self.data[row * self.cols + col]
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            data: self.data.iter().map(f).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Elementwise combination of two grids of identical shape.
    pub fn zip_map<U, V>(&self, other: &Grid<U>, mut f: impl FnMut(&T, &U) -> V) -> Grid<V> {
        assert_eq!(self.shape(), other.shape(), "grid shapes must match");
        Grid {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| f(a, b))
                .collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T: Clone> Grid<T> {
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }
}

impl<T: Clone + Default> Grid<T> {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::default())
    }
}

impl Grid<f64> {
    /// Largest element, or `None` for an empty grid.
    pub fn max(&self) -> Option<f64> {
        self.data.iter().copied().reduce(f64::max)
    }

    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let var = self
            .data
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / self.data.len() as f64;
        var.sqrt()
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        self.get(row, col)
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        self.get_mut(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fn_is_row_major() {
        let grid = Grid::from_fn(2, 3, |r, c| r * 10 + c);
        assert_eq!(grid.data(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(grid[(1, 2)], 12);
        assert_eq!(grid.row(1), &[10, 11, 12]);
        assert_eq!(grid.shape(), (2, 3));
    }

    #[test]
    #[should_panic(expected = "data length must equal rows * cols")]
    fn new_rejects_wrong_length() {
        let _ = Grid::new(2, 2, vec![0.0; 3]);
    }

    #[test]
    fn statistics() {
        let grid = Grid::new(2, 2, vec![1.0, 3.0, 1.0, 3.0]);
        assert_eq!(grid.mean(), 2.0);
        assert_eq!(grid.std_dev(), 1.0);
        assert_eq!(grid.max(), Some(3.0));
        assert_eq!(Grid::<f64>::zeros(0, 0).max(), None);
    }

    #[test]
    fn zip_map_combines_elementwise() {
        let a = Grid::new(1, 3, vec![1, 2, 3]);
        let b = Grid::new(1, 3, vec![10, 20, 30]);
        assert_eq!(a.zip_map(&b, |x, y| x + y).data(), &[11, 22, 33]);
    }

    #[test]
    fn index_mut_writes_in_place() {
        let mut grid = Grid::<i32>::zeros(2, 2);
        grid[(1, 0)] = 7;
        assert_eq!(grid.data(), &[0, 0, 7, 0]);
    }
}
