use std::collections::HashMap;

/// Sparse 2D grid keyed by signed integer coordinates.
///
/// Only written cells occupy memory. Storage is nested by column then row,
/// so lookups stay O(1) regardless of how spread out the level is.
/// Iteration order is unspecified.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    grid: HashMap<i32, HashMap<i32, T>>,
    len: usize,
}

impl<T> Matrix<T> {
    pub fn new() -> Self {
        Self {
            grid: HashMap::new(),
            len: 0,
        }
    }

    /// Get the value at (x, y). Unset cells are `None`.
    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.grid.get(&x).and_then(|col| col.get(&y))
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        self.grid.get_mut(&x).and_then(|col| col.get_mut(&y))
    }

    /// Store a value at (x, y), returning whatever was there before.
    pub fn set(&mut self, x: i32, y: i32, value: T) -> Option<T> {
        let previous = self.grid.entry(x).or_default().insert(y, value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Remove the value at (x, y). Empty columns are dropped.
    pub fn remove(&mut self, x: i32, y: i32) -> Option<T> {
        let col = self.grid.get_mut(&x)?;
        let removed = col.remove(&y)?;
        if col.is_empty() {
            self.grid.remove(&x);
        }
        self.len -= 1;
        Some(removed)
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.len = 0;
    }

    /// Iterate over every occupied cell as `(x, y, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, &T)> {
        self.grid
            .iter()
            .flat_map(|(&x, col)| col.iter().map(move |(&y, value)| (x, y, value)))
    }
}

impl<T> Default for Matrix<T> {
    fn default() -> Self {
        Self::new()
    }
}
