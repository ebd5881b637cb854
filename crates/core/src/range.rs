use serde::{Deserialize, Serialize};

/// A rectangular selection expressed by its two endpoints.
///
/// The anchor stays fixed while shift-extending; the active cell is the
/// current focus, moved by navigation and extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub anchor: (usize, usize),
    pub active: (usize, usize),
}

impl SelectionRange {
    pub fn new(anchor: (usize, usize), active: (usize, usize)) -> Self {
        Self { anchor, active }
    }

    /// Single-cell range: anchor and active coincide.
    pub fn cell(row: usize, col: usize) -> Self {
        Self {
            anchor: (row, col),
            active: (row, col),
        }
    }

    pub fn is_single_cell(&self) -> bool {
        self.anchor == self.active
    }

    pub fn normalized(&self) -> Rect {
        Rect::from_corners(self.anchor, self.active)
    }
}

/// Normalized rectangle; `min <= max` on both axes by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

impl Rect {
    pub fn from_corners(a: (usize, usize), b: (usize, usize)) -> Self {
        Self {
            min_row: a.0.min(b.0),
            max_row: a.0.max(b.0),
            min_col: a.1.min(b.1),
            max_col: a.1.max(b.1),
        }
    }

    pub fn rows(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    pub fn cols(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    pub fn cell_count(&self) -> usize {
        self.rows() * self.cols()
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.min_row && row <= self.max_row && col >= self.min_col && col <= self.max_col
    }

    /// All cells in the rectangle in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.min_row..=self.max_row)
            .flat_map(move |row| (self.min_col..=self.max_col).map(move |col| (row, col)))
    }
}
