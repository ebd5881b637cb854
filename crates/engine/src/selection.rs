//! Selection model: the single shared state every other component reads.
//!
//! Owns the anchor/active rectangle plus the materialized cell set. After any
//! plain click or drag the set is exactly the rectangle; only toggle
//! operations can make it non-rectangular. All coordinate inputs are clamped
//! to the grid bounds and out-of-range inputs never panic.

use fabgrid_core::range::{Rect, SelectionRange};

use crate::cell_set::CellSet;

#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    rows: usize,
    cols: usize,
    range: Option<SelectionRange>,
    cells: CellSet,
}

impl SelectionModel {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            range: None,
            cells: CellSet::new(),
        }
    }

    /// Clear the selection and adopt new bounds. Called when the identity or
    /// length of the underlying row collection changes (reload, filter, page
    /// change); stale selections over replaced data are never retained.
    pub fn reset(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        self.range = None;
        self.cells.clear();
    }

    /// Adopt new bounds while keeping the selection, clamped. Used when the
    /// same collection grows in place (paste row auto-extension).
    pub fn resize(&mut self, rows: usize, cols: usize) {
        if rows == 0 || cols == 0 {
            self.reset(rows, cols);
            return;
        }
        let was_rectangular = self.range.is_some_and(|range| {
            let rect = range.normalized();
            self.cells.len() == rect.cell_count()
                && rect.cells().all(|(r, c)| self.cells.contains(r, c))
        });
        self.rows = rows;
        self.cols = cols;
        if let Some(range) = self.range {
            let anchor = (range.anchor.0.min(rows - 1), range.anchor.1.min(cols - 1));
            let active = (range.active.0.min(rows - 1), range.active.1.min(cols - 1));
            let clamped = SelectionRange::new(anchor, active);
            self.range = Some(clamped);
            if was_rectangular {
                self.cells.rebuild_from_rect(&clamped.normalized());
                return;
            }
        }
        let stale: Vec<_> = self
            .cells
            .iter()
            .filter(|&(r, c)| r >= rows || c >= cols)
            .collect();
        for (r, c) in stale {
            self.cells.remove(r, c);
        }
    }

    fn clamp(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        if self.rows == 0 || self.cols == 0 {
            return None;
        }
        Some((row.min(self.rows - 1), col.min(self.cols - 1)))
    }

    /// Plain click: selection becomes the single cell; anchor = active.
    pub fn start_selection(&mut self, row: usize, col: usize) {
        let Some((row, col)) = self.clamp(row, col) else {
            return;
        };
        let range = SelectionRange::cell(row, col);
        self.cells.rebuild_from_rect(&range.normalized());
        self.range = Some(range);
    }

    /// Shift-click or drag-move: rectangle spanning the stored anchor and the
    /// target; anchor unchanged, active moves. Starts a fresh selection when
    /// no anchor exists yet.
    pub fn extend_selection(&mut self, row: usize, col: usize) {
        let Some((row, col)) = self.clamp(row, col) else {
            return;
        };
        let anchor = match self.range {
            Some(range) => range.anchor,
            None => (row, col),
        };
        let range = SelectionRange::new(anchor, (row, col));
        self.cells.rebuild_from_rect(&range.normalized());
        self.range = Some(range);
    }

    /// Ctrl/Cmd-click: remove the cell if selected, add it otherwise.
    /// Neither anchor nor active moves.
    pub fn toggle_cell(&mut self, row: usize, col: usize) {
        let Some((row, col)) = self.clamp(row, col) else {
            return;
        };
        if self.cells.contains(row, col) {
            self.cells.remove(row, col);
        } else {
            self.cells.insert(row, col);
        }
    }

    /// Select every cell of the row; endpoints span the full row.
    pub fn select_row(&mut self, row: usize) {
        let Some((row, _)) = self.clamp(row, 0) else {
            return;
        };
        let range = SelectionRange::new((row, 0), (row, self.cols - 1));
        self.cells.rebuild_from_rect(&range.normalized());
        self.range = Some(range);
    }

    /// Select every cell of the column; endpoints span the full column.
    pub fn select_column(&mut self, col: usize) {
        let Some((_, col)) = self.clamp(0, col) else {
            return;
        };
        let range = SelectionRange::new((0, col), (self.rows - 1, col));
        self.cells.rebuild_from_rect(&range.normalized());
        self.range = Some(range);
    }

    pub fn select_all(&mut self) {
        if self.rows == 0 || self.cols == 0 {
            return;
        }
        let range = SelectionRange::new((0, 0), (self.rows - 1, self.cols - 1));
        self.cells.rebuild_from_rect(&range.normalized());
        self.range = Some(range);
    }

    pub fn clear(&mut self) {
        self.range = None;
        self.cells.clear();
    }

    /// Replace the selection with the given range, clamped to bounds.
    /// Used after paste to cover exactly the pasted rectangle.
    pub fn set_range(&mut self, range: SelectionRange) {
        let Some(anchor) = self.clamp(range.anchor.0, range.anchor.1) else {
            return;
        };
        let Some(active) = self.clamp(range.active.0, range.active.1) else {
            return;
        };
        let range = SelectionRange::new(anchor, active);
        self.cells.rebuild_from_rect(&range.normalized());
        self.range = Some(range);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn range(&self) -> Option<SelectionRange> {
        self.range
    }

    pub fn rect(&self) -> Option<Rect> {
        self.range.map(|r| r.normalized())
    }

    pub fn anchor(&self) -> Option<(usize, usize)> {
        self.range.map(|r| r.anchor)
    }

    pub fn active(&self) -> Option<(usize, usize)> {
        self.range.map(|r| r.active)
    }

    pub fn cells(&self) -> &CellSet {
        &self.cells
    }

    pub fn is_selected(&self, row: usize, col: usize) -> bool {
        self.cells.contains(row, col)
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_none() && self.cells.is_empty()
    }

    /// True if more than one cell is selected.
    pub fn is_multi(&self) -> bool {
        self.cells.len() > 1
    }

    pub fn bounds(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_click_is_single_cell() {
        let mut sel = SelectionModel::new(10, 5);
        sel.start_selection(3, 2);
        assert_eq!(sel.anchor(), Some((3, 2)));
        assert_eq!(sel.active(), Some((3, 2)));
        assert_eq!(sel.cells().len(), 1);
        assert!(sel.is_selected(3, 2));
    }

    #[test]
    fn test_extend_keeps_anchor_and_covers_rectangle() {
        let mut sel = SelectionModel::new(10, 5);
        sel.start_selection(1, 1);
        sel.extend_selection(3, 4);
        assert_eq!(sel.anchor(), Some((1, 1)));
        assert_eq!(sel.active(), Some((3, 4)));
        assert_eq!(sel.cells().len(), 3 * 4);
        assert!(sel.is_selected(2, 2));
        assert!(!sel.is_selected(4, 4));
    }

    #[test]
    fn test_extend_after_extend_replaces_rectangle() {
        let mut sel = SelectionModel::new(10, 10);
        sel.start_selection(5, 5);
        sel.extend_selection(9, 9);
        sel.extend_selection(5, 6);
        // The set is exactly the new rectangle, nothing lingers
        assert_eq!(sel.cells().len(), 2);
        assert!(!sel.is_selected(9, 9));
    }

    #[test]
    fn test_toggle_adds_and_removes_without_moving_anchor() {
        let mut sel = SelectionModel::new(10, 5);
        sel.start_selection(0, 0);
        sel.toggle_cell(4, 4);
        assert!(sel.is_selected(4, 4));
        assert_eq!(sel.anchor(), Some((0, 0)));
        assert_eq!(sel.active(), Some((0, 0)));
        sel.toggle_cell(4, 4);
        assert!(!sel.is_selected(4, 4));
        // Removing a cell inside the rectangle makes the set non-rectangular
        sel.extend_selection(1, 1);
        sel.toggle_cell(0, 0);
        assert_eq!(sel.cells().len(), 3);
    }

    #[test]
    fn test_out_of_range_inputs_clamped() {
        let mut sel = SelectionModel::new(3, 3);
        sel.start_selection(100, 100);
        assert_eq!(sel.active(), Some((2, 2)));
        sel.extend_selection(50, 0);
        assert_eq!(sel.active(), Some((2, 0)));
    }

    #[test]
    fn test_empty_grid_is_noop() {
        let mut sel = SelectionModel::new(0, 4);
        sel.start_selection(0, 0);
        sel.select_all();
        sel.select_row(0);
        sel.toggle_cell(0, 0);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_select_row_and_column_span_fully() {
        let mut sel = SelectionModel::new(4, 6);
        sel.select_row(2);
        assert_eq!(sel.range(), Some(SelectionRange::new((2, 0), (2, 5))));
        assert_eq!(sel.cells().len(), 6);

        sel.select_column(3);
        assert_eq!(sel.range(), Some(SelectionRange::new((0, 3), (3, 3))));
        assert_eq!(sel.cells().len(), 4);
    }

    #[test]
    fn test_select_all_spans_grid() {
        let mut sel = SelectionModel::new(3, 3);
        sel.select_all();
        assert_eq!(sel.cells().len(), 9);
    }

    #[test]
    fn test_reset_clears_selection() {
        let mut sel = SelectionModel::new(5, 5);
        sel.select_all();
        sel.reset(8, 5);
        assert!(sel.is_empty());
        assert_eq!(sel.bounds(), (8, 5));
    }

    #[test]
    fn test_resize_clamps_but_keeps_selection() {
        let mut sel = SelectionModel::new(5, 5);
        sel.start_selection(4, 4);
        sel.resize(3, 5);
        assert_eq!(sel.active(), Some((2, 4)));
        assert!(sel.is_selected(2, 4));
        assert_eq!(sel.cells().len(), 1);
    }
}
