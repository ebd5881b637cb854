//! Grid schema: the read-only data contract between a host and the engine.
//!
//! All coordinates are logical indices into the complete, unvirtualized row
//! collection. A rendering layer must translate window-relative pointer/DOM
//! coordinates into logical indices before calling into the engine, never
//! the reverse.

use fabgrid_core::change::{ChangeRecord, RowRecord};
use fabgrid_core::column::{ColumnKind, ColumnSpec};
use fabgrid_core::value::CellValue;

use crate::events::ChangeSink;

/// Read-only view of the hosted row collection.
pub trait GridSchema {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    /// Value at (row, col). Out-of-range reads return `CellValue::Null`.
    fn value(&self, row: usize, col: usize) -> CellValue;

    fn column(&self, col: usize) -> &ColumnSpec;

    /// Prototype record cloned for rows appended during paste auto-extension.
    fn template_row(&self) -> RowRecord;

    fn column_kind(&self, col: usize) -> ColumnKind {
        self.column(col).kind
    }

    /// Emptiness as seen by boundary scans: `Null` or empty text.
    fn is_cell_empty(&self, row: usize, col: usize) -> bool {
        self.value(row, col).is_empty()
    }
}

/// In-memory grid backing store.
///
/// Reference implementation of both `GridSchema` and `ChangeSink`, used by
/// the test suite and by hosts that keep the row collection in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryGrid {
    columns: Vec<ColumnSpec>,
    rows: Vec<RowRecord>,
}

impl MemoryGrid {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build from column specs and rows. Short rows are padded with `Null`,
    /// long rows truncated to the column count.
    pub fn with_rows(columns: Vec<ColumnSpec>, rows: Vec<RowRecord>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn push_row(&mut self, mut row: RowRecord) {
        row.resize(self.columns.len(), CellValue::Null);
        self.rows.push(row);
    }

    /// Set a cell. Out-of-range writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        if col >= self.columns.len() {
            return;
        }
        if let Some(record) = self.rows.get_mut(row) {
            record[col] = value;
        }
    }

    pub fn get(&self, row: usize, col: usize) -> CellValue {
        self.rows
            .get(row)
            .and_then(|record| record.get(col))
            .cloned()
            .unwrap_or(CellValue::Null)
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }
}

impl GridSchema for MemoryGrid {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn value(&self, row: usize, col: usize) -> CellValue {
        self.get(row, col)
    }

    fn column(&self, col: usize) -> &ColumnSpec {
        &self.columns[col]
    }

    fn template_row(&self) -> RowRecord {
        vec![CellValue::Null; self.columns.len()]
    }
}

impl ChangeSink for MemoryGrid {
    fn apply_changes(&mut self, changes: &[ChangeRecord], appended_rows: &[RowRecord]) {
        for row in appended_rows {
            self.push_row(row.clone());
        }
        for change in changes {
            self.set(change.row, change.col, change.new_value.clone());
        }
    }
}
