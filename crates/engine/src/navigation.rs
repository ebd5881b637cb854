//! Keyboard navigation over the selection model.
//!
//! Contains:
//! - Cell movement (arrow keys, page up/down)
//! - Jump navigation (Ctrl+Arrow)
//! - Selection extension (Shift+Arrow, Shift+Ctrl+Arrow)
//! - Home/End, Tab/Enter stepping, Escape
//!
//! Every move is synchronous, clamps to grid bounds, and terminates within
//! one scan of the grid dimension.

use crate::schema::GridSchema;
use crate::selection::SelectionModel;

/// Rows moved per PageUp/PageDown when the host does not configure one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Key identity, independent of modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    Enter,
    Escape,
}

/// Modifier state for a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
    };

    pub fn shift() -> Self {
        Modifiers {
            shift: true,
            ctrl: false,
        }
    }

    pub fn ctrl() -> Self {
        Modifiers {
            shift: false,
            ctrl: true,
        }
    }

    pub fn ctrl_shift() -> Self {
        Modifiers {
            shift: true,
            ctrl: true,
        }
    }
}

/// Translates key events into selection model moves.
#[derive(Debug, Clone)]
pub struct Navigator {
    page_size: usize,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Navigator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    /// Dispatch one key event. Returns true if the event was handled.
    pub fn handle(
        &self,
        key: NavKey,
        mods: Modifiers,
        selection: &mut SelectionModel,
        schema: &dyn GridSchema,
    ) -> bool {
        if schema.row_count() == 0 || schema.column_count() == 0 {
            return false;
        }

        // No active cell yet: the first navigation event establishes one
        if selection.active().is_none() {
            if key != NavKey::Escape {
                selection.start_selection(0, 0);
            }
            return true;
        }

        match key {
            NavKey::ArrowUp => self.arrow(selection, schema, mods, -1, 0),
            NavKey::ArrowDown => self.arrow(selection, schema, mods, 1, 0),
            NavKey::ArrowLeft => self.arrow(selection, schema, mods, 0, -1),
            NavKey::ArrowRight => self.arrow(selection, schema, mods, 0, 1),
            NavKey::Home => {
                let target = if mods.ctrl {
                    (0, 0)
                } else {
                    (self.active_cell(selection).0, 0)
                };
                self.go(selection, target, mods.shift);
            }
            NavKey::End => {
                let last_row = schema.row_count() - 1;
                let last_col = schema.column_count() - 1;
                let target = if mods.ctrl {
                    (last_row, last_col)
                } else {
                    (self.active_cell(selection).0, last_col)
                };
                self.go(selection, target, mods.shift);
            }
            NavKey::PageUp => self.step(selection, -(self.page_size as i64), 0, mods.shift),
            NavKey::PageDown => self.step(selection, self.page_size as i64, 0, mods.shift),
            // Tab and Enter always collapse to a single cell, never extend
            NavKey::Tab => {
                let dc = if mods.shift { -1 } else { 1 };
                self.step(selection, 0, dc, false);
            }
            NavKey::Enter => {
                let dr = if mods.shift { -1 } else { 1 };
                self.step(selection, dr, 0, false);
            }
            NavKey::Escape => selection.clear(),
        }
        true
    }

    fn arrow(
        &self,
        selection: &mut SelectionModel,
        schema: &dyn GridSchema,
        mods: Modifiers,
        dr: i64,
        dc: i64,
    ) {
        if mods.ctrl {
            // Jump scans start from the moving end of the selection
            let start = self.active_cell(selection);
            let target = find_data_boundary(schema, start, dr as i32, dc as i32);
            self.go(selection, target, mods.shift);
        } else {
            self.step(selection, dr, dc, mods.shift);
        }
    }

    /// Move or extend by a fixed delta from the active cell, clamped.
    fn step(&self, selection: &mut SelectionModel, dr: i64, dc: i64, extend: bool) {
        let (row, col) = self.active_cell(selection);
        let target = (
            (row as i64 + dr).max(0) as usize,
            (col as i64 + dc).max(0) as usize,
        );
        self.go(selection, target, extend);
    }

    fn go(&self, selection: &mut SelectionModel, target: (usize, usize), extend: bool) {
        if extend {
            selection.extend_selection(target.0, target.1);
        } else {
            selection.start_selection(target.0, target.1);
        }
    }

    /// The cell navigation is relative to: the active cell, or the origin
    /// when nothing is selected yet.
    fn active_cell(&self, selection: &SelectionModel) -> (usize, usize) {
        selection.active().unwrap_or((0, 0))
    }
}

/// Find the data boundary in a direction (Ctrl+Arrow and Ctrl+Shift+Arrow).
///
/// If the immediately adjacent cell is empty, scans through empty space and
/// stops at the first non-empty cell or the edge. If it is non-empty, scans
/// through the contiguous run and stops at the last non-empty cell before the
/// next empty one, or at the edge.
pub fn find_data_boundary(
    schema: &dyn GridSchema,
    start: (usize, usize),
    dr: i32,
    dc: i32,
) -> (usize, usize) {
    let rows = schema.row_count();
    let cols = schema.column_count();
    if rows == 0 || cols == 0 {
        return start;
    }

    let clamp = |r: i32, c: i32| -> (usize, usize) {
        (
            r.max(0).min(rows as i32 - 1) as usize,
            c.max(0).min(cols as i32 - 1) as usize,
        )
    };

    let (mut row, mut col) = clamp(start.0 as i32, start.1 as i32);
    let current_empty = schema.is_cell_empty(row, col);

    // Check what the next cell contains
    let (peek_row, peek_col) = clamp(row as i32 + dr, col as i32 + dc);
    let next_empty = if peek_row == row && peek_col == col {
        true // At edge
    } else {
        schema.is_cell_empty(peek_row, peek_col)
    };

    // Determine search mode: looking for non-empty or looking for empty
    let looking_for_nonempty = current_empty || next_empty;

    loop {
        let (next_row, next_col) = clamp(row as i32 + dr, col as i32 + dc);

        // Stop if we hit the edge
        if next_row == row && next_col == col {
            break;
        }

        let cell_empty = schema.is_cell_empty(next_row, next_col);

        if looking_for_nonempty {
            // Scanning through empty space: stop at first non-empty or edge
            row = next_row;
            col = next_col;
            if !cell_empty {
                break;
            }
        } else {
            // Scanning through data: stop at last non-empty before empty
            if cell_empty {
                break;
            }
            row = next_row;
            col = next_col;
        }
    }

    (row, col)
}
