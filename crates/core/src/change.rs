use serde::{Deserialize, Serialize};

use crate::value::CellValue;

/// A proposed single-cell mutation.
///
/// Pure data: the engine emits batches of these, the host's change sink is
/// solely responsible for applying them to the backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub row: usize,
    pub col: usize,
    pub old_value: CellValue,
    pub new_value: CellValue,
}

/// One value per column, in column order.
///
/// Rows appended during paste auto-extension are cloned from the schema's
/// template record before paste values land on them.
pub type RowRecord = Vec<CellValue>;
