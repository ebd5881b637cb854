pub mod change;
pub mod column;
pub mod range;
pub mod value;

pub use change::{ChangeRecord, RowRecord};
pub use column::{CellRenderer, ColumnKind, ColumnSpec};
pub use range::{Rect, SelectionRange};
pub use value::CellValue;
