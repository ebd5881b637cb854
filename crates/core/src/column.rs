use serde::{Deserialize, Serialize};

/// Declared value type of a column, fixed for the lifetime of a grid view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    Text,
    Number,
    Boolean,
    Date,
}

/// How a column's cells are presented and edited.
///
/// Decided once at schema-definition time. Never inferred from accessor names
/// or rendered cell content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum CellRenderer {
    #[default]
    Text,
    Checkbox,
    Dropdown { options: Vec<String> },
    Html,
    /// Value is displayed obscured (credentials, WWN secrets).
    Masked,
}

/// Column descriptor. Immutable for the lifetime of a grid view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Stable identifier, e.g. the backing field name ("alias", "wwn", "zone_count").
    pub id: String,
    pub kind: ColumnKind,
    /// Whether paste/fill may propose changes to this column.
    pub mutable: bool,
    #[serde(default)]
    pub renderer: CellRenderer,
}

impl ColumnSpec {
    pub fn new(id: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            id: id.into(),
            kind,
            mutable: true,
            renderer: CellRenderer::default(),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.mutable = false;
        self
    }

    pub fn with_renderer(mut self, renderer: CellRenderer) -> Self {
        self.renderer = renderer;
        self
    }
}
