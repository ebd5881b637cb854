//! Clipboard codec and backends.
//!
//! This module contains:
//! - Serialization of a selection to the tab/newline wire format (+ HTML)
//! - Paste parsing, per-column type coercion, and row auto-extension
//! - The `ClipboardBackend` seam and its memory/system implementations
//! - Two-phase paste with data-epoch staleness checks
//!
//! The wire format must stay bit-exact for interop with external spreadsheet
//! applications: cells joined with `\t`, rows with `\n`, booleans rendered
//! `TRUE`/`FALSE`, nulls as empty strings. Input parsing tolerates `\r\n`.

use std::fmt;

use fabgrid_core::change::{ChangeRecord, RowRecord};
use fabgrid_core::column::ColumnKind;
use fabgrid_core::range::Rect;
use fabgrid_core::value::{parse_date, CellValue};

use crate::schema::GridSchema;

// =============================================================================
// Backend seam
// =============================================================================

#[derive(Debug)]
pub enum ClipboardError {
    /// The platform clipboard could not be opened at all.
    Unavailable(String),
    Read(String),
    Write(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "clipboard unavailable: {msg}"),
            Self::Read(msg) => write!(f, "clipboard read failed: {msg}"),
            Self::Write(msg) => write!(f, "clipboard write failed: {msg}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Both renditions written on copy. `html` may be empty when the host
/// disables the richer representation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub text: String,
    pub html: String,
}

/// Access to a clipboard. Implemented by the bundled arboard-backed system
/// clipboard, the in-memory test double, and host bridges (e.g. a browser
/// shell forwarding the async clipboard API).
pub trait ClipboardBackend {
    fn write(&mut self, payload: &ClipboardPayload) -> Result<(), ClipboardError>;
    fn read_text(&mut self) -> Result<String, ClipboardError>;
}

/// In-memory clipboard; the legacy fallback target and the test double.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<ClipboardPayload>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&ClipboardPayload> {
        self.contents.as_ref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.contents = Some(ClipboardPayload {
            text: text.into(),
            html: String::new(),
        });
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn write(&mut self, payload: &ClipboardPayload) -> Result<(), ClipboardError> {
        self.contents = Some(payload.clone());
        Ok(())
    }

    fn read_text(&mut self) -> Result<String, ClipboardError> {
        match &self.contents {
            Some(payload) => Ok(payload.text.clone()),
            None => Ok(String::new()),
        }
    }
}

/// Platform clipboard via arboard.
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let inner =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self { inner })
    }
}

#[cfg(feature = "system-clipboard")]
impl ClipboardBackend for SystemClipboard {
    fn write(&mut self, payload: &ClipboardPayload) -> Result<(), ClipboardError> {
        if payload.html.is_empty() {
            self.inner
                .set_text(payload.text.clone())
                .map_err(|e| ClipboardError::Write(e.to_string()))
        } else {
            self.inner
                .set_html(payload.html.as_str(), Some(payload.text.as_str()))
                .map_err(|e| ClipboardError::Write(e.to_string()))
        }
    }

    fn read_text(&mut self) -> Result<String, ClipboardError> {
        self.inner
            .get_text()
            .map_err(|e| ClipboardError::Read(e.to_string()))
    }
}

// =============================================================================
// Serialize (copy)
// =============================================================================

/// Build both clipboard renditions of a rectangular selection, row-major.
pub fn serialize_selection(schema: &dyn GridSchema, rect: &Rect) -> ClipboardPayload {
    let mut text = String::new();
    let mut html = String::from("<table><tbody>");

    for row in rect.min_row..=rect.max_row {
        if row > rect.min_row {
            text.push('\n');
        }
        html.push_str("<tr>");
        for col in rect.min_col..=rect.max_col {
            if col > rect.min_col {
                text.push('\t');
            }
            let cell = schema.value(row, col).to_clipboard_string();
            html.push_str("<td>");
            html.push_str(&html_escape(&cell));
            html.push_str("</td>");
            text.push_str(&cell);
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");

    ClipboardPayload { text, html }
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// Deserialize (paste)
// =============================================================================

/// Split clipboard text into the transient paste matrix.
/// Lines split on `\n` (tolerating `\r\n` and bare `\r`), cells on `\t`.
pub fn parse_matrix(text: &str) -> Vec<Vec<String>> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    if normalized.trim().is_empty() {
        return Vec::new();
    }
    normalized
        .lines()
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}

/// Coerce one raw pasted string per the destination column's declared type.
/// Coercion failure yields `Null`, never an error.
pub fn coerce(raw: &str, kind: ColumnKind) -> CellValue {
    match kind {
        // Empty text survives as empty text, not null
        ColumnKind::Text => CellValue::Text(raw.to_string()),
        ColumnKind::Boolean => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return CellValue::Null;
            }
            let truthy = trimmed.eq_ignore_ascii_case("true")
                || trimmed.eq_ignore_ascii_case("yes")
                || trimmed == "1";
            CellValue::Bool(truthy)
        }
        ColumnKind::Number => match raw.trim().parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::Null,
        },
        ColumnKind::Date => match parse_date(raw) {
            Some(d) => CellValue::Date(d),
            None => CellValue::Null,
        },
    }
}

/// Result of a paste computation: a pure proposal, applied by the host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PasteOutcome {
    pub changes: Vec<ChangeRecord>,
    /// Template-cloned rows to append before applying `changes`.
    pub appended_rows: Vec<RowRecord>,
    /// The pasted rectangle, clamped to the column count; the selection is
    /// updated to cover exactly this.
    pub pasted: Option<Rect>,
}

impl PasteOutcome {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.appended_rows.is_empty()
    }
}

/// Compute the change batch for pasting `matrix` anchored at `anchor`.
///
/// Columns beyond the schema are dropped; rows beyond the schema trigger row
/// auto-extension so the final row count is `max(rows, anchor_row + matrix
/// rows)`. Immutable columns and unchanged cells produce no records.
pub fn build_paste(
    schema: &dyn GridSchema,
    anchor: (usize, usize),
    matrix: &[Vec<String>],
) -> PasteOutcome {
    let rows = schema.row_count();
    let cols = schema.column_count();
    if matrix.is_empty() || cols == 0 {
        return PasteOutcome::empty();
    }

    let (r0, c0) = anchor;
    if c0 >= cols {
        return PasteOutcome::empty();
    }

    let needed_rows = r0 + matrix.len();
    let appended_count = needed_rows.saturating_sub(rows);
    let template = schema.template_row();
    let appended_rows: Vec<RowRecord> = (0..appended_count).map(|_| template.clone()).collect();

    let mut changes = Vec::new();
    for (row_offset, line) in matrix.iter().enumerate() {
        let row = r0 + row_offset;
        for (col_offset, raw) in line.iter().enumerate() {
            let col = c0 + col_offset;
            if col >= cols {
                // Never create new columns
                continue;
            }
            let spec = schema.column(col);
            if !spec.mutable {
                continue;
            }
            let new_value = coerce(raw, spec.kind);
            let old_value = if row < rows {
                schema.value(row, col)
            } else {
                template.get(col).cloned().unwrap_or(CellValue::Null)
            };
            if new_value != old_value {
                changes.push(ChangeRecord {
                    row,
                    col,
                    old_value,
                    new_value,
                });
            }
        }
    }

    let width = matrix.iter().map(|line| line.len()).max().unwrap_or(0);
    let pasted = if width == 0 {
        None
    } else {
        Some(Rect {
            min_row: r0,
            max_row: r0 + matrix.len() - 1,
            min_col: c0,
            max_col: (c0 + width - 1).min(cols - 1),
        })
    };

    PasteOutcome {
        changes,
        appended_rows,
        pasted,
    }
}

// =============================================================================
// Two-phase paste (async clipboard reads)
// =============================================================================

/// Coordinates captured when an asynchronous paste begins.
///
/// The row collection may be replaced while the clipboard read is in flight;
/// the epoch captured here is revalidated before any change record is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPaste {
    pub anchor: (usize, usize),
    pub epoch: u64,
}

/// Finish a paste whose clipboard text has arrived. A paste resolving against
/// a bumped epoch is discarded as stale and reported as a no-op.
pub fn complete_paste(
    schema: &dyn GridSchema,
    pending: PendingPaste,
    current_epoch: u64,
    text: &str,
) -> PasteOutcome {
    if pending.epoch != current_epoch {
        log::debug!(
            "discarding stale paste: epoch {} != current {}",
            pending.epoch,
            current_epoch
        );
        return PasteOutcome::empty();
    }
    build_paste(schema, pending.anchor, &parse_matrix(text))
}
