use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Runtime value held by a grid cell.
///
/// The *declared* type lives on the owning column (`ColumnKind`); a cell can
/// legitimately hold `Null` under any declared type, and a text column can
/// hold strings that happen to look numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellValue {
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

impl CellValue {
    /// Emptiness as seen by navigation boundary scans: `Null` or empty text.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Canonical clipboard rendition of this value.
    ///
    /// `Null` renders as the empty string, booleans as literal `TRUE`/`FALSE`,
    /// dates as `YYYY-MM-DD`, numbers via [`format_number`]. This is the wire
    /// format external spreadsheet applications round-trip.
    pub fn to_clipboard_string(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => {
                if *b {
                    "TRUE".to_string()
                } else {
                    "FALSE".to_string()
                }
            }
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Canonical decimal rendition of a number.
/// Guarantees: no scientific notation, deterministic output, -0.0 normalized to 0.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        if n.is_nan() {
            return "NaN".to_string();
        }
        return if n > 0.0 { "INF".to_string() } else { "-INF".to_string() };
    }

    // Normalize -0.0 to 0.0
    let n0 = if n == 0.0 { 0.0 } else { n };

    // Integer fast path: no decimal point needed
    if n0.fract() == 0.0 && n0.abs() < 9e15 {
        format!("{:.0}", n0)
    } else {
        // Fixed precision (15 decimals), trim trailing zeros, no scientific notation
        let mut s = format!("{:.15}", n0);
        while s.contains('.') && s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
        s
    }
}

/// Parse a calendar date from the interchange formats pasted data arrives in.
/// Date-time strings keep only their date part.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

    for fmt in FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d);
        }
    }

    // "2024-03-01T00:00:00" or "2024-03-01 00:00:00" from exports
    if let Some(idx) = trimmed.find(|c| c == 'T' || c == ' ') {
        let date_part = &trimmed[..idx];
        for fmt in FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(date_part, fmt) {
                return Some(d);
            }
        }
    }

    None
}
