//! Fill operations: propagate/increment values across the selection.
//!
//! Source values stay untouched; every other cell in the lane gets a value
//! computed from the source at its offset. The increment rule keys off the
//! *runtime* type of the source value, not the column's declared type:
//! numbers step +1 per offset, dates +1 calendar day, strings with a numeric
//! suffix step the suffix, everything else copies unchanged.

use chrono::Duration;
use fabgrid_core::change::ChangeRecord;
use fabgrid_core::range::Rect;
use fabgrid_core::value::{parse_date, CellValue};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::schema::GridSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillDirection {
    Down,
    Up,
    Right,
    Left,
}

impl FillDirection {
    pub fn is_vertical(self) -> bool {
        matches!(self, FillDirection::Down | FillDirection::Up)
    }
}

/// Compute the change batch for filling `rect` in `direction`.
///
/// Requires at least 2 rows (Down/Up) or 2 columns (Right/Left), otherwise
/// the result is empty. Cells whose computed value equals the existing value,
/// and immutable columns, emit no records. Nothing is written here.
pub fn fill(schema: &dyn GridSchema, rect: &Rect, direction: FillDirection) -> Vec<ChangeRecord> {
    let mut changes = Vec::new();

    if direction.is_vertical() {
        if rect.rows() < 2 {
            return changes;
        }
        let source_row = match direction {
            FillDirection::Down => rect.min_row,
            _ => rect.max_row,
        };
        for col in rect.min_col..=rect.max_col {
            if !schema.column(col).mutable {
                continue;
            }
            let source = schema.value(source_row, col);
            for row in rect.min_row..=rect.max_row {
                if row == source_row {
                    continue;
                }
                let offset = (row as i64 - source_row as i64).abs();
                push_change(schema, &mut changes, row, col, stepped(&source, offset));
            }
        }
    } else {
        if rect.cols() < 2 {
            return changes;
        }
        let source_col = match direction {
            FillDirection::Right => rect.min_col,
            _ => rect.max_col,
        };
        for row in rect.min_row..=rect.max_row {
            for col in rect.min_col..=rect.max_col {
                if col == source_col || !schema.column(col).mutable {
                    continue;
                }
                let source = schema.value(row, source_col);
                let offset = (col as i64 - source_col as i64).abs();
                push_change(schema, &mut changes, row, col, stepped(&source, offset));
            }
        }
    }

    changes
}

fn push_change(
    schema: &dyn GridSchema,
    changes: &mut Vec<ChangeRecord>,
    row: usize,
    col: usize,
    new_value: CellValue,
) {
    let old_value = schema.value(row, col);
    if new_value != old_value {
        changes.push(ChangeRecord {
            row,
            col,
            old_value,
            new_value,
        });
    }
}

/// Value at `offset` steps from `source`, keyed off the source's runtime type.
fn stepped(source: &CellValue, offset: i64) -> CellValue {
    match source {
        CellValue::Number(n) => CellValue::Number(n + offset as f64),
        CellValue::Date(d) => CellValue::Date(*d + Duration::days(offset)),
        CellValue::Text(s) => {
            // Date-like strings first: "2024-01-05" also ends in digits
            if let Some(d) = parse_date(s) {
                let next = d + Duration::days(offset);
                return CellValue::Text(next.format("%Y-%m-%d").to_string());
            }
            if let Some((prefix, num, width)) = split_trailing_number(s) {
                return CellValue::Text(format!(
                    "{}{}",
                    prefix,
                    format_number_with_width(num + offset, width)
                ));
            }
            source.clone()
        }
        _ => source.clone(),
    }
}

/// Split a trailing run of digits off a string: "port-07" -> ("port-", 7, width 2).
/// Width is recorded only for zero-padded suffixes.
pub(crate) fn split_trailing_number(text: &str) -> Option<(String, i64, Option<usize>)> {
    let re = Regex::new(r"^(.*?)(\d+)$").unwrap();
    let caps = re.captures(text)?;
    let prefix = caps[1].to_string();
    let digits = &caps[2];
    let num: i64 = digits.parse().ok()?;
    let width = if digits.len() > 1 && digits.starts_with('0') {
        Some(digits.len())
    } else {
        None
    };
    Some((prefix, num, width))
}

pub(crate) fn format_number_with_width(n: i64, width: Option<usize>) -> String {
    match width {
        Some(w) => {
            if n < 0 {
                format!("-{:0>width$}", -n, width = w)
            } else {
                format!("{:0>width$}", n, width = w)
            }
        }
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MemoryGrid;
    use chrono::NaiveDate;
    use fabgrid_core::column::{ColumnKind, ColumnSpec};

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn column_grid(kind: ColumnKind, values: Vec<CellValue>) -> MemoryGrid {
        MemoryGrid::with_rows(
            vec![ColumnSpec::new("c0", kind)],
            values.into_iter().map(|v| vec![v]).collect(),
        )
    }

    #[test]
    fn test_fill_down_numbers_step_one() {
        // Rows 5-9 selected, row 5 holds 10: rows 6-9 become 11..14
        let mut values = vec![CellValue::Null; 10];
        values[5] = CellValue::Number(10.0);
        let grid = column_grid(ColumnKind::Number, values);

        let rect = Rect::from_corners((5, 0), (9, 0));
        let changes = fill(&grid, &rect, FillDirection::Down);

        let got: Vec<_> = changes.iter().map(|c| (c.row, c.new_value.clone())).collect();
        assert_eq!(
            got,
            vec![
                (6, CellValue::Number(11.0)),
                (7, CellValue::Number(12.0)),
                (8, CellValue::Number(13.0)),
                (9, CellValue::Number(14.0)),
            ]
        );
    }

    #[test]
    fn test_fill_up_sources_bottom_row() {
        let values = vec![CellValue::Null, CellValue::Null, CellValue::Number(5.0)];
        let grid = column_grid(ColumnKind::Number, values);

        let rect = Rect::from_corners((0, 0), (2, 0));
        let changes = fill(&grid, &rect, FillDirection::Up);

        let got: Vec<_> = changes.iter().map(|c| (c.row, c.new_value.clone())).collect();
        assert!(got.contains(&(1, CellValue::Number(6.0))));
        assert!(got.contains(&(0, CellValue::Number(7.0))));
    }

    #[test]
    fn test_fill_right_per_row_sources() {
        let grid = MemoryGrid::with_rows(
            vec![
                ColumnSpec::new("c0", ColumnKind::Number),
                ColumnSpec::new("c1", ColumnKind::Number),
                ColumnSpec::new("c2", ColumnKind::Number),
            ],
            vec![
                vec![CellValue::Number(1.0), CellValue::Null, CellValue::Null],
                vec![CellValue::Number(100.0), CellValue::Null, CellValue::Null],
            ],
        );

        let rect = Rect::from_corners((0, 0), (1, 2));
        let changes = fill(&grid, &rect, FillDirection::Right);

        let got: Vec<_> = changes
            .iter()
            .map(|c| (c.row, c.col, c.new_value.clone()))
            .collect();
        assert!(got.contains(&(0, 1, CellValue::Number(2.0))));
        assert!(got.contains(&(0, 2, CellValue::Number(3.0))));
        assert!(got.contains(&(1, 1, CellValue::Number(101.0))));
        assert!(got.contains(&(1, 2, CellValue::Number(102.0))));
    }

    #[test]
    fn test_fill_dates_step_one_day() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let values = vec![CellValue::Date(start), CellValue::Null, CellValue::Null];
        let grid = column_grid(ColumnKind::Date, values);

        let rect = Rect::from_corners((0, 0), (2, 0));
        let changes = fill(&grid, &rect, FillDirection::Down);

        // 2024 is a leap year: Feb 28 -> Feb 29 -> Mar 1
        assert_eq!(
            changes[0].new_value,
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert_eq!(
            changes[1].new_value,
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
    }

    #[test]
    fn test_fill_date_like_strings_stay_strings() {
        let values = vec![text("2024-12-31"), CellValue::Null];
        let grid = column_grid(ColumnKind::Text, values);

        let rect = Rect::from_corners((0, 0), (1, 0));
        let changes = fill(&grid, &rect, FillDirection::Down);
        assert_eq!(changes[0].new_value, text("2025-01-01"));
    }

    #[test]
    fn test_fill_trailing_number_suffix() {
        let values = vec![text("port-7"), CellValue::Null, CellValue::Null];
        let grid = column_grid(ColumnKind::Text, values);

        let rect = Rect::from_corners((0, 0), (2, 0));
        let changes = fill(&grid, &rect, FillDirection::Down);
        assert_eq!(changes[0].new_value, text("port-8"));
        assert_eq!(changes[1].new_value, text("port-9"));
    }

    #[test]
    fn test_fill_preserves_zero_padding() {
        let values = vec![text("zone-009"), CellValue::Null];
        let grid = column_grid(ColumnKind::Text, values);

        let rect = Rect::from_corners((0, 0), (1, 0));
        let changes = fill(&grid, &rect, FillDirection::Down);
        assert_eq!(changes[0].new_value, text("zone-010"));
    }

    #[test]
    fn test_fill_booleans_and_plain_text_copy() {
        let grid = MemoryGrid::with_rows(
            vec![
                ColumnSpec::new("enabled", ColumnKind::Boolean),
                ColumnSpec::new("site", ColumnKind::Text),
            ],
            vec![
                vec![CellValue::Bool(true), text("primary")],
                vec![CellValue::Null, CellValue::Null],
                vec![CellValue::Null, CellValue::Null],
            ],
        );

        let rect = Rect::from_corners((0, 0), (2, 1));
        let changes = fill(&grid, &rect, FillDirection::Down);

        let got: Vec<_> = changes
            .iter()
            .map(|c| (c.row, c.col, c.new_value.clone()))
            .collect();
        assert!(got.contains(&(1, 0, CellValue::Bool(true))));
        assert!(got.contains(&(2, 0, CellValue::Bool(true))));
        assert!(got.contains(&(1, 1, text("primary"))));
        assert!(got.contains(&(2, 1, text("primary"))));
    }

    #[test]
    fn test_fill_single_row_is_noop() {
        let grid = column_grid(ColumnKind::Number, vec![CellValue::Number(1.0)]);
        let rect = Rect::from_corners((0, 0), (0, 0));
        assert!(fill(&grid, &rect, FillDirection::Down).is_empty());
        assert!(fill(&grid, &rect, FillDirection::Right).is_empty());
    }

    #[test]
    fn test_fill_omits_unchanged_cells() {
        let values = vec![
            CellValue::Number(1.0),
            CellValue::Number(2.0),
            CellValue::Null,
        ];
        let grid = column_grid(ColumnKind::Number, values);

        let rect = Rect::from_corners((0, 0), (2, 0));
        let changes = fill(&grid, &rect, FillDirection::Down);
        // Row 1 already holds 2: only row 2 changes
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].row, 2);
        assert_eq!(changes[0].new_value, CellValue::Number(3.0));
    }

    #[test]
    fn test_fill_skips_immutable_columns() {
        let grid = MemoryGrid::with_rows(
            vec![ColumnSpec::new("wwn", ColumnKind::Number).read_only()],
            vec![vec![CellValue::Number(1.0)], vec![CellValue::Null]],
        );
        let rect = Rect::from_corners((0, 0), (1, 0));
        assert!(fill(&grid, &rect, FillDirection::Down).is_empty());
    }

    #[test]
    fn test_split_trailing_number() {
        assert_eq!(
            split_trailing_number("port-7"),
            Some(("port-".to_string(), 7, None))
        );
        assert_eq!(
            split_trailing_number("zone-009"),
            Some(("zone-".to_string(), 9, Some(3)))
        );
        assert_eq!(split_trailing_number("042"), Some(("".to_string(), 42, Some(3))));
        assert_eq!(split_trailing_number("no digits"), None);
        assert_eq!(split_trailing_number(""), None);
    }

    #[test]
    fn test_format_number_with_width() {
        assert_eq!(format_number_with_width(3, Some(3)), "003");
        assert_eq!(format_number_with_width(-3, Some(3)), "-003");
        assert_eq!(format_number_with_width(42, None), "42");
    }
}
