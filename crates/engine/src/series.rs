//! Series detection: best-fit sequence patterns from multiple sample values.
//!
//! The primary fill operations apply a fixed +1 step (see `fill`); this
//! module is the opt-in richer detector behind `fill_series`. It detects a
//! constant-step pattern from the leading values of a lane and extends it:
//! - Two+ numbers with a constant step -> linear series
//! - Two+ dates with a constant day step -> date series
//! - Two+ strings with one prefix and constant-step numeric suffixes
//! - Anything else -> repeat the samples as a cycle

use chrono::{Duration, NaiveDate};
use fabgrid_core::change::ChangeRecord;
use fabgrid_core::range::Rect;
use fabgrid_core::value::CellValue;

use crate::fill::{format_number_with_width, split_trailing_number, FillDirection};
use crate::schema::GridSchema;

/// Detected sequence pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesPattern {
    /// Repeat the sample values as a cycle.
    Repeat { values: Vec<CellValue> },
    /// Linear numeric series; `start` is the last sample.
    Linear { start: f64, step: f64 },
    /// Calendar-day series; `start` is the last sample.
    DateLinear { start: NaiveDate, step_days: i64 },
    /// Shared prefix with a stepping numeric suffix; `start` is the last sample.
    TrailingNumber {
        prefix: String,
        start: i64,
        step: i64,
        width: Option<usize>,
    },
}

/// Detect a pattern from sample values in lane order.
pub fn detect(samples: &[CellValue]) -> SeriesPattern {
    match samples.len() {
        0 => SeriesPattern::Repeat {
            values: vec![CellValue::Null],
        },
        1 => detect_single(&samples[0]),
        _ => detect_multi(samples),
    }
}

fn detect_single(value: &CellValue) -> SeriesPattern {
    match value {
        CellValue::Number(n) => SeriesPattern::Linear {
            start: *n,
            step: 1.0,
        },
        CellValue::Date(d) => SeriesPattern::DateLinear {
            start: *d,
            step_days: 1,
        },
        CellValue::Text(s) => {
            if let Some((prefix, num, width)) = split_trailing_number(s) {
                return SeriesPattern::TrailingNumber {
                    prefix,
                    start: num,
                    step: 1,
                    width,
                };
            }
            SeriesPattern::Repeat {
                values: vec![value.clone()],
            }
        }
        _ => SeriesPattern::Repeat {
            values: vec![value.clone()],
        },
    }
}

fn detect_multi(samples: &[CellValue]) -> SeriesPattern {
    if let Some(pattern) = detect_linear(samples) {
        return pattern;
    }
    if let Some(pattern) = detect_date_linear(samples) {
        return pattern;
    }
    if let Some(pattern) = detect_trailing_number(samples) {
        return pattern;
    }
    SeriesPattern::Repeat {
        values: samples.to_vec(),
    }
}

fn detect_linear(samples: &[CellValue]) -> Option<SeriesPattern> {
    let numbers: Vec<f64> = samples
        .iter()
        .map(|v| v.as_number())
        .collect::<Option<Vec<_>>>()?;
    let step = numbers[1] - numbers[0];
    for pair in numbers.windows(2) {
        if (pair[1] - pair[0] - step).abs() > f64::EPSILON {
            return None;
        }
    }
    Some(SeriesPattern::Linear {
        start: numbers[numbers.len() - 1],
        step,
    })
}

fn detect_date_linear(samples: &[CellValue]) -> Option<SeriesPattern> {
    let dates: Vec<NaiveDate> = samples
        .iter()
        .map(|v| match v {
            CellValue::Date(d) => Some(*d),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    let step_days = (dates[1] - dates[0]).num_days();
    for pair in dates.windows(2) {
        if (pair[1] - pair[0]).num_days() != step_days {
            return None;
        }
    }
    Some(SeriesPattern::DateLinear {
        start: dates[dates.len() - 1],
        step_days,
    })
}

fn detect_trailing_number(samples: &[CellValue]) -> Option<SeriesPattern> {
    let parts: Vec<(String, i64, Option<usize>)> = samples
        .iter()
        .map(|v| match v {
            CellValue::Text(s) => split_trailing_number(s),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    let prefix = &parts[0].0;
    let step = parts[1].1 - parts[0].1;
    for pair in parts.windows(2) {
        if pair[1].0 != *prefix || pair[1].1 - pair[0].1 != step {
            return None;
        }
    }
    let last = &parts[parts.len() - 1];
    Some(SeriesPattern::TrailingNumber {
        prefix: prefix.clone(),
        start: last.1,
        step,
        width: parts[0].2,
    })
}

/// Generate the k-th value after the samples (1-indexed).
pub fn generate(pattern: &SeriesPattern, k: usize) -> CellValue {
    let k = k as i64;
    match pattern {
        SeriesPattern::Repeat { values } => values[(k as usize - 1) % values.len()].clone(),
        SeriesPattern::Linear { start, step } => CellValue::Number(start + step * k as f64),
        SeriesPattern::DateLinear { start, step_days } => {
            CellValue::Date(*start + Duration::days(step_days * k))
        }
        SeriesPattern::TrailingNumber {
            prefix,
            start,
            step,
            width,
        } => CellValue::Text(format!(
            "{}{}",
            prefix,
            format_number_with_width(start + step * k, *width)
        )),
    }
}

/// Pattern-extending fill over `rect`.
///
/// Per lane, the leading contiguous run of non-empty cells (from the source
/// edge) forms the samples; the detected pattern fills the rest of the lane.
/// Lanes that are entirely empty or entirely full emit nothing.
pub fn fill_series(
    schema: &dyn GridSchema,
    rect: &Rect,
    direction: FillDirection,
) -> Vec<ChangeRecord> {
    let mut changes = Vec::new();

    let lanes: Vec<Vec<(usize, usize)>> = if direction.is_vertical() {
        if rect.rows() < 2 {
            return changes;
        }
        (rect.min_col..=rect.max_col)
            .map(|col| {
                let mut cells: Vec<_> =
                    (rect.min_row..=rect.max_row).map(|row| (row, col)).collect();
                if direction == FillDirection::Up {
                    cells.reverse();
                }
                cells
            })
            .collect()
    } else {
        if rect.cols() < 2 {
            return changes;
        }
        (rect.min_row..=rect.max_row)
            .map(|row| {
                let mut cells: Vec<_> =
                    (rect.min_col..=rect.max_col).map(|col| (row, col)).collect();
                if direction == FillDirection::Left {
                    cells.reverse();
                }
                cells
            })
            .collect()
    };

    for lane in lanes {
        // Vertical lanes live in one column; skip immutable ones wholesale
        if direction.is_vertical() && !schema.column(lane[0].1).mutable {
            continue;
        }

        let sample_count = lane
            .iter()
            .take_while(|&&(row, col)| !schema.is_cell_empty(row, col))
            .count();
        if sample_count == 0 || sample_count == lane.len() {
            continue;
        }

        let samples: Vec<CellValue> = lane[..sample_count]
            .iter()
            .map(|&(row, col)| schema.value(row, col))
            .collect();
        let pattern = detect(&samples);

        for (k, &(row, col)) in lane[sample_count..].iter().enumerate() {
            if !schema.column(col).mutable {
                continue;
            }
            let new_value = generate(&pattern, k + 1);
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
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MemoryGrid;
    use fabgrid_core::column::{ColumnKind, ColumnSpec};

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_single_number_steps_by_one() {
        let pattern = detect(&[num(1.0)]);
        assert_eq!(pattern, SeriesPattern::Linear { start: 1.0, step: 1.0 });
        assert_eq!(generate(&pattern, 1), num(2.0));
        assert_eq!(generate(&pattern, 3), num(4.0));
    }

    #[test]
    fn test_two_numbers_detect_step() {
        // 10, 20 -> 30, 40, 50
        let pattern = detect(&[num(10.0), num(20.0)]);
        assert_eq!(pattern, SeriesPattern::Linear { start: 20.0, step: 10.0 });
        assert_eq!(generate(&pattern, 1), num(30.0));
        assert_eq!(generate(&pattern, 3), num(50.0));
    }

    #[test]
    fn test_negative_step() {
        // 5, 3 -> 1, -1, -3
        let pattern = detect(&[num(5.0), num(3.0)]);
        assert_eq!(pattern, SeriesPattern::Linear { start: 3.0, step: -2.0 });
        assert_eq!(generate(&pattern, 2), num(-1.0));
    }

    #[test]
    fn test_non_constant_step_repeats() {
        // 1, 2, 4 -> cycle
        let pattern = detect(&[num(1.0), num(2.0), num(4.0)]);
        match &pattern {
            SeriesPattern::Repeat { values } => assert_eq!(values.len(), 3),
            other => panic!("expected repeat, got {:?}", other),
        }
        assert_eq!(generate(&pattern, 1), num(1.0));
        assert_eq!(generate(&pattern, 4), num(1.0)); // Wraps
    }

    #[test]
    fn test_date_series() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let pattern = detect(&[CellValue::Date(d1), CellValue::Date(d2)]);
        assert_eq!(
            pattern,
            SeriesPattern::DateLinear {
                start: d2,
                step_days: 7
            }
        );
        assert_eq!(
            generate(&pattern, 1),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
    }

    #[test]
    fn test_trailing_number_series() {
        let pattern = detect(&[text("zone-1"), text("zone-3")]);
        assert_eq!(
            pattern,
            SeriesPattern::TrailingNumber {
                prefix: "zone-".to_string(),
                start: 3,
                step: 2,
                width: None
            }
        );
        assert_eq!(generate(&pattern, 1), text("zone-5"));
    }

    #[test]
    fn test_prefix_mismatch_repeats() {
        let pattern = detect(&[text("zone-1"), text("port-2")]);
        assert!(matches!(pattern, SeriesPattern::Repeat { .. }));
    }

    #[test]
    fn test_mixed_types_repeat() {
        let pattern = detect(&[num(1.0), text("x")]);
        assert!(matches!(pattern, SeriesPattern::Repeat { .. }));
    }

    #[test]
    fn test_fill_series_extends_leading_run() {
        // Rows 0-1 hold 10, 20; rows 2-4 empty: series fill yields 30, 40, 50
        let grid = MemoryGrid::with_rows(
            vec![ColumnSpec::new("c0", ColumnKind::Number)],
            vec![
                vec![num(10.0)],
                vec![num(20.0)],
                vec![CellValue::Null],
                vec![CellValue::Null],
                vec![CellValue::Null],
            ],
        );
        let rect = Rect::from_corners((0, 0), (4, 0));
        let changes = fill_series(&grid, &rect, FillDirection::Down);
        let got: Vec<_> = changes.iter().map(|c| (c.row, c.new_value.clone())).collect();
        assert_eq!(
            got,
            vec![(2, num(30.0)), (3, num(40.0)), (4, num(50.0))]
        );
    }

    #[test]
    fn test_fill_series_full_or_empty_lane_is_noop() {
        let grid = MemoryGrid::with_rows(
            vec![ColumnSpec::new("c0", ColumnKind::Number)],
            vec![vec![num(1.0)], vec![num(2.0)]],
        );
        let rect = Rect::from_corners((0, 0), (1, 0));
        assert!(fill_series(&grid, &rect, FillDirection::Down).is_empty());

        let empty = MemoryGrid::with_rows(
            vec![ColumnSpec::new("c0", ColumnKind::Number)],
            vec![vec![CellValue::Null], vec![CellValue::Null]],
        );
        assert!(fill_series(&empty, &rect, FillDirection::Down).is_empty());
    }
}
