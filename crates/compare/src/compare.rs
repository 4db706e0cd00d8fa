//! The two checks of a comparison run. Both stop at the first violation.

use serde::Serialize;

use crate::error::{CompareError, TableRole};
use crate::table::Row;
use crate::tolerance::within_tolerance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExactStats {
    pub rows_compared: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ToleranceStats {
    pub rows_compared: usize,
    pub fields_compared: usize,
}

/// Row-by-row verbatim comparison of the two sorted result sequences.
///
/// Rows are paired by position over the common prefix; a row-count
/// difference alone is not a mismatch here.
pub fn check_exact(parallel: &[Row], serial: &[Row]) -> Result<ExactStats, CompareError> {
    if parallel.len() != serial.len() {
        log::warn!(
            "result tables differ in row count (parallel {}, serial {}); comparing first {}",
            parallel.len(),
            serial.len(),
            parallel.len().min(serial.len())
        );
    }

    let mut stats = ExactStats::default();
    for (i, (p, s)) in parallel.iter().zip(serial.iter()).enumerate() {
        if p != s {
            return Err(CompareError::ExactMismatch {
                row: i,
                parallel: p.clone(),
                serial: s.clone(),
            });
        }
        stats.rows_compared += 1;
    }

    log::info!("files are identical ({} rows)", stats.rows_compared);
    Ok(stats)
}

/// Field-by-field numeric comparison of a result sequence against the
/// reference, each row with its own tolerance.
pub fn check_tolerance(
    actual: &[Row],
    reference: &[Row],
    tolerances: &[f64],
    header: &[String],
    slack: bool,
) -> Result<ToleranceStats, CompareError> {
    if actual.len() != reference.len() {
        return Err(CompareError::ShapeMismatch {
            left: TableRole::Parallel,
            right: TableRole::Reference,
            left_len: actual.len(),
            right_len: reference.len(),
            message: "row counts differ after pruning".into(),
        });
    }

    let mut stats = ToleranceStats::default();
    for (i, ((result, expected), &tol)) in actual.iter().zip(reference).zip(tolerances).enumerate() {
        if result.len() != expected.len() {
            return Err(CompareError::ShapeMismatch {
                left: TableRole::Parallel,
                right: TableRole::Reference,
                left_len: result.len(),
                right_len: expected.len(),
                message: format!("field counts differ at row {i} (check the reference file)"),
            });
        }

        for (j, (a, e)) in result.iter().zip(expected).enumerate() {
            let a_num = parse_field(a, TableRole::Parallel, result, i, j)?;
            let e_num = parse_field(e, TableRole::Reference, expected, i, j)?;
            if !within_tolerance(a_num, e_num, tol, slack) {
                return Err(CompareError::ToleranceExceeded {
                    row: i,
                    column: j,
                    column_name: header.get(j).cloned().unwrap_or_default(),
                    expected: e.clone(),
                    actual: a.clone(),
                    tolerance: tol,
                    reference_row: expected.clone(),
                    actual_row: result.clone(),
                });
            }
            stats.fields_compared += 1;
        }
        stats.rows_compared += 1;
    }

    log::info!("results are correct ({} rows)", stats.rows_compared);
    Ok(stats)
}

fn parse_field(
    field: &str,
    role: TableRole,
    row: &Row,
    row_idx: usize,
    column: usize,
) -> Result<f64, CompareError> {
    field.trim().parse().map_err(|_| {
        CompareError::malformed(
            role,
            0,
            format!(
                "sorted row {row_idx}, column {}: '{field}' is not a number (row: {})",
                column + 1,
                row.join(",")
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|f| f.to_string()).collect()
    }

    fn header() -> Vec<String> {
        ["Points:0", "Points:1", "Points:2", "val"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_passes_on_identical_rows() {
        let a = vec![row(&["0", "0", "0", "1"]), row(&["1", "0", "0", "2"])];
        let stats = check_exact(&a, &a.clone()).unwrap();
        assert_eq!(stats.rows_compared, 2);
    }

    #[test]
    fn exact_is_textual() {
        let a = vec![row(&["0", "0", "0", "1.0"])];
        let b = vec![row(&["0", "0", "0", "1"])];
        let err = check_exact(&a, &b).unwrap_err();
        assert_eq!(
            err,
            CompareError::ExactMismatch {
                row: 0,
                parallel: a[0].clone(),
                serial: b[0].clone()
            }
        );
    }

    #[test]
    fn exact_compares_common_prefix() {
        let a = vec![row(&["0"]), row(&["1"]), row(&["2"])];
        let b = vec![row(&["0"]), row(&["1"])];
        assert_eq!(check_exact(&a, &b).unwrap().rows_compared, 2);
    }

    #[test]
    fn exact_stops_at_first_mismatch() {
        let a = vec![row(&["0"]), row(&["x"]), row(&["y"])];
        let b = vec![row(&["0"]), row(&["1"]), row(&["2"])];
        match check_exact(&a, &b).unwrap_err() {
            CompareError::ExactMismatch { row, .. } => assert_eq!(row, 1),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn tolerance_accepts_small_differences() {
        let a = vec![row(&["0", "0", "0", "1.0005"])];
        let r = vec![row(&["0", "0", "0", "1.0"])];
        let stats = check_tolerance(&a, &r, &[0.001], &header(), true).unwrap();
        assert_eq!(stats.rows_compared, 1);
        assert_eq!(stats.fields_compared, 4);
    }

    #[test]
    fn tolerance_reports_row_and_column() {
        let a = vec![row(&["0", "0", "0", "1"]), row(&["1", "0", "0", "2.01"])];
        let r = vec![row(&["0", "0", "0", "1"]), row(&["1", "0", "0", "2"])];
        match check_tolerance(&a, &r, &[0.001, 0.001], &header(), true).unwrap_err() {
            CompareError::ToleranceExceeded { row, column, column_name, expected, actual, .. } => {
                assert_eq!((row, column), (1, 3));
                assert_eq!(column_name, "val");
                assert_eq!(expected, "2");
                assert_eq!(actual, "2.01");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn tolerance_is_per_row() {
        let a = vec![row(&["0", "0", "0", "1.5"]), row(&["1", "0", "0", "2.5"])];
        let r = vec![row(&["0", "0", "0", "1"]), row(&["1", "0", "0", "2"])];
        let err = check_tolerance(&a, &r, &[1.0, 0.1], &header(), true).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::ToleranceExceeded);
    }

    #[test]
    fn row_count_mismatch_is_shape_error() {
        let a = vec![row(&["0"]), row(&["1"])];
        let r = vec![row(&["0"])];
        let err = check_tolerance(&a, &r, &[0.0], &header(), true).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::ShapeMismatch);
    }

    #[test]
    fn field_count_mismatch_is_shape_error() {
        let a = vec![row(&["0", "0", "0", "1"])];
        let r = vec![row(&["0", "0", "0"])];
        match check_tolerance(&a, &r, &[0.0], &header(), true).unwrap_err() {
            CompareError::ShapeMismatch { left_len, right_len, message, .. } => {
                assert_eq!((left_len, right_len), (4, 3));
                assert!(message.contains("row 0"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_field_is_malformed() {
        let a = vec![row(&["0", "0", "0", "n/a"])];
        let r = vec![row(&["0", "0", "0", "1"])];
        let err = check_tolerance(&a, &r, &[1.0], &header(), true).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::MalformedInput);
        let msg = err.to_string();
        assert!(msg.starts_with("parallel table: sorted row 0, column 4"), "{msg}");
        assert!(msg.contains("(row: 0,0,0,n/a)"), "{msg}");
    }
}
