// Per-row tolerances carried in the reference table's trailing column.

use crate::error::{CompareError, TableRole};
use crate::table::Row;

/// Reference rows with the tolerance column split off, plus one tolerance
/// per row at the same position.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedReference {
    pub rows: Vec<Row>,
    pub tolerances: Vec<f64>,
}

/// Remove the last field of every row and parse it as the row's tolerance.
pub fn extract_tolerances(rows: &[Row]) -> Result<ExtractedReference, CompareError> {
    let mut out_rows = Vec::with_capacity(rows.len());
    let mut tolerances = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let Some((last, data)) = row.split_last() else {
            return Err(CompareError::malformed(
                TableRole::Reference,
                0,
                format!("sorted row {i} has no tolerance field"),
            ));
        };
        let tol: f64 = last.trim().parse().map_err(|_| {
            CompareError::malformed(
                TableRole::Reference,
                0,
                format!(
                    "sorted row {i}: tolerance '{last}' is not a number (row: {})",
                    row.join(",")
                ),
            )
        })?;
        tolerances.push(tol);
        out_rows.push(data.to_vec());
    }

    Ok(ExtractedReference {
        rows: out_rows,
        tolerances,
    })
}

/// `|a - b| <= tol`, with a few ULPs of slack scaled to the operands so
/// decimal boundaries survive binary rounding. Two NaNs compare equal.
pub fn within_tolerance(a: f64, b: f64, tol: f64, slack: bool) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    if a == b {
        return true;
    }
    let delta = (a - b).abs();
    if !slack {
        return delta <= tol;
    }
    let scale = 1.0_f64.max(a.abs()).max(b.abs()).max(delta).max(tol);
    let eps = f64::EPSILON * 16.0 * scale;
    delta <= tol + eps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn splits_last_column() {
        let rows = vec![row(&["0", "0", "0", "1.5", "0.001"]), row(&["1", "0", "0", "2", "1e-6"])];
        let ext = extract_tolerances(&rows).unwrap();
        assert_eq!(ext.tolerances, vec![0.001, 1e-6]);
        assert_eq!(ext.rows[0], row(&["0", "0", "0", "1.5"]));
        assert_eq!(ext.rows[1].len(), 4);
    }

    #[test]
    fn unparseable_tolerance_is_malformed() {
        let err = extract_tolerances(&[row(&["0", "abc"])]).unwrap_err();
        assert!(err.to_string().contains("'abc' is not a number"), "{err}");
        assert!(err.to_string().contains("(row: 0,abc)"), "{err}");
    }

    #[test]
    fn empty_row_has_no_tolerance() {
        assert!(extract_tolerances(&[Vec::new()]).is_err());
    }

    #[test]
    fn equal_values_always_pass() {
        assert!(within_tolerance(1.25, 1.25, 0.0, false));
        assert!(within_tolerance(-3.0, -3.0, 0.0, true));
    }

    #[test]
    fn decimal_boundary_needs_slack() {
        // 1.1 - 1.0 is slightly above 0.1 in binary.
        assert!(!within_tolerance(1.1, 1.0, 0.1, false));
        assert!(within_tolerance(1.1, 1.0, 0.1, true));
    }

    #[test]
    fn clear_violations_fail() {
        assert!(!within_tolerance(1.0, 1.01, 0.001, true));
        assert!(!within_tolerance(1.0, 1.0 + 0.001 + 1e-9, 0.001, true));
    }

    #[test]
    fn nan_handling() {
        assert!(within_tolerance(f64::NAN, f64::NAN, 0.0, true));
        assert!(!within_tolerance(f64::NAN, 1.0, 10.0, true));
    }
}
