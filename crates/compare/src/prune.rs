//! Spatial row correspondence between a result sequence and the reference.

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, TableRole};
use crate::table::Row;

/// Default distance below which two positions are the same point.
pub const POSITION_EPSILON: f64 = 1e-8;

pub type Position = [f64; 3];

/// Which result rows are dropped when the row counts disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrunePolicy {
    /// Drop rows whose position has no reference row within epsilon.
    #[default]
    Unmatched,
    /// Drop rows whose position does have a reference row within epsilon.
    Matched,
}

impl std::fmt::Display for PrunePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unmatched => write!(f, "unmatched"),
            Self::Matched => write!(f, "matched"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PruneOutcome {
    pub rows: Vec<Row>,
    pub removed: Vec<Row>,
}

pub fn position_of(row: &Row, coords: [usize; 3], role: TableRole, row_idx: usize) -> Result<Position, CompareError> {
    let mut pos = [0.0; 3];
    for (axis, &col) in coords.iter().enumerate() {
        let field = &row[col];
        pos[axis] = field.trim().parse().map_err(|_| {
            CompareError::malformed(
                role,
                0,
                format!(
                    "sorted row {row_idx}: coordinate Points:{axis} '{field}' is not a number (row: {})",
                    row.join(",")
                ),
            )
        })?;
    }
    Ok(pos)
}

pub fn distance(a: &Position, b: &Position) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Whether any of `candidates` lies strictly closer than `epsilon` to `p`.
pub fn has_counterpart(p: &Position, candidates: &[Position], epsilon: f64) -> bool {
    candidates.iter().any(|q| distance(p, q) < epsilon)
}

/// Remove rows from `rows` according to `policy`, judged by the positions in
/// `reference`. Removal is by value: for every selected row the first equal
/// row in the sequence is dropped, the rest keep their order.
pub fn prune_rows(
    rows: &[Row],
    coords: [usize; 3],
    role: TableRole,
    reference: &[Row],
    reference_coords: [usize; 3],
    policy: PrunePolicy,
    epsilon: f64,
) -> Result<PruneOutcome, CompareError> {
    let reference_positions = reference
        .iter()
        .enumerate()
        .map(|(i, r)| position_of(r, reference_coords, TableRole::Reference, i))
        .collect::<Result<Vec<_>, _>>()?;

    let mut selected: Vec<Row> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let p = position_of(row, coords, role, i)?;
        let matched = has_counterpart(&p, &reference_positions, epsilon);
        let remove = match policy {
            PrunePolicy::Unmatched => !matched,
            PrunePolicy::Matched => matched,
        };
        if remove {
            selected.push(row.clone());
        }
    }

    let mut kept = rows.to_vec();
    for target in &selected {
        if let Some(idx) = kept.iter().position(|r| r == target) {
            kept.remove(idx);
        }
    }

    log::debug!(
        "{role} table: pruned {} of {} rows (policy {policy})",
        selected.len(),
        rows.len()
    );

    Ok(PruneOutcome {
        rows: kept,
        removed: selected,
    })
}
