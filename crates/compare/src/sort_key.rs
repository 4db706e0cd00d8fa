//! Canonical sort key selection.
//!
//! Coordinates alone are not unique when several nodes share a position
//! (scalar-transport interface coupling), so the key is extended with the
//! first concentration/flux column group the header fully contains.

use serde::Serialize;

use crate::error::CompareError;
use crate::table::{Table, COORD_COLUMNS};

/// One tie-break rule: applies when the header contains every column in
/// `columns`, which are then appended to the coordinates in this order.
#[derive(Debug, Clone, Copy)]
pub struct TieBreakRule {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Evaluated top to bottom; first rule whose columns are all present wins.
pub const TIE_BREAK_RULES: &[TieBreakRule] = &[
    TieBreakRule {
        name: "phi_domain_flux",
        columns: &[
            "phi_1",
            "flux_domain_phi_1:0",
            "flux_domain_phi_1:1",
            "flux_domain_phi_1:2",
        ],
    },
    TieBreakRule {
        name: "phi_boundary_flux",
        columns: &[
            "phi_1",
            "flux_boundary_phi_1:0",
            "flux_boundary_phi_1:1",
            "flux_boundary_phi_1:2",
        ],
    },
    TieBreakRule {
        name: "phi",
        columns: &["phi_1"],
    },
    TieBreakRule {
        name: "concentration",
        columns: &["c_1"],
    },
];

/// Ordered column indices, always starting with `Points:0..2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    /// Name of the tie-break rule that matched, `None` for coordinates only.
    pub rule: Option<&'static str>,
    pub columns: Vec<usize>,
    pub names: Vec<String>,
}

impl SortKey {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Pick the sort key for `table` from its own header.
pub fn select_sort_key(table: &Table) -> Result<SortKey, CompareError> {
    let mut columns: Vec<usize> = table.coord_columns()?.to_vec();
    let mut names: Vec<String> = COORD_COLUMNS.iter().map(|c| c.to_string()).collect();

    let rule = TIE_BREAK_RULES
        .iter()
        .find(|rule| rule.columns.iter().all(|c| table.has_column(c)));

    if let Some(rule) = rule {
        for name in rule.columns {
            columns.push(table.require_column(name)?);
            names.push(name.to_string());
        }
    }

    let key = SortKey {
        rule: rule.map(|r| r.name),
        columns,
        names,
    };
    log::debug!(
        "{} table: sort key [{}] (rule {})",
        table.role(),
        key.names.join(", "),
        key.rule.unwrap_or("coordinates")
    );
    Ok(key)
}
