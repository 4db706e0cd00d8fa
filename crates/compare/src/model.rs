use serde::Serialize;

use crate::config::CompareConfig;
use crate::table::Table;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The three tables of one comparison run.
#[derive(Debug, Clone)]
pub struct CompareInput {
    pub parallel: Table,
    pub serial: Table,
    /// Data columns followed by a per-row tolerance column.
    pub reference: Table,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CompareReport {
    pub meta: CompareMeta,
    pub summary: CompareSummary,
    pub sort_keys: SortKeys,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareMeta {
    pub engine_version: String,
    pub run_at: String,
    pub config: CompareConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompareSummary {
    pub parallel_rows: usize,
    pub serial_rows: usize,
    pub reference_rows: usize,
    pub exact_rows_compared: usize,
    pub pruned_rows: usize,
    pub tolerance_rows_compared: usize,
    pub fields_compared: usize,
}

/// Column names of the key each table was sorted by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKeys {
    pub parallel: Vec<String>,
    pub serial: Vec<String>,
    pub reference: Vec<String>,
}
