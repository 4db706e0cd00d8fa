use crate::compare::{check_exact, check_tolerance};
use crate::config::CompareConfig;
use crate::error::{CompareError, TableRole};
use crate::model::{CompareInput, CompareMeta, CompareReport, CompareSummary, SortKeys};
use crate::prune::prune_rows;
use crate::sort_key::select_sort_key;
use crate::sorter::sort_rows;
use crate::table::Table;
use crate::tolerance::extract_tolerances;

impl CompareInput {
    /// Parse the three CSV texts.
    pub fn from_csv_strs(parallel: &str, serial: &str, reference: &str) -> Result<Self, CompareError> {
        Ok(Self {
            parallel: Table::from_csv_str(TableRole::Parallel, parallel)?,
            serial: Table::from_csv_str(TableRole::Serial, serial)?,
            reference: Table::from_csv_str(TableRole::Reference, reference)?,
        })
    }
}

/// Run the full comparison. Returns the first violation found.
///
/// Order: sort all three tables, split tolerances off the reference,
/// verbatim parallel/serial check, prune the parallel rows against the
/// reference if the counts differ, tolerance check against the reference.
pub fn run(config: &CompareConfig, input: &CompareInput) -> Result<CompareReport, CompareError> {
    config.validate()?;
    let order = config.sort.order;

    let parallel_key = select_sort_key(&input.parallel)?;
    let serial_key = select_sort_key(&input.serial)?;
    let reference_key = select_sort_key(&input.reference)?;

    let parallel = sort_rows(&input.parallel, &parallel_key, order);
    let serial = sort_rows(&input.serial, &serial_key, order);
    let reference_sorted = sort_rows(&input.reference, &reference_key, order);

    let reference_coords = input.reference.coord_columns()?;
    let data_columns = input.reference.header().len().saturating_sub(1);
    if reference_coords.iter().any(|&c| c >= data_columns) {
        return Err(CompareError::malformed(
            TableRole::Reference,
            1,
            "last column is the tolerance and cannot be a coordinate column",
        ));
    }
    let reference = extract_tolerances(&reference_sorted)?;

    let exact = check_exact(&parallel, &serial)?;

    let mut pruned_rows = 0;
    let compared = if parallel.len() != reference.rows.len() {
        log::warn!(
            "parallel table has {} rows, reference has {}; pruning by position",
            parallel.len(),
            reference.rows.len()
        );
        let outcome = prune_rows(
            &parallel,
            input.parallel.coord_columns()?,
            TableRole::Parallel,
            &reference.rows,
            reference_coords,
            config.prune.policy,
            config.prune.position_epsilon,
        )?;
        pruned_rows = outcome.removed.len();
        outcome.rows
    } else {
        parallel
    };

    let tolerance = check_tolerance(
        &compared,
        &reference.rows,
        &reference.tolerances,
        input.parallel.header(),
        config.tolerance.relative_epsilon,
    )?;

    Ok(CompareReport {
        meta: CompareMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            config: config.clone(),
        },
        summary: CompareSummary {
            parallel_rows: input.parallel.len(),
            serial_rows: input.serial.len(),
            reference_rows: input.reference.len(),
            exact_rows_compared: exact.rows_compared,
            pruned_rows,
            tolerance_rows_compared: tolerance.rows_compared,
            fields_compared: tolerance.fields_compared,
        },
        sort_keys: SortKeys {
            parallel: parallel_key.names,
            serial: serial_key.names,
            reference: reference_key.names,
        },
    })
}
