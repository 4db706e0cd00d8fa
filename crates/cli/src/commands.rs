//! `simcheck` subcommands. File reading and printing only; all comparison
//! logic lives in `simcheck-compare`.

use std::path::{Path, PathBuf};

use simcheck_compare::prune::PrunePolicy;
use simcheck_compare::sort_key::select_sort_key;
use simcheck_compare::sorter::{sort_table, SortOrder};
use simcheck_compare::{CompareConfig, CompareError, CompareInput, ErrorKind, Table, TableRole};

use crate::exit_codes::{compare_exit_code, CliErrorOutput, CompareErrorOutput};
use crate::CliError;

pub struct CompareArgs {
    pub parallel: PathBuf,
    pub serial: PathBuf,
    pub reference: PathBuf,
    pub config: Option<PathBuf>,
    pub prune_policy: Option<PrunePolicy>,
    pub sort_order: Option<SortOrder>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub quiet: bool,
}

// ============================================================================
// compare
// ============================================================================

pub fn cmd_compare(args: CompareArgs) -> Result<(), CliError> {
    let json = args.json;
    compare_tables(args).map_err(|e| {
        // Comparison errors were already printed as JSON and come back silent.
        if json && !e.message.is_empty() {
            CliErrorOutput::new(e.code, &e.message, e.hint.as_deref()).print();
            CliError::silent(e.code)
        } else {
            e
        }
    })
}

fn compare_tables(args: CompareArgs) -> Result<(), CliError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => CompareConfig::default(),
    };
    if let Some(policy) = args.prune_policy {
        config.prune.policy = policy;
    }
    if let Some(order) = args.sort_order {
        config.sort.order = order;
    }

    let input = CompareInput {
        parallel: read_table(&args.parallel, TableRole::Parallel)
            .map_err(|e| report_failure(e, args.json))?,
        serial: read_table(&args.serial, TableRole::Serial).map_err(|e| report_failure(e, args.json))?,
        reference: read_table(&args.reference, TableRole::Reference)
            .map_err(|e| report_failure(e, args.json))?,
    };

    let report = simcheck_compare::run(&config, &input)
        .map_err(|e| report_failure(e.into(), args.json))?;

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
        if !args.quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if args.json {
        println!("{json_str}");
    } else if !args.quiet {
        println!("files are identical");
        println!("results are correct");
        let s = &report.summary;
        eprintln!(
            "{} rows compared verbatim, {} rows within tolerance ({} fields), {} rows pruned",
            s.exact_rows_compared, s.tolerance_rows_compared, s.fields_compared, s.pruned_rows,
        );
    }

    Ok(())
}

/// Turn a comparison failure into a `CliError`, printing the JSON form
/// first when requested.
fn report_failure(err: CliFailure, json: bool) -> CliError {
    match err {
        CliFailure::Cli(e) => e,
        CliFailure::Compare(e) => {
            let code = compare_exit_code(&e);
            if json {
                CompareErrorOutput::from_compare_error(&e).print();
                return CliError::silent(code);
            }
            let cli_err = CliError::new(code, e.to_string());
            match e.kind() {
                ErrorKind::ShapeMismatch => {
                    cli_err.with_hint("check your reference csv-file, or try --prune-policy")
                }
                ErrorKind::ExactMismatch => {
                    cli_err.with_hint("parallel and serial runs must produce identical output")
                }
                _ => cli_err,
            }
        }
    }
}

/// Either a failure already expressed as a CLI error (I/O) or a comparison
/// error that still needs its exit code and rendering.
enum CliFailure {
    Cli(CliError),
    Compare(CompareError),
}

impl From<CompareError> for CliFailure {
    fn from(e: CompareError) -> Self {
        Self::Compare(e)
    }
}

impl From<CliError> for CliFailure {
    fn from(e: CliError) -> Self {
        Self::Cli(e)
    }
}

fn read_table(path: &Path, role: TableRole) -> Result<Table, CliFailure> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
    log::debug!("{role} table: read {} bytes from {}", content.len(), path.display());
    Ok(Table::from_csv_str(role, &content)?)
}

fn load_config(path: &Path) -> Result<CompareConfig, CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
    CompareConfig::from_toml(&content)
        .map_err(|e| CliError::config(format!("{}: {e}", path.display())))
}

// ============================================================================
// sort
// ============================================================================

pub fn cmd_sort(
    file: PathBuf,
    role: TableRole,
    order: SortOrder,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let table = read_table(&file, role).map_err(|e| report_failure(e, false))?;
    let key = select_sort_key(&table).map_err(|e| report_failure(e.into(), false))?;
    let sorted = sort_table(&table, &key, order);
    let csv = sorted.to_csv_string().map_err(|e| CliError::general(e.to_string()))?;

    match output {
        Some(path) => std::fs::write(&path, csv)
            .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display()))),
        None => {
            print!("{csv}");
            Ok(())
        }
    }
}

// ============================================================================
// key
// ============================================================================

pub fn cmd_key(file: PathBuf, json: bool) -> Result<(), CliError> {
    let table = read_table(&file, TableRole::Reference).map_err(|e| report_failure(e, false))?;
    let key = select_sort_key(&table).map_err(|e| report_failure(e.into(), false))?;

    if json {
        let out = serde_json::to_string_pretty(&key)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{out}");
    } else {
        println!("{}", key.names.join(","));
    }
    Ok(())
}

// ============================================================================
// config validate
// ============================================================================

pub fn cmd_config_validate(file: PathBuf) -> Result<(), CliError> {
    let config = load_config(&file)?;
    eprintln!(
        "config ok: prune policy {}, position epsilon {:e}, sort order {}",
        config.prune.policy, config.prune.position_epsilon, config.sort.order
    );
    Ok(())
}
