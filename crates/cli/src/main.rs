// simcheck - verify parallel vs. serial simulation results against reference data

mod commands;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use simcheck_compare::prune::PrunePolicy;
use simcheck_compare::sorter::SortOrder;
use simcheck_compare::TableRole;

use exit_codes::{EXIT_CONFIG, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "simcheck")]
#[command(about = "Compare parallel and serial result tables against tolerance-annotated reference data")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log pipeline stages (equivalent to RUST_LOG=debug)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full comparison: parallel == serial verbatim, parallel ~ reference within tolerance
    #[command(after_help = "\
Examples:
  simcheck compare par.csv ser.csv reference.csv
  simcheck compare par.csv ser.csv reference.csv --json
  simcheck compare par.csv ser.csv reference.csv --config simcheck.toml --output report.json
  simcheck compare par.csv ser.csv reference.csv --sort-order numeric

Exit codes:
  0 pass, 3 malformed input, 4 shape mismatch, 5 parallel/serial differ,
  6 tolerance exceeded, 7 I/O error, 8 invalid config")]
    Compare {
        /// Result table from the parallel run
        parallel: PathBuf,

        /// Result table from the serial run
        serial: PathBuf,

        /// Reference table; last column is the per-row tolerance
        reference: PathBuf,

        /// TOML config file
        #[arg(long, env = "SIMCHECK_CONFIG")]
        config: Option<PathBuf>,

        /// Which parallel rows to drop when its row count differs from the reference
        #[arg(long, value_name = "POLICY")]
        prune_policy: Option<PrunePolicyArg>,

        /// How sort-key fields are compared
        #[arg(long, value_name = "ORDER")]
        sort_order: Option<SortOrderArg>,

        /// Print the report (or error) as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Suppress progress messages
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Write a table sorted by its canonical key
    #[command(after_help = "\
Examples:
  simcheck sort reference.csv -o reference.sorted.csv
  simcheck sort par.csv --role parallel --order numeric")]
    Sort {
        /// Table to sort
        file: PathBuf,

        /// Role used in diagnostics
        #[arg(long, default_value = "reference")]
        role: RoleArg,

        /// How sort-key fields are compared
        #[arg(long, default_value = "text")]
        order: SortOrderArg,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show the sort key selected for a table's header
    Key {
        /// Table whose header is inspected
        file: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Config file commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Parse and validate a config file without running a comparison
    Validate {
        /// Path to the TOML config
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PrunePolicyArg {
    /// Drop rows with no reference row at the same position
    Unmatched,
    /// Drop rows that do have a reference row at the same position
    Matched,
}

impl From<PrunePolicyArg> for PrunePolicy {
    fn from(arg: PrunePolicyArg) -> Self {
        match arg {
            PrunePolicyArg::Unmatched => PrunePolicy::Unmatched,
            PrunePolicyArg::Matched => PrunePolicy::Matched,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortOrderArg {
    /// Compare raw text byte by byte
    Text,
    /// Compare as numbers where both fields parse
    Numeric,
}

impl From<SortOrderArg> for SortOrder {
    fn from(arg: SortOrderArg) -> Self {
        match arg {
            SortOrderArg::Text => SortOrder::Text,
            SortOrderArg::Numeric => SortOrder::Numeric,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Parallel,
    Serial,
    Reference,
}

impl From<RoleArg> for TableRole {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Parallel => TableRole::Parallel,
            RoleArg::Serial => TableRole::Serial,
            RoleArg::Reference => TableRole::Reference,
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  simcheck-compare ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compare {
            parallel,
            serial,
            reference,
            config,
            prune_policy,
            sort_order,
            json,
            output,
            quiet,
        } => commands::cmd_compare(commands::CompareArgs {
            parallel,
            serial,
            reference,
            config,
            prune_policy: prune_policy.map(Into::into),
            sort_order: sort_order.map(Into::into),
            json,
            output,
            quiet,
        }),
        Commands::Sort { file, role, order, output } => {
            commands::cmd_sort(file, role.into(), order.into(), output)
        }
        Commands::Key { file, json } => commands::cmd_key(file, json),
        Commands::Config(ConfigCommands::Validate { file }) => commands::cmd_config_validate(file),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_IO, msg)
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(EXIT_CONFIG, msg)
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    /// Exit code already reported on stdout; print nothing more.
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
