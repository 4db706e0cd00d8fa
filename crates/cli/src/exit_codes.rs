//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: test harnesses branch on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Domain    | Description                                    |
//! |------|-----------|------------------------------------------------|
//! | 0    | Universal | Comparison passed / command succeeded          |
//! | 1    | Universal | General error (unspecified)                    |
//! | 2    | Universal | CLI usage error (bad args)                     |
//! | 3    | compare   | Malformed input (ragged row, non-numeric field)|
//! | 4    | compare   | Shape mismatch (row or field counts differ)    |
//! | 5    | compare   | Parallel and serial results differ verbatim    |
//! | 6    | compare   | Result outside reference tolerance             |
//! | 7    | Universal | I/O error (unreadable input, unwritable output)|
//! | 8    | Universal | Invalid config file                            |

use serde::Serialize;
use simcheck_compare::{CompareError, ErrorKind};

// =============================================================================
// Universal
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
/// clap exits with this code on its own.
pub const EXIT_USAGE: u8 = 2;

/// Input or output file could not be read or written.
pub const EXIT_IO: u8 = 7;

/// Config file failed to parse or validate.
pub const EXIT_CONFIG: u8 = 8;

// =============================================================================
// Compare (3-6)
// =============================================================================

/// A table is not well formed (ragged row, missing column, unparseable number).
pub const EXIT_MALFORMED_INPUT: u8 = 3;

/// Row sequences or rows of incompatible length reached the comparison.
pub const EXIT_SHAPE_MISMATCH: u8 = 4;

/// Parallel and serial results are not byte-identical.
pub const EXIT_EXACT_MISMATCH: u8 = 5;

/// A result field is farther from the reference than the row's tolerance.
pub const EXIT_TOLERANCE_EXCEEDED: u8 = 6;

/// Map a comparison error to its exit code.
pub fn compare_exit_code(err: &CompareError) -> u8 {
    match err.kind() {
        ErrorKind::MalformedInput => EXIT_MALFORMED_INPUT,
        ErrorKind::ShapeMismatch => EXIT_SHAPE_MISMATCH,
        ErrorKind::ExactMismatch => EXIT_EXACT_MISMATCH,
        ErrorKind::ToleranceExceeded => EXIT_TOLERANCE_EXCEEDED,
        ErrorKind::Config => EXIT_CONFIG,
    }
}

/// Structured error output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct CompareErrorOutput<'a> {
    pub error: &'static str,
    pub message: String,
    pub exit_code: u8,
    pub detail: &'a CompareError,
}

impl<'a> CompareErrorOutput<'a> {
    pub fn from_compare_error(err: &'a CompareError) -> Self {
        Self {
            error: err.kind().as_str(),
            message: err.to_string(),
            exit_code: compare_exit_code(err),
            detail: err,
        }
    }

    /// Print to stdout as one JSON object.
    pub fn print(&self) {
        if let Ok(output) = serde_json::to_string_pretty(self) {
            println!("{}", output);
        }
    }
}

/// Stable tag for exit codes that are not tied to a comparison error.
pub fn exit_code_name(code: u8) -> &'static str {
    match code {
        EXIT_SUCCESS => "success",
        EXIT_USAGE => "usage",
        EXIT_IO => "io",
        EXIT_CONFIG => "config",
        EXIT_MALFORMED_INPUT => "malformed_input",
        EXIT_SHAPE_MISMATCH => "shape_mismatch",
        EXIT_EXACT_MISMATCH => "exact_mismatch",
        EXIT_TOLERANCE_EXCEEDED => "tolerance_exceeded",
        _ => "error",
    }
}

/// `--json` output for failures raised by the CLI itself (file access,
/// config loading). Same top-level fields as `CompareErrorOutput`.
#[derive(Debug, Serialize)]
pub struct CliErrorOutput<'a> {
    pub error: &'static str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'a str>,
    pub exit_code: u8,
}

impl<'a> CliErrorOutput<'a> {
    pub fn new(code: u8, message: &'a str, hint: Option<&'a str>) -> Self {
        Self {
            error: exit_code_name(code),
            message,
            hint,
            exit_code: code,
        }
    }

    /// Print to stdout as one JSON object.
    pub fn print(&self) {
        if let Ok(output) = serde_json::to_string_pretty(self) {
            println!("{}", output);
        }
    }
}
