use serde::Serialize;
use thiserror::Error;

/// Which input a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableRole {
    Parallel,
    Serial,
    Reference,
}

impl std::fmt::Display for TableRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parallel => write!(f, "parallel"),
            Self::Serial => write!(f, "serial"),
            Self::Reference => write!(f, "reference"),
        }
    }
}

/// Stable tag for each failure class. Drives exit codes and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedInput,
    ShapeMismatch,
    ExactMismatch,
    ToleranceExceeded,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedInput => "malformed_input",
            Self::ShapeMismatch => "shape_mismatch",
            Self::ExactMismatch => "exact_mismatch",
            Self::ToleranceExceeded => "tolerance_exceeded",
            Self::Config => "config",
        }
    }
}

/// Every fatal condition of a comparison run.
///
/// Row and column indices are 0-based positions in the canonically sorted
/// sequences, i.e. the order the comparison actually walked.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompareError {
    #[error("{table} table{}: {message}", line_suffix(.line))]
    MalformedInput {
        table: TableRole,
        /// 1-based line in the source text, 0 when not tied to a line.
        line: usize,
        message: String,
    },

    #[error("{message}: {left} has {left_len}, {right} has {right_len}")]
    ShapeMismatch {
        left: TableRole,
        right: TableRole,
        left_len: usize,
        right_len: usize,
        message: String,
    },

    #[error("result tables are not equal at row {row}:\n  parallel: {}\n  serial:   {}", .parallel.join(","), .serial.join(","))]
    ExactMismatch {
        row: usize,
        parallel: Vec<String>,
        serial: Vec<String>,
    },

    #[error(
        "results are NOT correct at row {row}, column {} ({column_name}): |{actual} - {expected}| > {tolerance}\n  reference: {}\n  actual:    {}",
        .column + 1,
        .reference_row.join(","),
        .actual_row.join(",")
    )]
    ToleranceExceeded {
        row: usize,
        column: usize,
        column_name: String,
        expected: String,
        actual: String,
        tolerance: f64,
        reference_row: Vec<String>,
        actual_row: Vec<String>,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

impl CompareError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            Self::ExactMismatch { .. } => ErrorKind::ExactMismatch,
            Self::ToleranceExceeded { .. } => ErrorKind::ToleranceExceeded,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub(crate) fn malformed(table: TableRole, line: usize, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            table,
            line,
            message: message.into(),
        }
    }
}

/// Errors found after sorting are not tied to a source line.
fn line_suffix(line: &usize) -> String {
    if *line == 0 {
        String::new()
    } else {
        format!(", line {line}")
    }
}
