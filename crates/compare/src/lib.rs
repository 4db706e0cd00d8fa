//! `simcheck-compare`: tolerance-aware comparison of result tables.
//!
//! Pure engine crate: receives already-read tabular data (parallel result,
//! serial result, reference with per-row tolerances), returns a report or
//! the first violation found. No CLI or file-path handling.

pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod prune;
pub mod sort_key;
pub mod sorter;
pub mod table;
pub mod tolerance;

pub use config::CompareConfig;
pub use engine::run;
pub use error::{CompareError, ErrorKind, TableRole};
pub use model::{CompareInput, CompareReport};
pub use table::{Row, Table};
