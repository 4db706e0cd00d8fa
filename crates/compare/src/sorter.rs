use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::sort_key::SortKey;
use crate::table::{Row, Table};

/// How key fields are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Byte-wise comparison of the on-disk text. Reference data is
    /// generated with this order, so it is the default.
    #[default]
    Text,
    /// Compare as `f64` (total order). Fields that parse sort before fields
    /// that do not; the latter compare as text among themselves. Numeric
    /// ties ("1" vs "1.0") are broken by text.
    Numeric,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Numeric => write!(f, "numeric"),
        }
    }
}

/// Sorted copy of the table's rows. Stable: rows equal on every key column
/// keep their input order.
pub fn sort_rows(table: &Table, key: &SortKey, order: SortOrder) -> Vec<Row> {
    let mut rows = table.rows().to_vec();
    rows.sort_by(|a, b| compare_by_key(a, b, &key.columns, order));
    rows
}

/// Sorted copy of the whole table.
pub fn sort_table(table: &Table, key: &SortKey, order: SortOrder) -> Table {
    table.with_rows(sort_rows(table, key, order))
}

pub fn compare_by_key(a: &Row, b: &Row, columns: &[usize], order: SortOrder) -> Ordering {
    for &col in columns {
        let ord = compare_field(&a[col], &b[col], order);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn compare_field(a: &str, b: &str, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Text => a.cmp(b),
        SortOrder::Numeric => match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
            (Ok(x), Ok(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => a.cmp(b),
        },
    }
}
