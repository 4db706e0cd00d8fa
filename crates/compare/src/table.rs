// Header + rows of raw string fields, parsed from comma-separated text.

use std::io::Read;

use crate::error::{CompareError, TableRole};

/// One data row. Field meaning comes from the owning table's header.
pub type Row = Vec<String>;

/// Spatial coordinate columns every table must carry.
pub const COORD_COLUMNS: [&str; 3] = ["Points:0", "Points:1", "Points:2"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    role: TableRole,
    header: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table from already-split fields. Every row must match the
    /// header's field count.
    pub fn new(role: TableRole, header: Vec<String>, rows: Vec<Row>) -> Result<Self, CompareError> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != header.len() {
                return Err(CompareError::malformed(
                    role,
                    i + 2,
                    format!(
                        "row has {} fields, header has {}",
                        row.len(),
                        header.len()
                    ),
                ));
            }
        }
        Ok(Self { role, header, rows })
    }

    pub fn from_csv_str(role: TableRole, input: &str) -> Result<Self, CompareError> {
        Self::from_reader(role, input.as_bytes())
    }

    pub fn from_reader<R: Read>(role: TableRole, reader: R) -> Result<Self, CompareError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = reader.records();

        let header: Vec<String> = match records.next() {
            Some(record) => record
                .map_err(|e| CompareError::malformed(role, 1, e.to_string()))?
                .iter()
                .map(|h| h.to_string())
                .collect(),
            None => return Err(CompareError::malformed(role, 0, "missing header row")),
        };

        let mut rows = Vec::new();
        for record in records {
            let record = record.map_err(|e| {
                let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
                CompareError::malformed(role, line, e.to_string())
            })?;
            let line = record.position().map(|p| p.line() as usize).unwrap_or(rows.len() + 2);
            if record.len() != header.len() {
                return Err(CompareError::malformed(
                    role,
                    line,
                    format!("row has {} fields, header has {}", record.len(), header.len()),
                ));
            }
            rows.push(record.iter().map(|f| f.to_string()).collect());
        }

        Ok(Self { role, header, rows })
    }

    pub fn role(&self) -> TableRole {
        self.role
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column with this exact name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn require_column(&self, name: &str) -> Result<usize, CompareError> {
        self.column(name).ok_or_else(|| {
            CompareError::malformed(self.role, 1, format!("missing column '{name}'"))
        })
    }

    /// Indices of `Points:0..2`, in that order.
    pub fn coord_columns(&self) -> Result<[usize; 3], CompareError> {
        Ok([
            self.require_column(COORD_COLUMNS[0])?,
            self.require_column(COORD_COLUMNS[1])?,
            self.require_column(COORD_COLUMNS[2])?,
        ])
    }

    /// Same header, rows replaced (e.g. by a sorted copy).
    pub fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            role: self.role,
            header: self.header.clone(),
            rows,
        }
    }

    pub fn to_csv_string(&self) -> Result<String, CompareError> {
        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
        let io_err = |e: csv::Error| CompareError::malformed(self.role, 0, e.to_string());
        writer.write_record(&self.header).map_err(io_err)?;
        for row in &self.rows {
            writer.write_record(row).map_err(io_err)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| CompareError::malformed(self.role, 0, e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| CompareError::malformed(self.role, 0, e.to_string()))
    }
}
