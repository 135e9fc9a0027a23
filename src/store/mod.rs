pub(crate) mod sheets;

#[cfg(test)]
pub(crate) mod memory;

use anyhow::Result;
use std::collections::HashMap;

/// One data row, keyed by the column names from the worksheet's header row.
pub(crate) type Record = HashMap<String, String>;

/// The four operations the core needs from a remote worksheet. The adapter
/// performs no validation; all type coercion happens above it.
pub(crate) trait TabularStore {
    fn append_row(&mut self, row: &[String]) -> Result<()>;
    fn read_all_rows(&mut self) -> Result<Vec<Record>>;
    fn clear(&mut self) -> Result<()>;
    fn append_rows(&mut self, rows: &[Vec<String>]) -> Result<()>;
}

/// Maps a raw grid to records: first row names the columns, later rows are
/// zipped against it positionally. Short rows pad with empty cells, extra
/// cells are dropped. A header-only (or empty) grid yields no records.
pub(crate) fn records_from_grid(grid: &[Vec<String>]) -> Vec<Record> {
    let Some(header) = grid.first() else {
        return Vec::new();
    };
    grid[1..]
        .iter()
        .map(|row| {
            header
                .iter()
                .enumerate()
                .map(|(i, name)| (name.trim().to_string(), row.get(i).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
}

/// Read result that degrades to a missing-schema signal instead of failing
/// when the header row has been edited out from under us.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Listing<T> {
    pub(crate) records: Vec<T>,
    pub(crate) missing_columns: Vec<String>,
}

impl<T> Listing<T> {
    pub(crate) fn empty() -> Self {
        Self {
            records: Vec::new(),
            missing_columns: Vec::new(),
        }
    }

    pub(crate) fn complete(records: Vec<T>) -> Self {
        Self {
            records,
            missing_columns: Vec::new(),
        }
    }

    pub(crate) fn degraded(missing_columns: Vec<String>) -> Self {
        Self {
            records: Vec::new(),
            missing_columns,
        }
    }

    pub(crate) fn schema_ok(&self) -> bool {
        self.missing_columns.is_empty()
    }
}

/// Expected column names absent from a record's keys.
pub(crate) fn missing_columns(record: &Record, expected: &[&str]) -> Vec<String> {
    expected
        .iter()
        .filter(|name| !record.contains_key(**name))
        .map(|name| name.to_string())
        .collect()
}

/// Cell lookup with the empty string standing in for an absent column.
pub(crate) fn cell(record: &Record, column: &str) -> String {
    record.get(column).cloned().unwrap_or_default()
}
