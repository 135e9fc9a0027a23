use anyhow::Result;

use super::{records_from_grid, Record, TabularStore};

/// In-memory stand-in for a remote worksheet. Test backend only.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    grid: Vec<Vec<String>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_grid(grid: Vec<Vec<String>>) -> Self {
        Self { grid }
    }

    pub(crate) fn grid(&self) -> &[Vec<String>] {
        &self.grid
    }
}

impl TabularStore for MemoryStore {
    fn append_row(&mut self, row: &[String]) -> Result<()> {
        self.grid.push(row.to_vec());
        Ok(())
    }

    fn read_all_rows(&mut self) -> Result<Vec<Record>> {
        Ok(records_from_grid(&self.grid))
    }

    fn clear(&mut self) -> Result<()> {
        self.grid.clear();
        Ok(())
    }

    fn append_rows(&mut self, rows: &[Vec<String>]) -> Result<()> {
        self.grid.extend(rows.iter().cloned());
        Ok(())
    }
}
