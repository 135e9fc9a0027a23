use anyhow::{Context, Result};

use crate::models::{Attendance, Guest};
use crate::store::{cell, missing_columns, Listing, Record, TabularStore};

/// Column order of the Guests worksheet. The sheet's first row is the
/// schema; data rows are mapped to these names at read time.
pub(crate) const GUEST_COLUMNS: [&str; 4] = ["Nome", "Categoria", "Acompanhantes", "Presença"];

pub(crate) struct GuestRegistry<S: TabularStore> {
    store: S,
}

impl<S: TabularStore> GuestRegistry<S> {
    pub(crate) fn new(store: S) -> Self {
        Self { store }
    }

    /// Appends one guest row. An empty or whitespace name is silently
    /// rejected: returns Ok(false) and nothing is persisted. Duplicate names
    /// are allowed. Assumes the header row exists (see `init_header`).
    pub(crate) fn add_guest(&mut self, guest: &Guest) -> Result<bool> {
        if guest.name.trim().is_empty() {
            return Ok(false);
        }
        self.store.append_row(&guest_row(guest))?;
        Ok(true)
    }

    /// Reads the whole worksheet. An empty sheet is an empty listing; a
    /// sheet whose header row lost expected columns degrades to a
    /// missing-schema listing instead of failing.
    pub(crate) fn list_guests(&mut self) -> Result<Listing<Guest>> {
        let records = self.store.read_all_rows()?;
        let Some(first) = records.first() else {
            return Ok(Listing::empty());
        };
        let missing = missing_columns(first, &GUEST_COLUMNS);
        if !missing.is_empty() {
            return Ok(Listing::degraded(missing));
        }
        Ok(Listing::complete(records.iter().map(guest_from_record).collect()))
    }

    /// Clears the worksheet and rewrites header + all rows. A guest omitted
    /// from `guests` is gone afterwards; this is the only delete/update
    /// mechanism. Not atomic across processes: a concurrent reader can
    /// observe an empty sheet between the clear and the rewrite.
    pub(crate) fn replace_all_guests(&mut self, guests: &[Guest]) -> Result<()> {
        let mut rows = Vec::with_capacity(guests.len() + 1);
        rows.push(header_row());
        rows.extend(guests.iter().map(guest_row));
        self.store.clear()?;
        self.store.append_rows(&rows)
    }

    /// Provisions (or resets) the worksheet to just its header row.
    pub(crate) fn init_header(&mut self) -> Result<()> {
        self.replace_all_guests(&[])
    }
}

fn header_row() -> Vec<String> {
    GUEST_COLUMNS.iter().map(|c| c.to_string()).collect()
}

fn guest_row(guest: &Guest) -> Vec<String> {
    vec![
        guest.name.clone(),
        guest.category.clone(),
        guest.companions.to_string(),
        guest.attendance.as_str().to_string(),
    ]
}

/// Read-time coercion is permissive by policy: a companion count that fails
/// to parse becomes 0, an unknown attendance becomes Pending.
fn guest_from_record(record: &Record) -> Guest {
    Guest::new(
        cell(record, GUEST_COLUMNS[0]),
        cell(record, GUEST_COLUMNS[1]),
        cell(record, GUEST_COLUMNS[2]).trim().parse().unwrap_or(0),
        Attendance::parse(&cell(record, GUEST_COLUMNS[3])),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GuestSummary {
    pub(crate) invitations: usize,
    pub(crate) total_people: u64,
    pub(crate) confirmed_people: u64,
}

/// Headcounts: every invitation seats `1 + companions` people; confirmed
/// counts only invitations whose attendance is Yes.
pub(crate) fn summarize(guests: &[Guest]) -> GuestSummary {
    GuestSummary {
        invitations: guests.len(),
        total_people: guests.iter().map(|g| u64::from(g.party_size())).sum(),
        confirmed_people: guests
            .iter()
            .filter(|g| g.is_confirmed())
            .map(|g| u64::from(g.party_size()))
            .sum(),
    }
}

/// Serializes guests to a UTF-8 CSV blob: header row + one row per guest.
/// Export only; there is no import path.
pub(crate) fn guests_to_csv(guests: &[Guest]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(GUEST_COLUMNS)
        .context("Failed to write CSV header")?;
    for guest in guests {
        wtr.write_record(guest_row(guest))
            .context("Failed to write CSV row")?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

#[cfg(test)]
mod tests;
