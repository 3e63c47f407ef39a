// 📝 Form rows - the grid the form surface edits
// Seeded from the roster, padded with blank rows. No UI types in here.

use crate::builder::RawRow;
use crate::error::{CommitteeError, CommitteeResult};
use crate::model::Roster;
use std::fs::File;
use std::path::Path;

/// Rows shown by the form before anything is typed
pub const DEFAULT_FORM_ROWS: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormRows {
    rows: Vec<RawRow>,
}

impl FormRows {
    /// One row per roster member, then blank rows up to `min_rows`
    pub fn seeded_from(roster: &Roster, min_rows: usize) -> Self {
        let mut rows: Vec<RawRow> = roster.iter().map(RawRow::for_member).collect();
        while rows.len() < min_rows {
            rows.push(RawRow::blank());
        }
        FormRows { rows }
    }

    /// Rows from a CSV file with `name,position,mode,status` headers
    pub fn from_csv_path(path: &Path) -> CommitteeResult<Self> {
        let file = File::open(path).map_err(|e| CommitteeError::io(path, e))?;
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(file);

        let mut rows = Vec::new();
        for result in rdr.deserialize() {
            let row: RawRow = result.map_err(|e| CommitteeError::csv_at(path, e))?;
            rows.push(row);
        }

        Ok(FormRows { rows })
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut RawRow> {
        self.rows.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a blank row, returning its index
    pub fn add_row(&mut self) -> usize {
        self.rows.push(RawRow::blank());
        self.rows.len() - 1
    }

    /// Remove the last row; None when there is nothing to remove
    pub fn remove_last(&mut self) -> Option<RawRow> {
        self.rows.pop()
    }
}
