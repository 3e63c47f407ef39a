// 🧱 Attendance Record Builder
// Raw form rows → validated AttendanceRecord + roster replacement.
//
// The roster replacement is derived from the submitted rows only. Members
// missing from the submission are dropped on the next save (last write wins).
// Callers wanting an accretive roster use Roster::merged_with before saving.

use crate::error::ValidationError;
use crate::model::{AttendanceEntry, AttendanceOption, AttendanceRecord, Member, ModeOption, Roster};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One row as the form surface hands it over: four free-text fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub status: String,
}

impl RawRow {
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        mode: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        RawRow {
            name: name.into(),
            position: position.into(),
            mode: mode.into(),
            status: status.into(),
        }
    }

    /// Row for a known member with the form's preselected options
    pub fn for_member(member: &Member) -> Self {
        RawRow::new(
            member.name.clone(),
            member.position.clone(),
            ModeOption::default().label(),
            AttendanceOption::default().label(),
        )
    }

    pub fn blank() -> Self {
        RawRow::for_member(&Member::new("", ""))
    }

    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.position.trim().is_empty()
    }
}

/// Successful build: the record plus the roster that should replace the stored one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltAttendance {
    pub record: AttendanceRecord,
    pub roster: Roster,
}

/// Validate `rows` in order. The first row with a position but no name
/// aborts the whole build; nothing partial is returned.
pub fn build_attendance(date: NaiveDate, rows: &[RawRow]) -> Result<BuiltAttendance, ValidationError> {
    let mut record = AttendanceRecord::new(date);
    let mut roster = Roster::new();

    for (index, row) in rows.iter().enumerate() {
        let name = row.name.trim();
        let position = row.position.trim();

        if name.is_empty() && position.is_empty() {
            continue;
        }
        if name.is_empty() {
            return Err(ValidationError::IncompleteMember { row: index + 1 });
        }

        record.entries.push(AttendanceEntry {
            member_name: name.to_string(),
            position: position.to_string(),
            mode: parse_or_default(&row.mode, index),
            status: parse_or_default(&row.status, index),
        });
        roster.push(Member::new(name, position));
    }

    debug!(date = %date, entries = record.entries.len(), "attendance record built");
    Ok(BuiltAttendance { record, roster })
}

fn parse_or_default<T>(value: &str, index: usize) -> T
where
    T: std::str::FromStr + Default,
    T::Err: std::fmt::Display,
{
    match value.parse() {
        Ok(option) => option,
        Err(e) => {
            if !value.trim().is_empty() {
                warn!(row = index + 1, "{}; using the default option", e);
            }
            T::default()
        }
    }
}
