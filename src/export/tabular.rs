// 📊 Tabular Export - attendance record → CSV
//
//   "Tech Fee Committee Attendance Record (MM/dd/yyyy)"
//   "Member Name","Position","Virtual/In-Person","Attendance"
//   <name>,<position>,<mode label>,<status label>
//
// Title and column headers are always quoted; data rows quote only when needed.
// Lines end in CRLF.

use super::{ExportKind, ExportOutcome, ATTENDANCE_TITLE, COLUMN_HEADERS};
use crate::atomic::write_atomically;
use crate::error::{CommitteeError, CommitteeResult, CSV_STREAM};
use crate::model::AttendanceRecord;
use csv::{QuoteStyle, WriterBuilder};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Serialize `record` into `sink`, handing the sink back when done
pub fn write_attendance_csv<W: Write>(record: &AttendanceRecord, sink: W) -> CommitteeResult<W> {
    let mut header = writer(QuoteStyle::Always, sink);
    header.write_record([format!("{} ({})", ATTENDANCE_TITLE, record.formatted_date())])?;
    header.write_record(COLUMN_HEADERS)?;
    let sink = header
        .into_inner()
        .map_err(|e| CommitteeError::io(CSV_STREAM, e.into_error()))?;

    let mut body = writer(QuoteStyle::Necessary, sink);
    for entry in &record.entries {
        body.write_record(entry.cells())?;
    }
    let sink = body
        .into_inner()
        .map_err(|e| CommitteeError::io(CSV_STREAM, e.into_error()))?;

    Ok(sink)
}

/// Write the CSV to `path`; the destination only appears once fully written
pub fn export_attendance_csv(record: &AttendanceRecord, path: &Path) -> CommitteeResult<ExportOutcome> {
    let bytes = write_attendance_csv(record, Vec::new())?;

    write_atomically(path, |file| {
        file.write_all(&bytes).map_err(|e| CommitteeError::io(path, e))
    })?;

    info!(path = %path.display(), entries = record.len(), "attendance CSV exported");
    Ok(ExportOutcome::new(ExportKind::AttendanceCsv, path))
}

fn writer<W: Write>(style: QuoteStyle, sink: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .flexible(true)
        .quote_style(style)
        .from_writer(sink)
}
