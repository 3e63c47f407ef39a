// 🏛️ Committee Service - the engine facade the form surface talks to
//
// Holds the config, the roster store and the current roster (loaded once).
// Save = build + persist derived roster. Exports build the record too (so the
// same validation applies) but never write the roster.

use crate::builder::{build_attendance, RawRow};
use crate::config::AppConfig;
use crate::document::DocumentExporter;
use crate::error::CommitteeResult;
use crate::export::{export_attendance_csv, ExportKind, ExportOutcome};
use crate::model::{AttendanceRecord, Roster, WeeklyReport};
use crate::roster::RosterStore;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct CommitteeService {
    config: AppConfig,
    store: RosterStore,
    roster: Roster,
    documents: DocumentExporter,
}

impl CommitteeService {
    /// Validate config and load the roster (missing file = empty roster)
    pub fn open(config: AppConfig) -> CommitteeResult<Self> {
        config.validate()?;
        let store = RosterStore::new(config.roster_path.clone());
        let roster = store.load()?;
        let documents = DocumentExporter::new(&config);

        Ok(CommitteeService {
            config,
            store,
            roster,
            documents,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Build the record and replace the stored roster with the submitted members.
    /// A validation failure saves nothing; the in-memory roster only changes
    /// once the file has been written.
    pub fn save_attendance(&mut self, date: NaiveDate, rows: &[RawRow]) -> CommitteeResult<AttendanceRecord> {
        let built = build_attendance(date, rows)?;
        self.store.save(&built.roster)?;
        self.roster = built.roster;

        info!(date = %date, entries = built.record.len(), "attendance saved");
        Ok(built.record)
    }

    /// Build a record without persisting anything
    pub fn preview_record(&self, date: NaiveDate, rows: &[RawRow]) -> CommitteeResult<AttendanceRecord> {
        Ok(build_attendance(date, rows)?.record)
    }

    pub fn export_csv(&self, date: NaiveDate, rows: &[RawRow], path: &Path) -> CommitteeResult<ExportOutcome> {
        let record = self.preview_record(date, rows)?;
        export_attendance_csv(&record, path)
    }

    pub fn export_attendance_pdf(&self, date: NaiveDate, rows: &[RawRow], path: &Path) -> CommitteeResult<ExportOutcome> {
        let record = self.preview_record(date, rows)?;
        self.documents.export_attendance(&record, path)
    }

    pub fn export_weekly_report_pdf(&self, report: &WeeklyReport, path: &Path) -> CommitteeResult<ExportOutcome> {
        self.documents.export_weekly_report(report, path)
    }

    /// `output_dir` joined with the conventional file name for `kind`
    pub fn default_destination(&self, kind: ExportKind, today: NaiveDate) -> PathBuf {
        self.config.output_dir.join(kind.file_name(today))
    }
}
