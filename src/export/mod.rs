// 📤 Exports - shared names, file-name conventions, outcomes
//
// Exports only read a record or report. They never touch the roster.

pub mod tabular;

pub use tabular::{export_attendance_csv, write_attendance_csv};

use chrono::NaiveDate;
use std::fmt;
use std::path::{Path, PathBuf};

pub const ATTENDANCE_TITLE: &str = "Tech Fee Committee Attendance Record";
pub const WEEKLY_REPORT_TITLE: &str = "Tech Fee Committee Weekly Report";

/// Column headers shared by the CSV and the document table
pub const COLUMN_HEADERS: [&str; 4] = ["Member Name", "Position", "Virtual/In-Person", "Attendance"];

/// Date format used in export file names (MM-DD-YYYY)
pub const FILE_DATE_FORMAT: &str = "%m-%d-%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    AttendanceCsv,
    AttendancePdf,
    WeeklyReportPdf,
}

impl ExportKind {
    pub fn name(&self) -> &'static str {
        match self {
            ExportKind::AttendanceCsv => "attendance CSV",
            ExportKind::AttendancePdf => "attendance PDF",
            ExportKind::WeeklyReportPdf => "weekly report PDF",
        }
    }

    /// Conventional file name; `today` is the export date, not the record date
    pub fn file_name(&self, today: NaiveDate) -> String {
        let stamp = today.format(FILE_DATE_FORMAT);
        match self {
            ExportKind::AttendanceCsv => format!("Tech_Fee_Committee_Attendance_{}.csv", stamp),
            ExportKind::AttendancePdf => format!("Tech_Fee_Committee_Attendance_{}.pdf", stamp),
            ExportKind::WeeklyReportPdf => format!("Tech_Fee_Committee_Weekly_Report_{}.pdf", stamp),
        }
    }
}

/// Non-fatal problems reported alongside a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportWarning {
    /// Overlay image missing or unreadable; the document was rendered without it
    MissingAsset { path: PathBuf, reason: String },
}

impl fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportWarning::MissingAsset { path, reason } => {
                write!(f, "overlay image {} not used: {}", path.display(), reason)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub kind: ExportKind,
    pub path: PathBuf,
    /// Rendered pages; 0 for tabular exports
    pub pages: usize,
    pub warnings: Vec<ExportWarning>,
}

impl ExportOutcome {
    pub fn new(kind: ExportKind, path: &Path) -> Self {
        ExportOutcome {
            kind,
            path: path.to_path_buf(),
            pages: 0,
            warnings: Vec::new(),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_use_export_date() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(
            ExportKind::AttendanceCsv.file_name(today),
            "Tech_Fee_Committee_Attendance_03-05-2024.csv"
        );
        assert_eq!(
            ExportKind::AttendancePdf.file_name(today),
            "Tech_Fee_Committee_Attendance_03-05-2024.pdf"
        );
        assert_eq!(
            ExportKind::WeeklyReportPdf.file_name(today),
            "Tech_Fee_Committee_Weekly_Report_03-05-2024.pdf"
        );
    }

    #[test]
    fn test_missing_asset_warning_display() {
        let warning = ExportWarning::MissingAsset {
            path: PathBuf::from("/assets/seal.jpg"),
            reason: "file not found".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "overlay image /assets/seal.jpg not used: file not found"
        );
    }
}
