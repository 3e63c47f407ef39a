// Committee Attendance - Core Library
// Roster persistence, attendance record building, CSV / PDF exports.
// Used by the CLI and the terminal form; no UI types in here.

pub mod atomic;
pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod form;
pub mod model;
pub mod overlay;
pub mod roster;
pub mod service;

// Re-export commonly used types
pub use builder::{build_attendance, BuiltAttendance, RawRow};
pub use config::AppConfig;
pub use document::{DocumentExporter, RenderedDocument};
pub use error::{CommitteeError, CommitteeResult, ValidationError};
pub use export::{export_attendance_csv, write_attendance_csv, ExportKind, ExportOutcome, ExportWarning};
pub use form::{FormRows, DEFAULT_FORM_ROWS};
pub use model::{
    parse_date, AttendanceEntry, AttendanceOption, AttendanceRecord, Member, ModeOption, Roster,
    WeeklyReport,
};
pub use overlay::{Overlay, OverlayImage, OverlayPlacement};
pub use roster::RosterStore;
pub use service::CommitteeService;
