// 📄 Document Export Engine
// Record / report → blocks → paginated layout → PDF, overlay on every page.

pub mod compose;
pub mod layout;
pub mod metrics;
pub mod pdf;
pub mod style;

use crate::atomic::write_atomically;
use crate::config::AppConfig;
use crate::error::{CommitteeError, CommitteeResult};
use crate::export::{ExportKind, ExportOutcome, ExportWarning, ATTENDANCE_TITLE, WEEKLY_REPORT_TITLE};
use crate::model::{AttendanceRecord, WeeklyReport};
use crate::overlay::Overlay;
use layout::{Block, PageLayout, Paginator};
use std::io::Write;
use std::path::{Path, PathBuf};
use style::PageGeometry;
use tracing::{info, warn};

/// A rendered document held in memory
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub pages: Vec<PageLayout>,
    pub warnings: Vec<ExportWarning>,
}

#[derive(Debug, Clone)]
pub struct DocumentExporter {
    geometry: PageGeometry,
    overlay_path: Option<PathBuf>,
    overlay_opacity: f32,
}

impl DocumentExporter {
    pub fn new(config: &AppConfig) -> Self {
        DocumentExporter {
            geometry: PageGeometry::letter(),
            overlay_path: config.overlay_path.clone(),
            overlay_opacity: config.overlay_opacity,
        }
    }

    pub fn render_attendance(&self, record: &AttendanceRecord) -> CommitteeResult<RenderedDocument> {
        self.render(ATTENDANCE_TITLE, &compose::attendance_blocks(record))
    }

    pub fn render_weekly_report(&self, report: &WeeklyReport) -> CommitteeResult<RenderedDocument> {
        self.render(WEEKLY_REPORT_TITLE, &compose::weekly_report_blocks(report))
    }

    pub fn export_attendance(&self, record: &AttendanceRecord, path: &Path) -> CommitteeResult<ExportOutcome> {
        let rendered = self.render_attendance(record)?;
        self.write(ExportKind::AttendancePdf, rendered, path)
    }

    pub fn export_weekly_report(&self, report: &WeeklyReport, path: &Path) -> CommitteeResult<ExportOutcome> {
        let rendered = self.render_weekly_report(report)?;
        self.write(ExportKind::WeeklyReportPdf, rendered, path)
    }

    fn render(&self, title: &str, blocks: &[Block]) -> CommitteeResult<RenderedDocument> {
        let (overlay, warning) = Overlay::load(self.overlay_path.as_deref(), self.overlay_opacity);

        let pages = Paginator::layout(self.geometry, blocks);
        let bytes = pdf::render_pdf(&pages, &self.geometry, overlay.as_ref(), title)?;

        Ok(RenderedDocument {
            bytes,
            pages,
            warnings: warning.into_iter().collect(),
        })
    }

    fn write(&self, kind: ExportKind, rendered: RenderedDocument, path: &Path) -> CommitteeResult<ExportOutcome> {
        write_atomically(path, |file| {
            file.write_all(&rendered.bytes)
                .map_err(|e| CommitteeError::io(path, e))
        })?;

        for warning in &rendered.warnings {
            warn!(path = %path.display(), "{}", warning);
        }
        info!(path = %path.display(), pages = rendered.pages.len(), "{} exported", kind.name());

        Ok(ExportOutcome {
            kind,
            path: path.to_path_buf(),
            pages: rendered.pages.len(),
            warnings: rendered.warnings,
        })
    }
}
