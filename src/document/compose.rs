// 🧾 Document composition - record / report → blocks

use super::layout::{Block, TableBlock, TextBlock};
use super::style::{TableStyle, TextStyle, ATTENDANCE_COLUMN_WIDTHS, INCH};
use crate::export::{ATTENDANCE_TITLE, COLUMN_HEADERS, WEEKLY_REPORT_TITLE};
use crate::model::{AttendanceRecord, WeeklyReport};

/// Shown when a weekly report body is empty
pub const EMPTY_REPORT_PLACEHOLDER: &str = "No weekly report content provided.";

fn subtitle(formatted_date: &str) -> Block {
    Block::Text(TextBlock::new(format!("Date: {}", formatted_date), TextStyle::subtitle()))
}

/// Title, date subtitle, then the banded attendance table
pub fn attendance_blocks(record: &AttendanceRecord) -> Vec<Block> {
    let table = TableBlock {
        column_widths: ATTENDANCE_COLUMN_WIDTHS.to_vec(),
        header: COLUMN_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows: record
            .entries
            .iter()
            .map(|entry| entry.cells().iter().map(|c| c.to_string()).collect())
            .collect(),
        style: TableStyle::default(),
    };

    vec![
        Block::Text(TextBlock::new(ATTENDANCE_TITLE, TextStyle::title())),
        subtitle(&record.formatted_date()),
        Block::Table(table),
        Block::Spacer(0.2 * INCH),
    ]
}

/// Title, date subtitle, then one left-aligned paragraph per blank-line
/// separated chunk of the body (or the placeholder when the body is empty)
pub fn weekly_report_blocks(report: &WeeklyReport) -> Vec<Block> {
    let mut blocks = vec![
        Block::Text(TextBlock::new(WEEKLY_REPORT_TITLE, TextStyle::title())),
        subtitle(&report.formatted_date()),
    ];

    let mut paragraphs = report.paragraphs();
    if paragraphs.is_empty() {
        paragraphs.push(vec![EMPTY_REPORT_PLACEHOLDER.to_string()]);
    }

    for lines in paragraphs {
        blocks.push(Block::Text(TextBlock::with_breaks(lines, TextStyle::body())));
        blocks.push(Block::Spacer(0.1 * INCH));
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::style::Align;
    use crate::model::{AttendanceEntry, AttendanceOption, ModeOption};
    use chrono::NaiveDate;

    /// Body paragraphs of composed report blocks (title and subtitle excluded)
    fn body_paragraphs(blocks: &[Block]) -> Vec<&TextBlock> {
        blocks
            .iter()
            .filter_map(|b| match b {
                Block::Text(t) if t.style == TextStyle::body() => Some(t),
                _ => None,
            })
            .collect()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    #[test]
    fn test_attendance_blocks_structure() {
        let mut record = AttendanceRecord::new(date());
        record.entries.push(AttendanceEntry {
            member_name: "Alice".into(),
            position: "Chair".into(),
            mode: ModeOption::Virtual,
            status: AttendanceOption::Absent,
        });

        let blocks = attendance_blocks(&record);
        match &blocks[0] {
            Block::Text(t) => {
                assert_eq!(t.lines, vec![ATTENDANCE_TITLE.to_string()]);
                assert_eq!(t.style.align, Align::Center);
            }
            other => panic!("unexpected block {:?}", other),
        }
        match &blocks[1] {
            Block::Text(t) => assert_eq!(t.lines, vec!["Date: 03/14/2024".to_string()]),
            other => panic!("unexpected block {:?}", other),
        }
        match &blocks[2] {
            Block::Table(t) => {
                assert_eq!(t.header, COLUMN_HEADERS.map(String::from).to_vec());
                assert_eq!(t.rows, vec![vec!["Alice", "Chair", "Virtual", "Absent"]
                    .into_iter()
                    .map(String::from)
                    .collect::<Vec<_>>()]);
            }
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn test_report_paragraphs_with_forced_breaks() {
        let report = WeeklyReport::new(date(), "Line1\nLine2\n\nLine3");
        let blocks = weekly_report_blocks(&report);
        let paragraphs = body_paragraphs(&blocks);

        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].lines, vec!["Line1".to_string(), "Line2".to_string()]);
        assert_eq!(paragraphs[0].forced_breaks(), 1);
        assert_eq!(paragraphs[1].lines, vec!["Line3".to_string()]);
        assert_eq!(paragraphs[1].style.align, Align::Left);
    }

    #[test]
    fn test_empty_report_gets_single_placeholder() {
        let report = WeeklyReport::new(date(), "   \n\n  ");
        let blocks = weekly_report_blocks(&report);
        let paragraphs = body_paragraphs(&blocks);

        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].lines, vec![EMPTY_REPORT_PLACEHOLDER.to_string()]);
    }
}
