// 📋 Data Model - Roster, attendance snapshot, weekly report
//
// Member identity is the name. A Roster is the *current* list of known
// members; an AttendanceRecord is one meeting's snapshot and is never
// persisted itself.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display format used in titles and subtitles (MM/dd/yyyy)
pub const DISPLAY_DATE_FORMAT: &str = "%m/%d/%Y";

// ============================================================================
// MEMBER / ROSTER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(default)]
    pub position: String,
}

impl Member {
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Member {
            name: name.into(),
            position: position.into(),
        }
    }
}

/// Ordered list of known members.
/// Names are expected, but not required, to be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    members: Vec<Member>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_members(members: Vec<Member>) -> Self {
        Roster { members }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn push(&mut self, member: Member) {
        self.members.push(member);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Member> {
        self.members.iter()
    }

    pub fn find(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Accretive merge: existing order is kept, positions of members named in
    /// `newer` are updated, unseen members are appended in `newer`'s order.
    pub fn merged_with(&self, newer: &Roster) -> Roster {
        let mut merged = self.members.clone();

        for member in &newer.members {
            match merged.iter_mut().find(|m| m.name == member.name) {
                Some(existing) => existing.position = member.position.clone(),
                None => merged.push(member.clone()),
            }
        }

        Roster { members: merged }
    }
}

impl IntoIterator for Roster {
    type Item = Member;
    type IntoIter = std::vec::IntoIter<Member>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Member;
    type IntoIter = std::slice::Iter<'a, Member>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

/// Unrecognized option label
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} option: {value:?}")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttendanceOption {
    #[default]
    Attending,
    Absent,
}

impl AttendanceOption {
    /// Form order
    pub const ALL: [AttendanceOption; 2] = [AttendanceOption::Attending, AttendanceOption::Absent];

    pub fn label(&self) -> &'static str {
        match self {
            AttendanceOption::Attending => "Attending",
            AttendanceOption::Absent => "Absent",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            AttendanceOption::Attending => AttendanceOption::Absent,
            AttendanceOption::Absent => AttendanceOption::Attending,
        }
    }
}

impl fmt::Display for AttendanceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AttendanceOption {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "attending" => Ok(AttendanceOption::Attending),
            "absent" => Ok(AttendanceOption::Absent),
            _ => Err(ParseOptionError {
                kind: "attendance",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModeOption {
    #[default]
    InPerson,
    Virtual,
}

impl ModeOption {
    /// Form order
    pub const ALL: [ModeOption; 2] = [ModeOption::InPerson, ModeOption::Virtual];

    pub fn label(&self) -> &'static str {
        match self {
            ModeOption::InPerson => "In-Person",
            ModeOption::Virtual => "Virtual",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ModeOption::InPerson => ModeOption::Virtual,
            ModeOption::Virtual => ModeOption::InPerson,
        }
    }
}

impl fmt::Display for ModeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ModeOption {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in-person" | "inperson" | "in person" => Ok(ModeOption::InPerson),
            "virtual" => Ok(ModeOption::Virtual),
            _ => Err(ParseOptionError {
                kind: "mode",
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// ATTENDANCE RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub member_name: String,
    pub position: String,
    pub mode: ModeOption,
    pub status: AttendanceOption,
}

impl AttendanceEntry {
    /// Cells in column order: name, position, mode label, status label
    pub fn cells(&self) -> [&str; 4] {
        [
            self.member_name.as_str(),
            self.position.as_str(),
            self.mode.label(),
            self.status.label(),
        ]
    }
}

/// One meeting's snapshot; entries keep form-row order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    pub entries: Vec<AttendanceEntry>,
}

impl AttendanceRecord {
    pub fn new(date: NaiveDate) -> Self {
        AttendanceRecord {
            date,
            entries: Vec::new(),
        }
    }

    pub fn formatted_date(&self) -> String {
        self.date.format(DISPLAY_DATE_FORMAT).to_string()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// WEEKLY REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyReport {
    pub date: NaiveDate,
    pub body: String,
}

impl WeeklyReport {
    pub fn new(date: NaiveDate, body: impl Into<String>) -> Self {
        WeeklyReport {
            date,
            body: body.into(),
        }
    }

    pub fn formatted_date(&self) -> String {
        self.date.format(DISPLAY_DATE_FORMAT).to_string()
    }

    /// Paragraphs split on blank lines; each paragraph is its list of
    /// forced-break lines. Whitespace-only lines count as blank.
    pub fn paragraphs(&self) -> Vec<Vec<String>> {
        let normalized = self.body.replace("\r\n", "\n").replace('\r', "\n");

        let mut paragraphs = Vec::new();
        let mut current: Vec<String> = Vec::new();

        for line in normalized.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    paragraphs.push(std::mem::take(&mut current));
                }
            } else {
                current.push(line.trim_end().to_string());
            }
        }
        if !current.is_empty() {
            paragraphs.push(current);
        }

        paragraphs
    }
}

/// Parse a form date: MM/DD/YYYY, also accepting ISO YYYY-MM-DD
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DISPLAY_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(input, "%Y-%m-%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_option_labels() {
        assert_eq!(ModeOption::InPerson.label(), "In-Person");
        assert_eq!(ModeOption::Virtual.label(), "Virtual");
        assert_eq!(AttendanceOption::Attending.label(), "Attending");
        assert_eq!(AttendanceOption::Absent.label(), "Absent");
        assert_eq!(ModeOption::Virtual.to_string(), "Virtual");
    }

    #[test]
    fn test_option_parsing() {
        assert_eq!("In-Person".parse::<ModeOption>(), Ok(ModeOption::InPerson));
        assert_eq!("in person".parse::<ModeOption>(), Ok(ModeOption::InPerson));
        assert_eq!(" VIRTUAL ".parse::<ModeOption>(), Ok(ModeOption::Virtual));
        assert_eq!("absent".parse::<AttendanceOption>(), Ok(AttendanceOption::Absent));
        assert!("Remote".parse::<ModeOption>().is_err());
        assert!("".parse::<AttendanceOption>().is_err());
    }

    #[test]
    fn test_option_defaults_match_form_order() {
        assert_eq!(ModeOption::default(), ModeOption::ALL[0]);
        assert_eq!(AttendanceOption::default(), AttendanceOption::ALL[0]);
        assert_eq!(ModeOption::InPerson.next().next(), ModeOption::InPerson);
    }

    #[test]
    fn test_roster_serializes_as_plain_array() {
        let roster = Roster::from_members(vec![Member::new("Alice", "Chair")]);
        let json = serde_json::to_string(&roster).unwrap();
        assert_eq!(json, r#"[{"name":"Alice","position":"Chair"}]"#);

        let back: Roster = serde_json::from_str(r#"[{"name":"Bob"}]"#).unwrap();
        assert_eq!(back.members()[0], Member::new("Bob", ""));
    }

    #[test]
    fn test_roster_merge_is_accretive() {
        let old = Roster::from_members(vec![
            Member::new("Alice", "Chair"),
            Member::new("Bob", "Treasurer"),
        ]);
        let newer = Roster::from_members(vec![
            Member::new("Carol", "Secretary"),
            Member::new("Alice", "Past Chair"),
        ]);

        let merged = old.merged_with(&newer);
        let names: Vec<&str> = merged.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
        assert_eq!(merged.find("Alice").unwrap().position, "Past Chair");
    }

    #[test]
    fn test_weekly_report_paragraphs() {
        let report = WeeklyReport::new(date(2024, 3, 14), "Line1\nLine2\n\nLine3");
        let paragraphs = report.paragraphs();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0], vec!["Line1".to_string(), "Line2".to_string()]);
        assert_eq!(paragraphs[1], vec!["Line3".to_string()]);
    }

    #[test]
    fn test_weekly_report_paragraphs_normalize_whitespace_lines() {
        let report = WeeklyReport::new(date(2024, 3, 14), "\r\n  A\r\n   \r\n\n\nB  \n");
        let paragraphs = report.paragraphs();
        assert_eq!(paragraphs, vec![vec!["  A".to_string()], vec!["B".to_string()]]);
    }

    #[test]
    fn test_empty_report_has_no_paragraphs() {
        assert!(WeeklyReport::new(date(2024, 3, 14), "  \n\n ").paragraphs().is_empty());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("03/14/2024"), Some(date(2024, 3, 14)));
        assert_eq!(parse_date("2024-03-14"), Some(date(2024, 3, 14)));
        assert_eq!(parse_date("14/03/2024"), None);
    }

    #[test]
    fn test_record_formatted_date() {
        let record = AttendanceRecord::new(date(2024, 3, 4));
        assert_eq!(record.formatted_date(), "03/04/2024");
        assert!(record.is_empty());
    }
}
