use anyhow::Result;
use chrono::{Duration, NaiveDate};
use committee_attendance::{
    AttendanceOption, CommitteeService, ExportKind, ExportOutcome, FormRows, ModeOption, RawRow,
    WeeklyReport, DEFAULT_FORM_ROWS,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Attendance,
    WeeklyReport,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Attendance => Page::WeeklyReport,
            Page::WeeklyReport => Page::Attendance,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Attendance => "Attendance",
            Page::WeeklyReport => "Weekly Report",
        }
    }
}

/// Column of the attendance grid that has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Position,
    Mode,
    Status,
}

impl Column {
    const ALL: [Column; 4] = [Column::Name, Column::Position, Column::Mode, Column::Status];

    fn index(&self) -> usize {
        Column::ALL.iter().position(|c| c == self).unwrap_or(0)
    }

    fn next(&self) -> Self {
        Column::ALL[(self.index() + 1) % Column::ALL.len()]
    }

    fn previous(&self) -> Self {
        Column::ALL[(self.index() + Column::ALL.len() - 1) % Column::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

pub struct App {
    pub service: CommitteeService,
    pub form: FormRows,
    pub state: TableState,
    pub column: Column,
    pub current_page: Page,
    pub attendance_date: NaiveDate,
    pub report_date: NaiveDate,
    pub report_body: String,
    pub status: StatusMessage,
    today: NaiveDate,
}

impl App {
    pub fn new(service: CommitteeService, today: NaiveDate) -> Self {
        let form = FormRows::seeded_from(service.roster(), DEFAULT_FORM_ROWS);

        let mut state = TableState::default();
        if !form.is_empty() {
            state.select(Some(0));
        }

        let status = StatusMessage {
            kind: StatusKind::Info,
            text: format!("Loaded {} members", service.roster().len()),
        };

        Self {
            service,
            form,
            state,
            column: Column::Name,
            current_page: Page::Attendance,
            attendance_date: today,
            report_date: today,
            report_body: String::new(),
            status,
            today,
        }
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = StatusMessage {
            kind,
            text: text.into(),
        };
    }

    fn selected_row(&mut self) -> Option<&mut RawRow> {
        let index = self.state.selected()?;
        self.form.get_mut(index)
    }

    // ========================================================================
    // NAVIGATION
    // ========================================================================

    pub fn next(&mut self) {
        let len = self.form.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.form.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn shift_date(&mut self, days: i64) {
        let date = match self.current_page {
            Page::Attendance => &mut self.attendance_date,
            Page::WeeklyReport => &mut self.report_date,
        };
        *date += Duration::days(days);
    }

    // ========================================================================
    // EDITING
    // ========================================================================

    fn type_char(&mut self, c: char) {
        let column = self.column;
        if let Some(row) = self.selected_row() {
            match column {
                Column::Name => row.name.push(c),
                Column::Position => row.position.push(c),
                Column::Mode | Column::Status if c == ' ' => cycle_option(row, column),
                _ => {}
            }
        }
    }

    fn backspace(&mut self) {
        let column = self.column;
        if let Some(row) = self.selected_row() {
            match column {
                Column::Name => {
                    row.name.pop();
                }
                Column::Position => {
                    row.position.pop();
                }
                _ => {}
            }
        }
    }

    fn cycle_selected(&mut self) {
        let column = self.column;
        if let Some(row) = self.selected_row() {
            cycle_option(row, column);
        }
    }

    pub fn add_row(&mut self) {
        let index = self.form.add_row();
        self.state.select(Some(index));
        self.set_status(StatusKind::Info, format!("Added a new member row ({})", index + 1));
    }

    pub fn delete_row(&mut self) {
        if self.form.remove_last().is_some() {
            let len = self.form.len();
            if len == 0 {
                self.state.select(None);
            } else if self.state.selected().is_some_and(|i| i >= len) {
                self.state.select(Some(len - 1));
            }
            self.set_status(StatusKind::Info, "Last member row has been deleted");
        } else {
            self.set_status(StatusKind::Warning, "There are no members to delete");
        }
    }

    // ========================================================================
    // ENGINE CALLS
    // ========================================================================

    pub fn save(&mut self) {
        let rows = self.form.rows().to_vec();
        match self.service.save_attendance(self.attendance_date, &rows) {
            Ok(record) => self.set_status(
                StatusKind::Success,
                format!("Attendance data saved ({} entries)", record.len()),
            ),
            Err(e) if e.is_validation() => self.set_status(StatusKind::Warning, format!("Incomplete data: {}", e)),
            Err(e) => self.set_status(StatusKind::Error, format!("Error saving data: {}", e)),
        }
    }

    pub fn export(&mut self, kind: ExportKind) {
        let path = self.service.default_destination(kind, self.today);
        let result = match kind {
            ExportKind::AttendanceCsv => self.service.export_csv(self.attendance_date, self.form.rows(), &path),
            ExportKind::AttendancePdf => {
                self.service
                    .export_attendance_pdf(self.attendance_date, self.form.rows(), &path)
            }
            ExportKind::WeeklyReportPdf => {
                let report = WeeklyReport::new(self.report_date, self.report_body.clone());
                self.service.export_weekly_report_pdf(&report, &path)
            }
        };

        match result {
            Ok(outcome) => self.report_outcome(&outcome),
            Err(e) if e.is_validation() => self.set_status(StatusKind::Warning, format!("Incomplete data: {}", e)),
            Err(e) => self.set_status(StatusKind::Error, format!("Error exporting {}: {}", kind.name(), e)),
        }
    }

    fn report_outcome(&mut self, outcome: &ExportOutcome) {
        let mut text = format!("{} exported to {}", outcome.kind.name(), outcome.path.display());
        match outcome.warnings.first() {
            Some(warning) => {
                text.push_str(&format!(" ({})", warning));
                self.set_status(StatusKind::Warning, text);
            }
            None => self.set_status(StatusKind::Success, text),
        }
    }

    /// Apply one key press; returns true when the app should exit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Char('q') if ctrl => return true,
            KeyCode::Char('c') if ctrl => return true,
            KeyCode::F(1) => self.current_page = Page::Attendance,
            KeyCode::F(2) => self.current_page = Page::WeeklyReport,
            KeyCode::Char('w') if ctrl => self.current_page = self.current_page.next(),
            KeyCode::PageUp => self.shift_date(-1),
            KeyCode::PageDown => self.shift_date(1),
            KeyCode::Home if ctrl => {
                let today = self.today;
                match self.current_page {
                    Page::Attendance => self.attendance_date = today,
                    Page::WeeklyReport => self.report_date = today,
                }
            }
            _ => match self.current_page {
                Page::Attendance => self.handle_attendance_key(key, ctrl),
                Page::WeeklyReport => self.handle_report_key(key, ctrl),
            },
        }
        false
    }

    fn handle_attendance_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Char('s') if ctrl => self.save(),
            KeyCode::Char('e') if ctrl => self.export(ExportKind::AttendanceCsv),
            KeyCode::Char('p') if ctrl => self.export(ExportKind::AttendancePdf),
            KeyCode::Char('n') if ctrl => self.add_row(),
            KeyCode::Char('d') if ctrl => self.delete_row(),
            KeyCode::Down => self.next(),
            KeyCode::Up => self.previous(),
            KeyCode::Tab | KeyCode::Right => self.column = self.column.next(),
            KeyCode::BackTab | KeyCode::Left => self.column = self.column.previous(),
            KeyCode::Enter => self.cycle_selected(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Char(c) if !ctrl => self.type_char(c),
            _ => {}
        }
    }

    fn handle_report_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Char('p') if ctrl => self.export(ExportKind::WeeklyReportPdf),
            KeyCode::Enter => self.report_body.push('\n'),
            KeyCode::Backspace => {
                self.report_body.pop();
            }
            KeyCode::Char(c) if !ctrl => self.report_body.push(c),
            _ => {}
        }
    }
}

fn cycle_option(row: &mut RawRow, column: Column) {
    match column {
        Column::Mode => {
            let next = row.mode.parse::<ModeOption>().unwrap_or_default().next();
            row.mode = next.label().to_string();
        }
        Column::Status => {
            let next = row.status.parse::<AttendanceOption>().unwrap_or_default().next();
            row.status = next.label().to_string();
        }
        _ => {}
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with tabs + date
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Attendance => render_attendance(f, chunks[1], app),
        Page::WeeklyReport => render_report(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in [Page::Attendance, Page::WeeklyReport].iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(format!("F{} {}", i + 1, page.title()), style));
    }

    let date = match app.current_page {
        Page::Attendance => app.attendance_date,
        Page::WeeklyReport => app.report_date,
    };
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Date: {}", date.format("%m/%d/%Y")),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Roster: {}", app.service.roster().len()),
        Style::default().fg(Color::Cyan),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Tech Fee Committee Attendance/Weekly Report Generator "),
    );

    f.render_widget(header, area);
}

fn render_attendance(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Member Name", "Position", "Virtual/In-Person", "Attendance"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::Red))
        .height(1);

    let selected = app.state.selected();
    let focus = app.column.index();
    let rows = app.form.rows().iter().enumerate().map(|(i, row)| {
        let values = [
            row.name.as_str(),
            row.position.as_str(),
            row.mode.as_str(),
            row.status.as_str(),
        ];
        let cells = values.iter().enumerate().map(|(col, value)| {
            let cell = Cell::from(value.to_string());
            if Some(i) == selected && col == focus {
                cell.style(Style::default().fg(Color::Black).bg(Color::Yellow))
            } else {
                cell
            }
        });

        let band = if i % 2 == 0 { Color::Reset } else { Color::Rgb(40, 40, 40) };
        Row::new(cells.collect::<Vec<_>>())
            .style(Style::default().bg(band))
            .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Members ({} rows) ", app.form.len())),
    )
    .highlight_style(Style::default().add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_report(f: &mut Frame, area: Rect, app: &App) {
    let mut text: Vec<Line> = app.report_body.split('\n').map(|l| Line::from(l.to_string())).collect();
    if let Some(last) = text.last_mut() {
        last.spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
    }

    let report = Paragraph::new(text).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Weekly Report "),
    );

    f.render_widget(report, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let color = match app.status.kind {
        StatusKind::Info => Color::Cyan,
        StatusKind::Success => Color::Green,
        StatusKind::Warning => Color::Yellow,
        StatusKind::Error => Color::Red,
    };

    let mut status_spans = vec![
        Span::styled(format!(" {} ", app.status.text), Style::default().fg(color)),
        Span::raw(" | "),
    ];

    let keys: &[(&str, &str)] = match app.current_page {
        Page::Attendance => &[
            ("^S", "Save"),
            ("^E", "CSV"),
            ("^P", "PDF"),
            ("^N", "Add"),
            ("^D", "Delete"),
            ("Enter", "Cycle"),
            ("PgUp/PgDn", "Date"),
        ],
        Page::WeeklyReport => &[("^P", "PDF"), ("PgUp/PgDn", "Date")],
    };
    for (key, label) in keys {
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(format!(" {} | ", label)));
    }
    status_spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use committee_attendance::AppConfig;
    use std::path::Path;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    fn app(dir: &Path) -> App {
        let config = AppConfig::default()
            .with_roster_path(dir.join("members.json"))
            .with_output_dir(dir);
        App::new(CommitteeService::open(config).unwrap(), today())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_new_app_has_padded_form() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        assert_eq!(app.form.len(), DEFAULT_FORM_ROWS);
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_typing_and_saving_updates_roster() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        type_str(&mut app, "Alice");
        app.handle_key(key(KeyCode::Tab));
        type_str(&mut app, "Chair");
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(ctrl('s'));

        assert_eq!(app.status.kind, StatusKind::Success);
        assert_eq!(app.service.roster().len(), 1);
        assert_eq!(app.form.rows()[0].mode, "Virtual");
    }

    #[test]
    fn test_incomplete_row_shows_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        app.handle_key(key(KeyCode::Tab));
        type_str(&mut app, "Treasurer");
        app.handle_key(ctrl('s'));

        assert_eq!(app.status.kind, StatusKind::Warning);
        assert!(!dir.path().join("members.json").exists());
    }

    #[test]
    fn test_report_export_from_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        app.handle_key(key(KeyCode::F(2)));
        type_str(&mut app, "Line1");
        app.handle_key(key(KeyCode::Enter));
        type_str(&mut app, "Line2");
        app.handle_key(ctrl('p'));

        assert_eq!(app.report_body, "Line1\nLine2");
        assert_eq!(app.status.kind, StatusKind::Success);
        assert!(dir
            .path()
            .join("Tech_Fee_Committee_Weekly_Report_03-14-2024.pdf")
            .exists());
    }

    #[test]
    fn test_date_shift_and_row_management() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        app.handle_key(key(KeyCode::PageDown));
        assert_eq!(app.attendance_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(app.report_date, today());

        app.handle_key(ctrl('n'));
        assert_eq!(app.form.len(), DEFAULT_FORM_ROWS + 1);
        app.handle_key(ctrl('d'));
        assert_eq!(app.form.len(), DEFAULT_FORM_ROWS);

        assert!(app.handle_key(key(KeyCode::Esc)));
    }
}
