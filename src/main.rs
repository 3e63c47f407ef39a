// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use committee_attendance::{
    parse_date, AppConfig, CommitteeError, CommitteeService, ExportKind, ExportOutcome, FormRows,
    RawRow, WeeklyReport,
};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "committee-attendance",
    version,
    about = "Tech Fee Committee attendance records and weekly reports"
)]
struct Cli {
    /// Roster file (default: members.json, or $COMMITTEE_ROSTER)
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    /// Background image drawn faintly behind every PDF page
    #[arg(long, global = true)]
    overlay: Option<PathBuf>,

    /// Directory for exports when --out is not given
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Overlay opacity, 0.0 - 1.0
    #[arg(long, global = true)]
    opacity: Option<f32>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Full-screen attendance / weekly report form (default)
    Form,
    /// Print the stored roster
    Roster,
    /// Validate rows and replace the stored roster with the submitted members
    Save(RowArgs),
    /// Export attendance as CSV
    Csv(ExportArgs),
    /// Export attendance as PDF
    Pdf(ExportArgs),
    /// Export a weekly report as PDF
    Report(ReportArgs),
}

#[derive(Args)]
struct RowArgs {
    /// Meeting date, MM/DD/YYYY (default: today)
    #[arg(long)]
    date: Option<String>,

    /// CSV with name,position,mode,status headers (default: rows from the roster)
    #[arg(long)]
    rows: Option<PathBuf>,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    rows: RowArgs,

    /// Destination file (default: conventional name in the output directory)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct ReportArgs {
    /// Report date, MM/DD/YYYY (default: today)
    #[arg(long)]
    date: Option<String>,

    /// File holding the report body (default: read stdin)
    #[arg(long)]
    body: Option<PathBuf>,

    /// Destination file (default: conventional name in the output directory)
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Command::Form));
    init_tracing(if interactive { "off" } else { "info" });

    let config = build_config(&cli)?;
    let mut service = CommitteeService::open(config).context("Failed to open roster")?;

    let result = match cli.command {
        None | Some(Command::Form) => run_ui_mode(service),
        Some(Command::Roster) => {
            print_roster(&service);
            Ok(())
        }
        Some(Command::Save(args)) => run_save(&mut service, &args),
        Some(Command::Csv(args)) => run_export(&service, ExportKind::AttendanceCsv, &args),
        Some(Command::Pdf(args)) => run_export(&service, ExportKind::AttendancePdf, &args),
        Some(Command::Report(args)) => run_report(&service, &args),
    };

    if let Err(err) = &result {
        if let Some(CommitteeError::Validation(validation)) = err.downcast_ref::<CommitteeError>() {
            eprintln!("❌ Incomplete data: {}", validation);
            std::process::exit(2);
        }
    }
    result
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Environment (and .env) first, then CLI flags on top
fn build_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::from_env()?;

    if let Some(roster) = &cli.roster {
        config = config.with_roster_path(roster.clone());
    }
    if let Some(overlay) = &cli.overlay {
        config = config.with_overlay_path(Some(overlay.clone()));
    }
    if let Some(dir) = &cli.output_dir {
        config = config.with_output_dir(dir.clone());
    }
    if let Some(opacity) = cli.opacity {
        config = config.with_overlay_opacity(opacity);
    }

    config.validate()?;
    Ok(config)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn resolve_date(input: Option<&str>) -> Result<NaiveDate> {
    match input {
        None => Ok(today()),
        Some(raw) => match parse_date(raw) {
            Some(date) => Ok(date),
            None => bail!("Invalid date {:?}, expected MM/DD/YYYY", raw),
        },
    }
}

fn load_rows(service: &CommitteeService, args: &RowArgs) -> Result<Vec<RawRow>> {
    let form = match &args.rows {
        Some(path) => FormRows::from_csv_path(path)
            .with_context(|| format!("Failed to read rows from {}", path.display()))?,
        None => FormRows::seeded_from(service.roster(), 0),
    };
    Ok(form.rows().to_vec())
}

fn print_roster(service: &CommitteeService) {
    println!("👥 Roster ({} members) - {}", service.roster().len(), service.config().roster_path.display());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for (i, member) in service.roster().iter().enumerate() {
        if member.position.is_empty() {
            println!("{:>3}. {}", i + 1, member.name);
        } else {
            println!("{:>3}. {} ({})", i + 1, member.name, member.position);
        }
    }
}

fn run_save(service: &mut CommitteeService, args: &RowArgs) -> Result<()> {
    let date = resolve_date(args.date.as_deref())?;
    let rows = load_rows(service, args)?;

    let record = service.save_attendance(date, &rows)?;
    println!("✓ Attendance saved: {} entries for {}", record.len(), record.formatted_date());
    println!("✓ Roster now has {} members", service.roster().len());
    Ok(())
}

fn run_export(service: &CommitteeService, kind: ExportKind, args: &ExportArgs) -> Result<()> {
    let date = resolve_date(args.rows.date.as_deref())?;
    let rows = load_rows(service, &args.rows)?;
    let path = args
        .out
        .clone()
        .unwrap_or_else(|| service.default_destination(kind, today()));

    let outcome = match kind {
        ExportKind::AttendanceCsv => service.export_csv(date, &rows, &path)?,
        _ => service.export_attendance_pdf(date, &rows, &path)?,
    };
    report_outcome(&outcome);
    Ok(())
}

fn run_report(service: &CommitteeService, args: &ReportArgs) -> Result<()> {
    let date = resolve_date(args.date.as_deref())?;
    let body = match &args.body {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read report body from {}", path.display()))?,
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read report body from stdin")?;
            body
        }
    };
    let path = args
        .out
        .clone()
        .unwrap_or_else(|| service.default_destination(ExportKind::WeeklyReportPdf, today()));

    let outcome = service.export_weekly_report_pdf(&WeeklyReport::new(date, body), &path)?;
    report_outcome(&outcome);
    Ok(())
}

fn report_outcome(outcome: &ExportOutcome) {
    if outcome.pages > 0 {
        println!(
            "✓ {} exported to {} ({} pages)",
            outcome.kind.name(),
            outcome.path.display(),
            outcome.pages
        );
    } else {
        println!("✓ {} exported to {}", outcome.kind.name(), outcome.path.display());
    }
    for warning in &outcome.warnings {
        println!("⚠️  {}", warning);
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(service: CommitteeService) -> Result<()> {
    let mut app = ui::App::new(service, today());
    ui::run_ui(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_service: CommitteeService) -> Result<()> {
    eprintln!("❌ Form mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the save / csv / pdf / report subcommands");
    std::process::exit(1);
}
