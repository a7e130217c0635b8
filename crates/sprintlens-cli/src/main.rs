//! sprintlens CLI - Project Data Aggregation & Reporting Engine
//!
//! Command-line interface for validating workbooks, computing derived views,
//! rendering the status brief, and logging non-availability.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sprintlens_core::{
    Absence, AbsenceReason, CapacityConfig, Derived, PeriodBucket, ProjectDataset,
};
use sprintlens_parser::{load_workbook, parse_datetime, AbsenceStore};
use sprintlens_render::{insight_context, render_brief, views};
use sprintlens_report::{
    burnup, burnup_for_assignee, flow, skill_matrix, worklog_pivot, Dashboard, FlowDimension,
};

#[derive(Parser)]
#[command(name = "sprintlens")]
#[command(author, version, about = "Project data aggregation and reporting engine", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Sprint baseline capacity in hours
    #[arg(long, env = "SPRINTLENS_SPRINT_HOURS", default_value_t = 80.0, global = true)]
    sprint_hours: f64,

    /// Working hours per day (converts estimate-days)
    #[arg(long, env = "SPRINTLENS_WORKDAY_HOURS", default_value_t = 8.0, global = true)]
    workday_hours: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a workbook's sheets and columns
    Check {
        /// Workbook directory (one CSV per sheet)
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Compute one derived view
    Report {
        /// Workbook directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// View to compute
        #[arg(long, value_enum)]
        view: View,

        /// Evaluation date (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Scope the burnup to one assignee
        #[arg(long)]
        assignee: Option<String>,

        /// Period bucket for the worklog pivot
        #[arg(long, value_enum, default_value_t = Bucket::Weekly)]
        bucket: Bucket,

        /// Source dimension for the flow view
        #[arg(long, value_enum, default_value_t = Dimension::Status)]
        source: Dimension,

        /// Target dimension for the flow view
        #[arg(long, value_enum, default_value_t = Dimension::Project)]
        target: Dimension,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Merge absences from a persisted store directory
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Render the full plain-text status brief
    Brief {
        /// Workbook directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Evaluation date (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Merge absences from a persisted store directory
        #[arg(long)]
        store: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the question-answering context block
    Context {
        /// Workbook directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Evaluation date (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Merge absences from a persisted store directory
        #[arg(long)]
        store: Option<PathBuf>,

        /// Free-text question to append to the context
        #[arg(long)]
        question: Option<String>,

        /// Issue excerpt size
        #[arg(long, default_value_t = 20)]
        issues: usize,
    },

    /// Append a non-availability interval to the persisted store
    LogAbsence {
        /// Store directory (one CSV per resource)
        #[arg(value_name = "STORE")]
        store: PathBuf,

        /// Resource the interval belongs to
        #[arg(long)]
        resource: String,

        /// Interval start (e.g. "2026-02-10 09:00")
        #[arg(long)]
        start: String,

        /// Interval end
        #[arg(long)]
        end: String,

        /// Reason: Meeting, Leave, Sick, Unplanned Leave or Out of Office
        #[arg(long)]
        reason: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum View {
    Utilization,
    Availability,
    Overallocation,
    Health,
    Burnup,
    Pivot,
    Flow,
    Skills,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Bucket {
    Daily,
    Weekly,
}

impl From<Bucket> for PeriodBucket {
    fn from(bucket: Bucket) -> Self {
        match bucket {
            Bucket::Daily => PeriodBucket::Daily,
            Bucket::Weekly => PeriodBucket::Weekly,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Dimension {
    Status,
    Project,
    Assignee,
    Role,
}

impl From<Dimension> for FlowDimension {
    fn from(dim: Dimension) -> Self {
        match dim {
            Dimension::Status => FlowDimension::Status,
            Dimension::Project => FlowDimension::Project,
            Dimension::Assignee => FlowDimension::Assignee,
            Dimension::Role => FlowDimension::Role,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG overrides the verbosity flag
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = CapacityConfig::default()
        .sprint_hours(cli.sprint_hours)
        .workday_hours(cli.workday_hours);

    match cli.command {
        Commands::Check { dir } => cmd_check(&dir),
        Commands::Report {
            dir,
            view,
            as_of,
            assignee,
            bucket,
            source,
            target,
            format,
            store,
        } => {
            let dataset = load_dataset(&dir, store.as_deref())?;
            let as_of = resolve_as_of(as_of);
            cmd_report(
                &dataset, &config, as_of, view, assignee.as_deref(),
                bucket.into(), source.into(), target.into(), format,
            )
        }
        Commands::Brief { dir, as_of, store, output } => {
            let dataset = load_dataset(&dir, store.as_deref())?;
            let dashboard = Dashboard::compute(&dataset, &config, resolve_as_of(as_of));
            let brief = render_brief(&dashboard);
            match output {
                Some(path) => {
                    std::fs::write(&path, brief)
                        .with_context(|| format!("writing brief to {}", path.display()))?;
                    println!("brief written to {}", path.display());
                }
                None => print!("{brief}"),
            }
            Ok(())
        }
        Commands::Context { dir, as_of, store, question, issues } => {
            let dataset = load_dataset(&dir, store.as_deref())?;
            let dashboard = Dashboard::compute(&dataset, &config, resolve_as_of(as_of));
            let context = insight_context(&dataset, &dashboard, issues);
            match question {
                Some(question) => println!("{context}\nQUESTION\n{question}"),
                None => print!("{context}"),
            }
            Ok(())
        }
        Commands::LogAbsence { store, resource, start, end, reason } => {
            cmd_log_absence(&store, &resource, &start, &end, &reason)
        }
    }
}

fn resolve_as_of(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| chrono::Local::now().date_naive())
}

/// Load the workbook, optionally merging the persisted absence store into
/// the dataset before any computation.
fn load_dataset(dir: &Path, store: Option<&Path>) -> Result<ProjectDataset> {
    let mut dataset = load_workbook(dir)
        .with_context(|| format!("loading workbook from {}", dir.display()))?;
    if let Some(root) = store {
        let absences = AbsenceStore::new(root)
            .load_all()
            .with_context(|| format!("reading absence store at {}", root.display()))?;
        dataset.absences.extend(absences);
    }
    tracing::info!(
        issues = dataset.issues.len(),
        worklogs = dataset.worklogs.len(),
        "workbook loaded"
    );
    Ok(dataset)
}

fn cmd_check(dir: &Path) -> Result<()> {
    let dataset = load_workbook(dir)
        .with_context(|| format!("checking workbook at {}", dir.display()))?;
    println!(
        "workbook OK: {} issues, {} skill entries, {} worklogs, {} absences",
        dataset.issues.len(),
        dataset.skills.len(),
        dataset.worklogs.len(),
        dataset.absences.len(),
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_report(
    dataset: &ProjectDataset,
    config: &CapacityConfig,
    as_of: NaiveDate,
    view: View,
    assignee: Option<&str>,
    bucket: PeriodBucket,
    source: FlowDimension,
    target: FlowDimension,
    format: Format,
) -> Result<()> {
    match view {
        View::Utilization => {
            let dashboard = Dashboard::compute(dataset, config, as_of);
            emit(&dashboard.utilization, format, |rows| views::utilization_table(rows))
        }
        View::Availability => {
            let dashboard = Dashboard::compute(dataset, config, as_of);
            emit_rows(&dashboard.availability, format, views::availability_table(&dashboard.availability))
        }
        View::Overallocation => {
            let dashboard = Dashboard::compute(dataset, config, as_of);
            emit_rows(
                &dashboard.overallocation,
                format,
                views::overallocation_table(&dashboard.overallocation),
            )
        }
        View::Health => {
            let dashboard = Dashboard::compute(dataset, config, as_of);
            emit_rows(&dashboard.health, format, views::health_table(&dashboard.health))
        }
        View::Burnup => {
            let series = match assignee {
                Some(name) => burnup_for_assignee(&dataset.issues, name),
                None => burnup(&dataset.issues),
            };
            emit(&series, format, |s| views::burnup_table(s))
        }
        View::Pivot => {
            let pivot = worklog_pivot(&dataset.worklogs, bucket);
            emit(&pivot, format, |p| views::pivot_table(p))
        }
        View::Flow => {
            let table = flow(&dataset.issues, source, target);
            emit(&table, format, |t| views::flow_table(t))
        }
        View::Skills => {
            let rows = skill_matrix(&dataset.skills);
            emit_rows(&rows, format, views::skills_table(&rows))
        }
    }
}

/// Print a `Derived` view; insufficient data degrades to a warning line,
/// never a failing exit.
fn emit<T: serde::Serialize>(
    derived: &Derived<T>,
    format: Format,
    render: impl Fn(&T) -> String,
) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(derived)?),
        Format::Text => match derived {
            Derived::Table(table) => println!("{}", render(table)),
            Derived::Insufficient(reason) => println!("insufficient data: {reason}"),
        },
    }
    Ok(())
}

/// Print a view that is always a (possibly empty) table
fn emit_rows<T: serde::Serialize>(rows: &[T], format: Format, text: String) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        Format::Text => {
            if rows.is_empty() {
                println!("insufficient data: nothing to tabulate");
            } else {
                println!("{text}");
            }
        }
    }
    Ok(())
}

fn cmd_log_absence(
    store_dir: &Path,
    resource: &str,
    start: &str,
    end: &str,
    reason: &str,
) -> Result<()> {
    let Some(start) = parse_datetime(start) else {
        bail!("unparseable start timestamp: {start:?}");
    };
    let Some(end) = parse_datetime(end) else {
        bail!("unparseable end timestamp: {end:?}");
    };
    if end < start {
        bail!("interval end lies before its start");
    }
    let Some(reason) = AbsenceReason::parse(reason) else {
        bail!("unknown reason {reason:?} (expected Meeting, Leave, Sick, Unplanned Leave or Out of Office)");
    };

    let absence = Absence::new(resource, start, end, reason);
    AbsenceStore::new(store_dir)
        .append(&absence)
        .with_context(|| format!("appending to absence store at {}", store_dir.display()))?;
    println!(
        "logged {:.1} h of {} for {}",
        absence.hours(),
        absence.reason,
        absence.resource,
    );
    Ok(())
}
