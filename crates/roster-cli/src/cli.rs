//! CLI argument definitions for `roster`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use roster_source::UploadField;

#[derive(Parser)]
#[command(
    name = "roster",
    version,
    about = "Browse and manage tenant rosters from the terminal",
    long_about = "Filtered, paginated views over a tenant's employees, audit log and \
                  compliance items, backed by a local JSON data directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow names and email addresses in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Settings file (default: platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Tenant to operate on (overrides the settings file).
    #[arg(long = "tenant", global = true)]
    pub tenant: Option<String>,

    /// Data directory holding the tenant tables (overrides the settings file).
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Employee roster.
    #[command(subcommand)]
    Employees(EmployeesCommand),

    /// Tenant audit log.
    #[command(subcommand)]
    Audit(AuditCommand),

    /// Compliance tracker.
    #[command(subcommand)]
    Compliance(ComplianceCommand),

    /// Validate a course file locally, then store it.
    Upload(UploadArgs),

    /// Populate an empty tenant with demo data.
    Seed(SeedArgs),
}

#[derive(Subcommand)]
pub enum EmployeesCommand {
    /// Show one page of employees.
    List(ListArgs),

    /// Show one employee.
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Delete one employee after confirmation.
    Delete {
        #[arg(value_name = "ID")]
        id: String,

        /// Do not ask for confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Write every matching employee (all pages) to a CSV file.
    Export {
        #[command(flatten)]
        filters: ListArgs,

        #[arg(long = "output", short = 'o', value_name = "FILE")]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum AuditCommand {
    /// Show one page of audit entries, newest first unless sorted.
    List(ListArgs),

    /// Counts by action and severity.
    Stats(WindowArgs),
}

#[derive(Subcommand)]
pub enum ComplianceCommand {
    /// Show one page of compliance items.
    List {
        #[command(flatten)]
        filters: ListArgs,

        /// Date used to flag overdue items (default: today).
        #[arg(long = "today", value_name = "DATE")]
        today: Option<NaiveDate>,
    },

    /// Email a reminder for every overdue item.
    Remind {
        /// Date used to decide what is overdue (default: today).
        #[arg(long = "today", value_name = "DATE")]
        today: Option<NaiveDate>,
    },
}

/// Filter state of a list command.
#[derive(Args, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive text search.
    #[arg(long = "search", short = 's')]
    pub search: Option<String>,

    /// Status to show, or `all`.
    #[arg(long = "status")]
    pub status: Option<String>,

    /// 1-based page; out of range values are clamped.
    #[arg(long = "page", short = 'p', default_value_t = 1)]
    pub page: usize,

    /// Rows per page: 5, 10, 20 or 50 (default from settings).
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Sort as FIELD[:asc|desc]; fetch order when omitted.
    #[arg(long = "sort", value_name = "FIELD[:DIR]")]
    pub sort: Option<String>,
}

#[derive(Args, Clone, Default)]
pub struct WindowArgs {
    /// First day to include (YYYY-MM-DD).
    #[arg(long = "since", value_name = "DATE")]
    pub since: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD).
    #[arg(long = "until", value_name = "DATE")]
    pub until: Option<NaiveDate>,
}

#[derive(Args)]
pub struct UploadArgs {
    /// Form field the file is uploaded for.
    #[arg(long = "field", value_enum)]
    pub field: UploadFieldArg,

    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct SeedArgs {
    /// Number of demo employees (1 to 10000).
    #[arg(
        long = "employees",
        default_value_t = 23,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=10_000)
    )]
    pub employees: usize,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum UploadFieldArg {
    ScormPackage,
    IndexFile,
}

impl From<UploadFieldArg> for UploadField {
    fn from(arg: UploadFieldArg) -> Self {
        match arg {
            UploadFieldArg::ScormPackage => UploadField::ScormPackage,
            UploadFieldArg::IndexFile => UploadField::IndexFile,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
