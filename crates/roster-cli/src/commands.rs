use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context as _, Result, anyhow, bail};
use chrono::{Local, NaiveDate};
use roster_cli::config::Settings;
use roster_cli::export::write_employees_csv;
use roster_cli::logging::redact_value;
use roster_cli::remind::send_overdue_reminders;
use roster_cli::render;
use roster_cli::seed::{demo_data, seed_tenant};
use roster_model::{
    AuditLogEntry, ComplianceItem, Employee, ItemId, ModelError, PageSize, PayGroup, Record,
    SortSpec, StatusFilter, TenantId, UserId,
};
use roster_screen::{Confirm, ConfirmRequest, Level, ListScreen, MutationOutcome, ScreenState};
use roster_source::{
    DirStorage, FileUpload, JsonDirSource, OrderBy, OutboxMailer, Session, TenantScope,
    fetch_records, upload_checked,
};
use roster_view::{AuditStats, AuditWindow, FilterState, Lookup, matched};
use tracing::info;

use crate::cli::{Cli, ListArgs, SeedArgs, UploadArgs, WindowArgs};

/// Settings, session and data source shared by every command.
pub struct Context {
    pub settings: Settings,
    pub session: Session,
    pub source: JsonDirSource,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut settings = match &cli.config {
            Some(path) => Settings::load_from(path),
            None => Settings::load(),
        };
        if let Some(tenant) = &cli.tenant {
            settings.general.tenant.clone_from(tenant);
        }
        if let Some(dir) = &cli.data_dir {
            settings.general.data_dir = Some(dir.clone());
        }
        let session = Session::signed_in(
            UserId::new(settings.general.user.as_str())?,
            TenantId::new(settings.general.tenant.as_str())?,
        );
        let source = JsonDirSource::open(settings.data_dir()).context("open data directory")?;
        Ok(Self {
            settings,
            session,
            source,
        })
    }

    fn scope(&self) -> Result<&TenantScope> {
        Ok(self.session.scope()?)
    }
}

/// Confirms on the terminal unless `--yes` was given.
struct PromptConfirm {
    assume_yes: bool,
}

impl Confirm for PromptConfirm {
    fn confirm(&mut self, request: &ConfirmRequest) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{} [y/N] ", request.message);
        io::stderr().flush().ok();
        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

// =============================================================================
// Screen helpers
// =============================================================================

/// Mount a list screen for `T`, fetch it and apply the filters in `args`.
///
/// Filter values are validated before anything is fetched.
async fn load_screen<T>(
    ctx: &Context,
    args: &ListArgs,
    default_sort: Option<SortSpec>,
) -> Result<ListScreen<T>>
where
    T: Record,
    T::Status: FromStr<Err = ModelError>,
{
    let page_size = match args.page_size {
        Some(size) => PageSize::try_from(size)?,
        None => ctx.settings.display.page_size,
    };
    let sort = match &args.sort {
        Some(raw) => Some(raw.parse::<SortSpec>()?),
        None => default_sort,
    };
    let status = args
        .status
        .as_deref()
        .map(StatusFilter::<T::Status>::parse)
        .transpose()?;

    let filters = FilterState::new().with_page_size(page_size).with_sort(sort);
    let mut screen = ListScreen::<T>::with_filters(filters);
    screen.refresh(&ctx.session, &ctx.source).await?;
    if let ScreenState::Failed { message, .. } = screen.state() {
        bail!("{message}");
    }
    if let Some(term) = &args.search {
        screen.set_search_term(term.as_str());
    }
    if let Some(status) = status {
        screen.set_status_filter(status);
    }
    screen.set_page(args.page);
    Ok(screen)
}

fn report_notifications<T: Record>(screen: &mut ListScreen<T>) {
    for notification in screen.drain_notifications() {
        match notification.level {
            Level::Error => eprintln!("error: {}", notification.message),
            Level::Info | Level::Success => println!("{}", notification.message),
        }
    }
}

async fn lookup<T: Record>(ctx: &Context) -> Result<Lookup<T>> {
    let records = fetch_records::<T, _>(&ctx.source, ctx.scope()?, None).await?;
    Ok(Lookup::new(records))
}

fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

// =============================================================================
// Employees
// =============================================================================

pub async fn list_employees(ctx: &Context, args: &ListArgs) -> Result<()> {
    let screen = load_screen::<Employee>(ctx, args, ctx.settings.default_sort()).await?;
    let pay_groups = lookup::<PayGroup>(ctx).await?;
    let page = screen.view();
    println!("{}", render::employee_table(&page, &pay_groups, screen.selection()));
    println!("{}", render::footer(&page));
    Ok(())
}

pub async fn show_employee(ctx: &Context, id: &str) -> Result<()> {
    let id = ItemId::new(id)?;
    let screen = load_screen::<Employee>(ctx, &ListArgs::default(), None).await?;
    let employee = screen
        .get(&id)
        .ok_or_else(|| anyhow!("no employee with id {id}"))?;
    let pay_groups = lookup::<PayGroup>(ctx).await?;
    println!("{}", render::employee_detail(employee, &pay_groups));
    Ok(())
}

pub async fn delete_employee(ctx: &Context, id: &str, yes: bool) -> Result<()> {
    let id = ItemId::new(id)?;
    let mut screen = load_screen::<Employee>(ctx, &ListArgs::default(), None).await?;
    let name = screen
        .get(&id)
        .map(Employee::full_name)
        .ok_or_else(|| anyhow!("no employee with id {id}"))?;
    let mut confirm = PromptConfirm { assume_yes: yes };
    let outcome = screen
        .on_delete(&id, &mut confirm, &ctx.session, &ctx.source)
        .await?;
    report_notifications(&mut screen);
    match outcome {
        MutationOutcome::Applied => {
            info!(id = %id, employee = redact_value(&name), "employee deleted");
            Ok(())
        }
        MutationOutcome::Cancelled => {
            println!("Cancelled.");
            Ok(())
        }
        MutationOutcome::Failed => bail!("could not delete employee {id}"),
    }
}

pub async fn export_employees(ctx: &Context, filters: &ListArgs, output: &Path) -> Result<()> {
    let screen = load_screen::<Employee>(ctx, filters, ctx.settings.default_sort()).await?;
    let rows = matched(screen.items(), screen.filters());
    let pay_groups = lookup::<PayGroup>(ctx).await?;
    let file = File::create(output).with_context(|| format!("create {}", output.display()))?;
    let count = write_employees_csv(BufWriter::new(file), &rows, &pay_groups)?;
    info!(rows = count, path = %output.display(), "exported employees");
    println!("Exported {count} employees to {}", output.display());
    Ok(())
}

// =============================================================================
// Audit log
// =============================================================================

pub async fn list_audit(ctx: &Context, args: &ListArgs) -> Result<()> {
    let screen =
        load_screen::<AuditLogEntry>(ctx, args, Some(SortSpec::descending("timestamp"))).await?;
    let page = screen.view();
    println!("{}", render::audit_table(&page));
    println!("{}", render::footer(&page));
    Ok(())
}

pub async fn audit_stats(ctx: &Context, args: &WindowArgs) -> Result<()> {
    let window = AuditWindow {
        since: args.since,
        until: args.until,
    };
    if let (Some(since), Some(until)) = (window.since, window.until)
        && since > until
    {
        bail!("--since {since} is after --until {until}");
    }
    let entries = fetch_records::<AuditLogEntry, _>(&ctx.source, ctx.scope()?, None).await?;
    let in_window = window.apply(&entries);
    let stats = AuditStats::collect(&in_window);
    println!("{}", render::audit_stats_table(&stats));
    Ok(())
}

// =============================================================================
// Compliance
// =============================================================================

pub async fn list_compliance(
    ctx: &Context,
    args: &ListArgs,
    today: Option<NaiveDate>,
) -> Result<()> {
    let screen =
        load_screen::<ComplianceItem>(ctx, args, Some(SortSpec::ascending("due_date"))).await?;
    let employees = lookup::<Employee>(ctx).await?;
    let page = screen.view();
    println!(
        "{}",
        render::compliance_table(&page, &employees, today_or(today))
    );
    println!("{}", render::footer(&page));
    Ok(())
}

pub async fn remind_overdue(ctx: &Context, today: Option<NaiveDate>) -> Result<()> {
    let today = today_or(today);
    let scope = ctx.scope()?;
    let items: Vec<ComplianceItem> =
        fetch_records(&ctx.source, scope, Some(&OrderBy::asc("due_date"))).await?;
    let employees = lookup::<Employee>(ctx).await?;
    let mailer = OutboxMailer::new(ctx.settings.outbox_path());

    let report = send_overdue_reminders(
        &mailer,
        &items,
        &employees,
        &ctx.settings.mail.sender,
        today,
    )
    .await;
    println!(
        "Queued {} reminders ({} skipped) in {}",
        report.sent.len(),
        report.skipped(),
        mailer.path().display()
    );
    Ok(())
}

// =============================================================================
// Uploads and seeding
// =============================================================================

pub async fn upload(ctx: &Context, args: &UploadArgs) -> Result<()> {
    let storage = DirStorage::new(ctx.settings.storage_dir());
    let file = FileUpload::from_path(&args.file).await?;
    let stored = upload_checked(&storage, ctx.scope()?, args.field.into(), file).await?;
    println!(
        "Stored {}/{} ({} bytes, {})",
        stored.bucket, stored.path, stored.size, stored.content_type
    );
    Ok(())
}

pub async fn seed(ctx: &Context, args: &SeedArgs) -> Result<()> {
    let data = demo_data(args.employees, Local::now().date_naive())?;
    let summary = seed_tenant(&ctx.source, ctx.scope()?, &data).await?;
    println!(
        "Seeded tenant {}: {} employees, {} pay groups, {} audit entries, {} compliance items",
        ctx.scope()?,
        summary.employees,
        summary.pay_groups,
        summary.audit_logs,
        summary.compliance_items
    );
    Ok(())
}
