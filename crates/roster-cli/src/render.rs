//! Terminal tables for list screens.

use chrono::NaiveDate;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use roster_model::{
    AuditAction, AuditLogEntry, AuditSeverity, CollectionItem, ComplianceItem, ComplianceStatus,
    Employee, EmployeeStatus, PayGroup, SelectionSet,
};
use roster_view::{AuditStats, Lookup, ViewPage};

/// Paging line shown under a table, e.g. `Showing 11-20 of 23 (page 2 of 3)`.
pub fn footer<T: CollectionItem>(page: &ViewPage<'_, T>) -> String {
    if page.is_empty() {
        return "No matching rows".to_string();
    }
    format!(
        "Showing {}-{} of {} (page {} of {})",
        page.first_row(),
        page.last_row(),
        page.total,
        page.page,
        page.page_count
    )
}

pub fn employee_table(
    page: &ViewPage<'_, Employee>,
    pay_groups: &Lookup<PayGroup>,
    selection: &SelectionSet,
) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(""),
        header_cell("Number"),
        header_cell("Name"),
        header_cell("Email"),
        header_cell("Department"),
        header_cell("Pay group"),
        header_cell("Status"),
        header_cell("Hired"),
    ]);
    apply_table_style(&mut table);
    for employee in &page.rows {
        table.add_row(vec![
            selection_cell(selection.contains(&employee.id)),
            Cell::new(&employee.employee_number),
            Cell::new(employee.full_name()).add_attribute(Attribute::Bold),
            Cell::new(&employee.email),
            optional_cell(employee.department.as_deref()),
            optional_cell(pay_groups.pay_group_name(employee)),
            employee_status_cell(employee.status),
            optional_cell(employee.hire_date.map(|d| d.to_string()).as_deref()),
        ]);
    }
    table
}

/// Key/value table for a single employee.
pub fn employee_detail(employee: &Employee, pay_groups: &Lookup<PayGroup>) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);
    let rows: [(&str, Cell); 9] = [
        ("Id", Cell::new(&employee.id)),
        ("Number", Cell::new(&employee.employee_number)),
        ("Name", Cell::new(employee.full_name())),
        ("Email", Cell::new(&employee.email)),
        ("Department", optional_cell(employee.department.as_deref())),
        ("Job title", optional_cell(employee.job_title.as_deref())),
        ("Pay group", optional_cell(pay_groups.pay_group_name(employee))),
        ("Status", employee_status_cell(employee.status)),
        (
            "Hired",
            optional_cell(employee.hire_date.map(|d| d.to_string()).as_deref()),
        ),
    ];
    for (label, value) in rows {
        table.add_row(vec![header_cell(label), value]);
    }
    table
}

pub fn audit_table(page: &ViewPage<'_, AuditLogEntry>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Time (UTC)"),
        header_cell("Actor"),
        header_cell("Action"),
        header_cell("Resource"),
        header_cell("Severity"),
        header_cell("Details"),
    ]);
    apply_table_style(&mut table);
    for entry in &page.rows {
        let resource = match &entry.resource_id {
            Some(id) => format!("{}/{id}", entry.resource_type),
            None => entry.resource_type.clone(),
        };
        table.add_row(vec![
            Cell::new(entry.timestamp.format("%Y-%m-%d %H:%M")),
            Cell::new(&entry.actor),
            Cell::new(entry.action.label()),
            Cell::new(resource),
            severity_cell(entry.severity),
            dim_cell(&entry.details),
        ]);
    }
    table
}

pub fn audit_stats_table(stats: &AuditStats) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Entries").add_attribute(Attribute::Bold),
        Cell::new(stats.total).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Distinct actors"), Cell::new(stats.distinct_actors)]);
    for action in AuditAction::ALL {
        table.add_row(vec![
            Cell::new(format!("Action: {}", action.label())),
            count_cell(stats.count_action(*action), Color::Cyan),
        ]);
    }
    for severity in AuditSeverity::ALL {
        table.add_row(vec![
            Cell::new(format!("Severity: {}", severity.label())),
            count_cell(stats.count_severity(*severity), severity_color(*severity)),
        ]);
    }
    if let (Some(earliest), Some(latest)) = (stats.earliest, stats.latest) {
        table.add_row(vec![
            Cell::new("Range"),
            dim_cell(format!(
                "{} .. {}",
                earliest.format("%Y-%m-%d"),
                latest.format("%Y-%m-%d")
            )),
        ]);
    }
    table
}

pub fn compliance_table(
    page: &ViewPage<'_, ComplianceItem>,
    employees: &Lookup<Employee>,
    today: NaiveDate,
) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Requirement"),
        header_cell("Employee"),
        header_cell("Due"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    for item in &page.rows {
        let employee = employees
            .get(&item.employee_id)
            .map_or_else(|| item.employee_id.to_string(), Employee::full_name);
        let due = if item.is_overdue(today) {
            Cell::new(item.due_date)
                .fg(Color::Red)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(item.due_date)
        };
        table.add_row(vec![
            Cell::new(&item.requirement),
            Cell::new(employee),
            due,
            compliance_status_cell(item.status),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn selection_cell(selected: bool) -> Cell {
    if selected {
        Cell::new("[x]").fg(Color::Green)
    } else {
        dim_cell("[ ]")
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn employee_status_cell(status: EmployeeStatus) -> Cell {
    let color = match status {
        EmployeeStatus::Active => Color::Green,
        EmployeeStatus::OnLeave => Color::Yellow,
        EmployeeStatus::Inactive => Color::DarkGrey,
        EmployeeStatus::Terminated => Color::Red,
    };
    Cell::new(status.label()).fg(color)
}

fn compliance_status_cell(status: ComplianceStatus) -> Cell {
    let color = match status {
        ComplianceStatus::Completed => Color::Green,
        ComplianceStatus::Pending => Color::Yellow,
        ComplianceStatus::Overdue => Color::Red,
        ComplianceStatus::Waived => Color::DarkGrey,
    };
    Cell::new(status.label()).fg(color)
}

fn severity_color(severity: AuditSeverity) -> Color {
    match severity {
        AuditSeverity::Info => Color::Blue,
        AuditSeverity::Warning => Color::Yellow,
        AuditSeverity::Critical => Color::Red,
    }
}

fn severity_cell(severity: AuditSeverity) -> Cell {
    Cell::new(severity.label()).fg(severity_color(severity))
}
