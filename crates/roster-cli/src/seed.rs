//! Demo data for a fresh tenant.

use anyhow::{Result, bail};
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use roster_model::{
    AuditAction, AuditLogEntry, AuditSeverity, ComplianceItem, ComplianceStatus, Employee,
    EmployeeStatus, ItemId, PayFrequency, PayGroup, Record,
};
use roster_source::{DataSource, TenantScope, insert_record};
use tracing::info;

const FIRST_NAMES: [&str; 12] = [
    "John", "Jane", "Maria", "Ahmed", "Li", "Olga", "Kwame", "Sofia", "Ravi", "Emma", "Diego",
    "Yuki",
];
const LAST_NAMES: [&str; 9] = [
    "Doe", "Roe", "Garcia", "Hassan", "Wei", "Ivanova", "Mensah", "Rossi", "Patel",
];
const DEPARTMENTS: [&str; 4] = ["Engineering", "Finance", "People", "Operations"];
const REQUIREMENTS: [&str; 4] = [
    "Annual harassment training",
    "Data protection refresher",
    "Fire safety briefing",
    "I-9 verification",
];

/// Largest demo tenant; keeps generated dates well inside chrono's range.
pub const MAX_DEMO_EMPLOYEES: usize = 10_000;

/// Records written by `roster seed`.
#[derive(Debug, Clone)]
pub struct DemoData {
    pub pay_groups: Vec<PayGroup>,
    pub employees: Vec<Employee>,
    pub audit_logs: Vec<AuditLogEntry>,
    pub compliance_items: Vec<ComplianceItem>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub pay_groups: usize,
    pub employees: usize,
    pub audit_logs: usize,
    pub compliance_items: usize,
}

fn id(prefix: &str, n: usize) -> Result<ItemId> {
    Ok(ItemId::new(format!("{prefix}-{n:03}"))?)
}

/// Deterministic demo records. Compliance due dates are relative to `today`.
pub fn demo_data(employee_count: usize, today: NaiveDate) -> Result<DemoData> {
    if employee_count > MAX_DEMO_EMPLOYEES {
        bail!("at most {MAX_DEMO_EMPLOYEES} demo employees are supported, got {employee_count}");
    }
    let pay_groups = vec![
        PayGroup {
            id: id("pg", 1)?,
            name: "Salaried".to_string(),
            frequency: PayFrequency::Monthly,
        },
        PayGroup {
            id: id("pg", 2)?,
            name: "Hourly".to_string(),
            frequency: PayFrequency::Biweekly,
        },
        PayGroup {
            id: id("pg", 3)?,
            name: "Contractors".to_string(),
            frequency: PayFrequency::Weekly,
        },
    ];

    let hired_from = NaiveDate::from_ymd_opt(2019, 1, 7).unwrap_or(today);
    let mut employees = Vec::with_capacity(employee_count);
    for n in 1..=employee_count {
        let first = FIRST_NAMES[(n - 1) % FIRST_NAMES.len()];
        let last = LAST_NAMES[(n * 7) % LAST_NAMES.len()];
        let status = match n % 10 {
            3 => EmployeeStatus::OnLeave,
            7 => EmployeeStatus::Inactive,
            9 => EmployeeStatus::Terminated,
            _ => EmployeeStatus::Active,
        };
        employees.push(Employee {
            id: id("emp", n)?,
            employee_number: format!("EMP-{n:04}"),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}.{}{n}@example.com", first.to_lowercase(), last.to_lowercase()),
            department: Some(DEPARTMENTS[n % DEPARTMENTS.len()].to_string()),
            job_title: None,
            status,
            // Every fifth employee has no pay group yet.
            pay_group_id: (n % 5 != 0).then(|| pay_groups[n % pay_groups.len()].id.clone()),
            hire_date: Some(hired_from + Duration::days(41 * n as i64)),
        });
    }

    let start = Utc.from_utc_datetime(&(today - Duration::days(30)).and_time(NaiveTime::MIN));
    let mut audit_logs = Vec::new();
    for (n, employee) in employees.iter().enumerate() {
        let (action, severity) = match n % 6 {
            0 => (AuditAction::Create, AuditSeverity::Info),
            1 => (AuditAction::View, AuditSeverity::Info),
            2 => (AuditAction::Update, AuditSeverity::Info),
            3 => (AuditAction::Export, AuditSeverity::Warning),
            4 => (AuditAction::Login, AuditSeverity::Info),
            _ => (AuditAction::Delete, AuditSeverity::Critical),
        };
        audit_logs.push(AuditLogEntry {
            id: id("log", n + 1)?,
            timestamp: start + Duration::hours(29 * n as i64),
            actor: if n % 3 == 0 { "admin" } else { "hr.manager" }.to_string(),
            action,
            resource_type: Employee::TABLE.to_string(),
            resource_id: Some(employee.id.to_string()),
            severity,
            details: format!("{} {}", action.label(), employee.employee_number),
        });
    }

    let mut compliance_items = Vec::new();
    for (n, employee) in employees.iter().enumerate().step_by(2) {
        let offset = n as i64 * 5 - 40;
        let status = match n % 8 {
            0 => ComplianceStatus::Completed,
            6 => ComplianceStatus::Waived,
            _ => ComplianceStatus::Pending,
        };
        compliance_items.push(ComplianceItem {
            id: id("cmp", n + 1)?,
            employee_id: employee.id.clone(),
            requirement: REQUIREMENTS[n % REQUIREMENTS.len()].to_string(),
            due_date: today + Duration::days(offset),
            status,
        });
    }

    Ok(DemoData {
        pay_groups,
        employees,
        audit_logs,
        compliance_items,
    })
}

async fn insert_all<T, S>(source: &S, scope: &TenantScope, records: &[T]) -> Result<usize>
where
    T: Record,
    S: DataSource,
{
    for record in records {
        insert_record(source, scope, record).await?;
    }
    Ok(records.len())
}

/// Insert `data` into an empty tenant. Refuses to touch a tenant that
/// already has employees.
pub async fn seed_tenant<S: DataSource>(
    source: &S,
    scope: &TenantScope,
    data: &DemoData,
) -> Result<SeedSummary> {
    if !source.query(scope, Employee::TABLE, None).await?.is_empty() {
        bail!("tenant {scope} already has employees; refusing to seed");
    }
    let summary = SeedSummary {
        pay_groups: insert_all(source, scope, &data.pay_groups).await?,
        employees: insert_all(source, scope, &data.employees).await?,
        audit_logs: insert_all(source, scope, &data.audit_logs).await?,
        compliance_items: insert_all(source, scope, &data.compliance_items).await?,
    };
    info!(tenant = %scope, employees = summary.employees, "seeded demo tenant");
    Ok(summary)
}
