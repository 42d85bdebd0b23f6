//! Integration tests for the `roster` library components.

use chrono::NaiveDate;
use roster_cli::config::Settings;
use roster_cli::export::write_employees_csv;
use roster_cli::remind::{ReminderReport, send_overdue_reminders};
use roster_cli::render::footer;
use roster_cli::seed::{MAX_DEMO_EMPLOYEES, demo_data, seed_tenant};
use roster_model::{Employee, EmployeeStatus, ItemId, PageSize, Record, TenantId};
use roster_source::{JsonDirSource, MemoryMailer, TenantScope, fetch_records};
use roster_view::{Lookup, ViewPage};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
}

#[test]
fn footer_describes_visible_range() {
    let data = demo_data(23, today()).unwrap();
    let page = ViewPage::from_matched(data.employees.iter().collect(), 2, 10);
    insta::assert_snapshot!(footer(&page), @"Showing 11-20 of 23 (page 2 of 3)");

    let last = ViewPage::from_matched(data.employees.iter().collect(), 9, 10);
    insta::assert_snapshot!(footer(&last), @"Showing 21-23 of 23 (page 3 of 3)");

    let none = ViewPage::<Employee>::from_matched(Vec::new(), 1, 10);
    insta::assert_snapshot!(footer(&none), @"No matching rows");
}

#[test]
fn csv_export_resolves_pay_groups() {
    let data = demo_data(5, today()).unwrap();
    let groups = Lookup::new(data.pay_groups.clone());
    let rows: Vec<&Employee> = data
        .employees
        .iter()
        .filter(|e| e.id.as_str() == "emp-001" || e.id.as_str() == "emp-005")
        .collect();

    let mut out = Vec::new();
    let written = write_employees_csv(&mut out, &rows, &groups).unwrap();
    assert_eq!(written, 2);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "employee_number,first_name,last_name,email,department,job_title,pay_group,status,hire_date"
    );
    assert_eq!(
        lines[1],
        "EMP-0001,John,Rossi,john.rossi1@example.com,Finance,,Hourly,active,2019-02-17"
    );
    // emp-005 has no pay group.
    assert!(lines[2].starts_with("EMP-0005,"));
    assert!(lines[2].contains(",,,"));
}

#[test]
fn csv_export_of_nothing_still_has_header() {
    let groups = Lookup::new(Vec::new());
    let mut out = Vec::new();
    assert_eq!(write_employees_csv(&mut out, &[], &groups).unwrap(), 0);
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
}

#[test]
fn demo_data_is_deterministic() {
    let first = demo_data(23, today()).unwrap();
    let second = demo_data(23, today()).unwrap();
    assert_eq!(first.employees, second.employees);
    assert_eq!(first.employees.len(), 23);
    assert!(first.employees.iter().all(|e| e.validate().is_ok()));
    assert_eq!(
        first
            .employees
            .iter()
            .filter(|e| e.pay_group_id.is_none())
            .count(),
        4
    );
    assert_eq!(
        first
            .employees
            .iter()
            .filter(|e| e.status == EmployeeStatus::Terminated)
            .count(),
        2
    );

    let overdue: Vec<_> = first
        .compliance_items
        .iter()
        .filter(|item| item.is_overdue(today()))
        .map(|item| item.id.as_str())
        .collect();
    assert_eq!(overdue, ["cmp-003", "cmp-005"]);
}

#[test]
fn demo_data_is_capped() {
    let largest = demo_data(MAX_DEMO_EMPLOYEES, today()).unwrap();
    assert_eq!(largest.employees.len(), MAX_DEMO_EMPLOYEES);
    let err = demo_data(MAX_DEMO_EMPLOYEES + 1, today()).unwrap_err();
    assert!(err.to_string().contains("at most"));
}

#[tokio::test]
async fn reminders_go_out_per_overdue_item() {
    let data = demo_data(23, today()).unwrap();
    let id = |value: &str| ItemId::new(value).unwrap();

    // cmp-003 belongs to emp-003, which has since been removed.
    let mut employees: Vec<Employee> = data
        .employees
        .iter()
        .filter(|e| e.id != id("emp-003"))
        .cloned()
        .collect();
    // emp-005 has no usable address, so the mailer refuses it.
    for employee in &mut employees {
        if employee.id == id("emp-005") {
            employee.email = String::new();
        }
    }
    let mut items = data.compliance_items.clone();
    let mut extra = items[2].clone();
    extra.id = id("cmp-900");
    extra.employee_id = id("emp-007");
    items.push(extra);

    let mailer = MemoryMailer::new();
    let report = send_overdue_reminders(
        &mailer,
        &items,
        &Lookup::new(employees),
        "hr@acme.test",
        today(),
    )
    .await;

    assert_eq!(report.missing_employee, vec![id("cmp-003")]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, id("cmp-005"));
    assert_eq!(report.sent.len(), 1);
    assert_eq!(report.sent[0].0, id("cmp-900"));
    assert_eq!(report.skipped(), 2);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    let (message_id, payload) = &sent[0];
    assert_eq!(message_id, &report.sent[0].1);
    assert_eq!(payload.to, vec!["kwame.wei7@example.com".to_string()]);
    assert_eq!(payload.reply_to.as_deref(), Some("hr@acme.test"));
    assert!(payload.subject.starts_with("Overdue: "));
}

#[tokio::test]
async fn no_reminders_when_nothing_is_overdue() {
    let data = demo_data(23, today()).unwrap();
    let mailer = MemoryMailer::new();
    let early = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let report = send_overdue_reminders(
        &mailer,
        &data.compliance_items,
        &Lookup::new(data.employees.clone()),
        "hr@acme.test",
        early,
    )
    .await;
    assert_eq!(report, ReminderReport::default());
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn seeding_refuses_a_populated_tenant() {
    let dir = tempfile::tempdir().unwrap();
    let source = JsonDirSource::open(dir.path()).unwrap();
    let scope = TenantScope::new(TenantId::new("acme").unwrap());
    let data = demo_data(7, today()).unwrap();

    let summary = seed_tenant(&source, &scope, &data).await.unwrap();
    assert_eq!(summary.employees, 7);
    assert_eq!(summary.audit_logs, 7);
    assert_eq!(summary.compliance_items, 4);

    let stored: Vec<Employee> = fetch_records(&source, &scope, None).await.unwrap();
    assert_eq!(stored.len(), 7);

    let err = seed_tenant(&source, &scope, &data).await.unwrap_err();
    assert!(err.to_string().contains("already has employees"));

    // Other tenants are untouched.
    let other = TenantScope::new(TenantId::new("globex").unwrap());
    let empty: Vec<Employee> = fetch_records(&source, &other, None).await.unwrap();
    assert!(empty.is_empty());
}

#[test]
fn settings_round_trip_through_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    let mut settings = Settings::default();
    settings.general.tenant = "acme".to_string();
    settings.display.page_size = PageSize::Twenty;
    settings.display.sort = Some("last_name:desc".to_string());
    settings.save_to(&path).unwrap();

    let loaded = Settings::load_from(&path);
    assert_eq!(loaded, settings);
    assert_eq!(loaded.default_sort().unwrap().field, "last_name");
}
