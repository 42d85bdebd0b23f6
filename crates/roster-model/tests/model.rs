use roster_model::{
    AuditLogEntry, AuditSeverity, CollectionItem, Employee, EmployeeStatus, ItemId, ModelError,
    PageSize, SortValue, StatusFilter,
};

#[test]
fn employee_round_trips_from_table_row() {
    let row = serde_json::json!({
        "id": "emp-42",
        "employee_number": "EMP-0042",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "status": "on_leave",
        "pay_group_id": "pg-1",
        "hire_date": "2021-03-15"
    });
    let employee: Employee = serde_json::from_value(row).expect("deserialize employee");
    assert_eq!(employee.status, EmployeeStatus::OnLeave);
    assert_eq!(employee.pay_group_id, Some(ItemId::new("pg-1").unwrap()));
    assert_eq!(
        employee.sort_value("hire_date"),
        Some(SortValue::Date("2021-03-15".parse().unwrap()))
    );
    assert_eq!(employee.sort_value("unknown"), None);
}

#[test]
fn row_with_blank_id_is_rejected() {
    let row = serde_json::json!({
        "id": " ",
        "employee_number": "EMP-0001",
        "first_name": "A",
        "last_name": "B",
        "email": "a@b.c",
        "status": "active"
    });
    assert!(serde_json::from_value::<Employee>(row).is_err());
}

#[test]
fn audit_entry_filters_on_severity() {
    let row = serde_json::json!({
        "id": "log-1",
        "timestamp": "2024-05-01T10:00:00Z",
        "actor": "admin@example.com",
        "action": "delete",
        "resource_type": "employee",
        "resource_id": "emp-9",
        "severity": "critical"
    });
    let entry: AuditLogEntry = serde_json::from_value(row).expect("deserialize entry");
    assert!(StatusFilter::Only(AuditSeverity::Critical).matches(entry.status()));
    assert!(entry.details.is_empty());
    assert_eq!(entry.searchable_fields().len(), 4);
}

#[test]
fn status_filter_parses_all_and_single_values() {
    let all: StatusFilter<EmployeeStatus> = StatusFilter::parse("ALL").unwrap();
    assert_eq!(all, StatusFilter::All);
    let only: StatusFilter<EmployeeStatus> = StatusFilter::parse("terminated").unwrap();
    assert_eq!(only, StatusFilter::Only(EmployeeStatus::Terminated));
    assert!(matches!(
        StatusFilter::<EmployeeStatus>::parse("fired"),
        Err(ModelError::UnknownStatus { .. })
    ));
}

#[test]
fn page_size_deserializes_from_number() {
    let size: PageSize = serde_json::from_str("50").unwrap();
    assert_eq!(size, PageSize::Fifty);
    assert!(serde_json::from_str::<PageSize>("15").is_err());
}
