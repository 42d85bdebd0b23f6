use roster_model::{Employee, EmployeeStatus, ItemId, TenantId};
use roster_source::{
    DataSource, FileUpload, JsonDirSource, MemorySource, MemoryStorage, OrderBy, SourceError,
    TenantScope, UploadField, ValidationError, delete_record, fetch_records, insert_record,
    update_record, upload_checked,
};
use serde_json::json;

fn acme() -> TenantScope {
    TenantScope::new(TenantId::new("acme").unwrap())
}

fn employee(id: &str, first: &str, last: &str) -> Employee {
    Employee {
        id: ItemId::new(id).unwrap(),
        employee_number: format!("EMP-{id}"),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}@acme.test", first.to_lowercase()),
        department: None,
        job_title: None,
        status: EmployeeStatus::Active,
        pay_group_id: None,
        hire_date: None,
    }
}

#[tokio::test]
async fn json_dir_round_trips_records_per_tenant() {
    let dir = tempfile::tempdir().unwrap();
    let source = JsonDirSource::open(dir.path()).unwrap();
    let scope = acme();

    insert_record(&source, &scope, &employee("2", "Mary", "Smith")).await.unwrap();
    insert_record(&source, &scope, &employee("1", "John", "Doe")).await.unwrap();
    assert!(dir.path().join("acme/employees.json").exists());

    let ordered: Vec<Employee> = fetch_records(&source, &scope, Some(&OrderBy::asc("last_name")))
        .await
        .unwrap();
    let names: Vec<String> = ordered.iter().map(Employee::full_name).collect();
    assert_eq!(names, vec!["John Doe", "Mary Smith"]);

    let other = TenantScope::new(TenantId::new("globex").unwrap());
    let none: Vec<Employee> = fetch_records(&source, &other, None).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn json_dir_update_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let source = JsonDirSource::open(dir.path()).unwrap();
    let scope = acme();
    let id = ItemId::new("1").unwrap();
    insert_record(&source, &scope, &employee("1", "John", "Doe")).await.unwrap();

    let updated: Employee = update_record(&source, &scope, &id, json!({"status": "on_leave"}))
        .await
        .unwrap();
    assert_eq!(updated.status, EmployeeStatus::OnLeave);

    delete_record::<Employee, _>(&source, &scope, &id).await.unwrap();
    let err = delete_record::<Employee, _>(&source, &scope, &id).await.unwrap_err();
    assert!(matches!(err, SourceError::NotFound { .. }));
    assert!(source.query(&scope, "employees", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn json_dir_rejects_path_like_table_names() {
    let dir = tempfile::tempdir().unwrap();
    let source = JsonDirSource::open(dir.path()).unwrap();
    let err = source.query(&acme(), "../secrets", None).await.unwrap_err();
    assert!(matches!(err, SourceError::Rejected(_)));
}

#[tokio::test]
async fn malformed_rows_fail_to_decode() {
    let source = MemorySource::new();
    let scope = acme();
    source.seed(&scope, "employees", vec![json!({"id": "1", "first_name": "John"})]);
    let err = fetch_records::<Employee, _>(&source, &scope, None).await.unwrap_err();
    assert!(matches!(err, SourceError::Decode { .. }));
    assert_eq!(err.user_message(), "Something went wrong. Please try again.");
}

#[tokio::test]
async fn oversized_scorm_package_never_reaches_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("course.zip");
    let file = std::fs::File::create(&path).unwrap();
    file.set_len(120 * 1024 * 1024).unwrap();

    let storage = MemoryStorage::new();
    let upload = FileUpload::from_path(&path).await.unwrap();
    let err = upload_checked(&storage, &acme(), UploadField::ScormPackage, upload)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SourceError::Validation(ValidationError::FileTooLarge { .. })
    ));
    assert_eq!(storage.upload_count(), 0);
}

#[tokio::test]
async fn accepted_upload_is_stored_under_tenant_prefix() {
    let storage = MemoryStorage::new();
    let upload = FileUpload::from_bytes("index.html", b"<html></html>".to_vec());
    let stored = upload_checked(&storage, &acme(), UploadField::IndexFile, upload)
        .await
        .unwrap();

    assert_eq!(stored.bucket, "course-content");
    assert!(stored.path.starts_with("acme/"));
    assert!(stored.path.ends_with("-index.html"));
    assert_eq!(stored.content_type, "text/html");
    assert_eq!(storage.upload_count(), 1);
    assert_eq!(
        storage.get(&stored.bucket, &stored.path).as_deref(),
        Some(b"<html></html>".as_slice())
    );
}
