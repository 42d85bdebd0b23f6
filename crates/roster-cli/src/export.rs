//! CSV export of matched employee rows.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use roster_model::{Employee, EmployeeStatus, PayGroup};
use roster_view::Lookup;
use serde::Serialize;

const HEADERS: [&str; 9] = [
    "employee_number",
    "first_name",
    "last_name",
    "email",
    "department",
    "job_title",
    "pay_group",
    "status",
    "hire_date",
];

#[derive(Serialize)]
struct EmployeeCsvRow<'a> {
    employee_number: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    department: Option<&'a str>,
    job_title: Option<&'a str>,
    pay_group: Option<&'a str>,
    status: EmployeeStatus,
    hire_date: Option<NaiveDate>,
}

/// Write `rows` as CSV. The header line is written even when `rows` is empty.
/// Returns the number of data rows.
pub fn write_employees_csv<W: Write>(
    writer: W,
    rows: &[&Employee],
    pay_groups: &Lookup<PayGroup>,
) -> Result<usize> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(HEADERS).context("write csv header")?;
    for employee in rows {
        csv.serialize(EmployeeCsvRow {
            employee_number: &employee.employee_number,
            first_name: &employee.first_name,
            last_name: &employee.last_name,
            email: &employee.email,
            department: employee.department.as_deref(),
            job_title: employee.job_title.as_deref(),
            pay_group: pay_groups.pay_group_name(employee),
            status: employee.status,
            hire_date: employee.hire_date,
        })
        .with_context(|| format!("write row for {}", employee.id))?;
    }
    csv.flush().context("flush csv output")?;
    Ok(rows.len())
}
