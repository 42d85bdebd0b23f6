//! Payroll roster records.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::{EmployeeStatus, PayFrequency};
use crate::error::{ModelError, Result};
use crate::ids::ItemId;
use crate::item::{CollectionItem, Record, SortValue};

/// One employee on the payroll roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: ItemId,
    /// Display id shown next to the name, e.g. `EMP-0042`.
    pub employee_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub status: EmployeeStatus,
    /// Foreign key into the pay group table, resolved by lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_group_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<NaiveDate>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl CollectionItem for Employee {
    type Status = EmployeeStatus;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn status(&self) -> EmployeeStatus {
        self.status
    }

    fn searchable_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Owned(self.full_name()),
            Cow::Borrowed(&self.employee_number),
            Cow::Borrowed(&self.email),
        ]
    }

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "name" => Some(SortValue::Text(
                format!("{} {}", self.last_name, self.first_name).to_lowercase(),
            )),
            "first_name" => Some(SortValue::text(&self.first_name)),
            "last_name" => Some(SortValue::text(&self.last_name)),
            "employee_number" => Some(SortValue::text(&self.employee_number)),
            "email" => Some(SortValue::text(&self.email)),
            "department" => self.department.as_deref().map(SortValue::text),
            "status" => Some(SortValue::text(self.status.as_str())),
            "hire_date" => self.hire_date.map(SortValue::Date),
            _ => None,
        }
    }
}

impl Record for Employee {
    const TABLE: &'static str = "employees";

    fn validate(&self) -> Result<()> {
        if self.employee_number.trim().is_empty() {
            return Err(ModelError::MissingField("employee_number"));
        }
        if self.first_name.trim().is_empty() {
            return Err(ModelError::MissingField("first_name"));
        }
        if self.last_name.trim().is_empty() {
            return Err(ModelError::MissingField("last_name"));
        }
        if self.email.trim().is_empty() {
            return Err(ModelError::MissingField("email"));
        }
        Ok(())
    }
}

/// A pay group employees are assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayGroup {
    pub id: ItemId,
    pub name: String,
    pub frequency: PayFrequency,
}

impl CollectionItem for PayGroup {
    type Status = PayFrequency;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn status(&self) -> PayFrequency {
        self.frequency
    }

    fn searchable_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(&self.name)]
    }

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        (field == "name").then(|| SortValue::text(&self.name))
    }
}

impl Record for PayGroup {
    const TABLE: &'static str = "pay_groups";
}
