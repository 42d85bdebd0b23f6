//! Compliance tracker records.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::ComplianceStatus;
use crate::ids::ItemId;
use crate::item::{CollectionItem, Record, SortValue};

/// A single compliance requirement assigned to an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceItem {
    pub id: ItemId,
    pub employee_id: ItemId,
    /// Requirement title, e.g. "Annual harassment training".
    pub requirement: String,
    pub due_date: NaiveDate,
    pub status: ComplianceStatus,
}

impl ComplianceItem {
    /// Overdue when explicitly flagged, or when still pending past its due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.status {
            ComplianceStatus::Overdue => true,
            ComplianceStatus::Pending => self.due_date < today,
            ComplianceStatus::Completed | ComplianceStatus::Waived => false,
        }
    }
}

impl CollectionItem for ComplianceItem {
    type Status = ComplianceStatus;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn status(&self) -> ComplianceStatus {
        self.status
    }

    fn searchable_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.requirement.as_str()),
            Cow::Borrowed(self.employee_id.as_str()),
        ]
    }

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "due_date" => Some(SortValue::Date(self.due_date)),
            "requirement" => Some(SortValue::text(&self.requirement)),
            "status" => Some(SortValue::text(self.status.as_str())),
            _ => None,
        }
    }
}

impl Record for ComplianceItem {
    const TABLE: &'static str = "compliance_items";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(status: ComplianceStatus, due: &str) -> ComplianceItem {
        ComplianceItem {
            id: ItemId::new("c-1").unwrap(),
            employee_id: ItemId::new("emp-1").unwrap(),
            requirement: "I-9 verification".to_string(),
            due_date: due.parse().unwrap(),
            status,
        }
    }

    #[test]
    fn pending_items_become_overdue_after_due_date() {
        let today: NaiveDate = "2024-06-01".parse().unwrap();
        assert!(item(ComplianceStatus::Pending, "2024-05-31").is_overdue(today));
        assert!(!item(ComplianceStatus::Pending, "2024-06-01").is_overdue(today));
        assert!(!item(ComplianceStatus::Completed, "2020-01-01").is_overdue(today));
        assert!(item(ComplianceStatus::Overdue, "2030-01-01").is_overdue(today));
    }
}
