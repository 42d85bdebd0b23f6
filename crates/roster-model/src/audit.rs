//! Audit log entries.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{AuditAction, AuditSeverity};
use crate::ids::ItemId;
use crate::item::{CollectionItem, Record, SortValue};

/// One entry of the tenant's audit trail. Severity doubles as the filterable status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: ItemId,
    pub timestamp: DateTime<Utc>,
    /// Email or user id of whoever performed the action.
    pub actor: String,
    pub action: AuditAction,
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub severity: AuditSeverity,
    #[serde(default)]
    pub details: String,
}

impl CollectionItem for AuditLogEntry {
    type Status = AuditSeverity;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn status(&self) -> AuditSeverity {
        self.severity
    }

    fn searchable_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields = vec![
            Cow::Borrowed(self.actor.as_str()),
            Cow::Borrowed(self.resource_type.as_str()),
        ];
        if let Some(resource_id) = &self.resource_id {
            fields.push(Cow::Borrowed(resource_id.as_str()));
        }
        fields.push(Cow::Borrowed(self.details.as_str()));
        fields
    }

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "timestamp" => Some(SortValue::Timestamp(self.timestamp)),
            "actor" => Some(SortValue::text(&self.actor)),
            "action" => Some(SortValue::text(self.action.as_str())),
            "resource_type" => Some(SortValue::text(&self.resource_type)),
            "severity" => Some(SortValue::Number(self.severity as i64)),
            _ => None,
        }
    }
}

impl Record for AuditLogEntry {
    const TABLE: &'static str = "audit_logs";
}
