//! Audit log date windows and summary statistics.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use roster_model::{AuditAction, AuditLogEntry, AuditSeverity};
use serde::Serialize;

/// Inclusive calendar-date window over audit timestamps (UTC).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditWindow {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl AuditWindow {
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        let day = timestamp.date_naive();
        self.since.is_none_or(|since| day >= since) && self.until.is_none_or(|until| day <= until)
    }

    /// Entries inside the window, in their original order.
    pub fn apply(&self, entries: &[AuditLogEntry]) -> Vec<AuditLogEntry> {
        entries
            .iter()
            .filter(|entry| self.contains(entry.timestamp))
            .cloned()
            .collect()
    }
}

/// Counts over a set of audit entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditStats {
    pub total: usize,
    pub by_action: BTreeMap<AuditAction, usize>,
    pub by_severity: BTreeMap<AuditSeverity, usize>,
    pub distinct_actors: usize,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}

impl AuditStats {
    pub fn collect<'a>(entries: impl IntoIterator<Item = &'a AuditLogEntry>) -> Self {
        let mut stats = Self::default();
        let mut actors = BTreeSet::new();
        for entry in entries {
            stats.total += 1;
            *stats.by_action.entry(entry.action).or_default() += 1;
            *stats.by_severity.entry(entry.severity).or_default() += 1;
            actors.insert(entry.actor.as_str());
            stats.earliest = Some(stats.earliest.map_or(entry.timestamp, |t| t.min(entry.timestamp)));
            stats.latest = Some(stats.latest.map_or(entry.timestamp, |t| t.max(entry.timestamp)));
        }
        stats.distinct_actors = actors.len();
        stats
    }

    pub fn count_action(&self, action: AuditAction) -> usize {
        self.by_action.get(&action).copied().unwrap_or(0)
    }

    pub fn count_severity(&self, severity: AuditSeverity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }
}
