use chrono::{DateTime, Utc};
use roster_model::{AuditAction, AuditLogEntry, AuditSeverity, ItemId};
use roster_view::{AuditStats, AuditWindow};

fn entry(n: u32, at: &str, actor: &str, action: AuditAction, severity: AuditSeverity) -> AuditLogEntry {
    AuditLogEntry {
        id: ItemId::new(format!("log-{n}")).unwrap(),
        timestamp: at.parse::<DateTime<Utc>>().unwrap(),
        actor: actor.to_string(),
        action,
        resource_type: "employee".to_string(),
        resource_id: Some(format!("emp-{n}")),
        severity,
        details: String::new(),
    }
}

fn sample_log() -> Vec<AuditLogEntry> {
    vec![
        entry(1, "2024-05-01T08:00:00Z", "admin@acme.test", AuditAction::Login, AuditSeverity::Info),
        entry(2, "2024-05-01T09:30:00Z", "admin@acme.test", AuditAction::Update, AuditSeverity::Info),
        entry(3, "2024-05-02T23:59:59Z", "hr@acme.test", AuditAction::Delete, AuditSeverity::Critical),
        entry(4, "2024-05-04T12:00:00Z", "hr@acme.test", AuditAction::Export, AuditSeverity::Warning),
    ]
}

#[test]
fn stats_count_actions_severities_and_actors() {
    let log = sample_log();
    let stats = AuditStats::collect(&log);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.count_action(AuditAction::Delete), 1);
    assert_eq!(stats.count_action(AuditAction::Logout), 0);
    assert_eq!(stats.count_severity(AuditSeverity::Info), 2);
    assert_eq!(stats.distinct_actors, 2);
    assert_eq!(stats.earliest, Some(log[0].timestamp));
    assert_eq!(stats.latest, Some(log[3].timestamp));
}

#[test]
fn window_is_inclusive_on_calendar_days() {
    let window = AuditWindow {
        since: Some("2024-05-02".parse().unwrap()),
        until: Some("2024-05-02".parse().unwrap()),
    };
    let inside = window.apply(&sample_log());
    assert_eq!(inside.len(), 1);
    assert_eq!(inside[0].id.as_str(), "log-3");

    let open = AuditWindow::default();
    assert_eq!(open.apply(&sample_log()).len(), 4);
}

#[test]
fn empty_stats_serialize_cleanly() {
    let stats = AuditStats::collect(Vec::<AuditLogEntry>::new().iter());
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["total"], 0);
    assert!(json["earliest"].is_null());

    let stats = AuditStats::collect(&sample_log());
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["by_action"]["delete"], 1);
}
