//! Reminder emails for overdue compliance items.

use chrono::NaiveDate;
use roster_model::{ComplianceItem, Employee, ItemId};
use roster_source::{EmailPayload, Mailer, MessageId};
use roster_view::Lookup;
use tracing::{info, warn};

use crate::logging::redact_value;

/// What happened to each overdue item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderReport {
    pub sent: Vec<(ItemId, MessageId)>,
    /// Overdue items whose employee no longer exists.
    pub missing_employee: Vec<ItemId>,
    /// Items the mailer refused, with its error.
    pub failed: Vec<(ItemId, String)>,
}

impl ReminderReport {
    pub fn skipped(&self) -> usize {
        self.missing_employee.len() + self.failed.len()
    }
}

/// The reminder for one overdue item.
pub fn reminder(item: &ComplianceItem, employee: &Employee, reply_to: &str) -> EmailPayload {
    let mut payload = EmailPayload::new(
        employee.email.as_str(),
        format!("Overdue: {}", item.requirement),
        format!(
            "Hi {},\n\n\"{}\" was due on {}. Please complete it as soon as possible.\n",
            employee.first_name, item.requirement, item.due_date
        ),
    );
    payload.reply_to = Some(reply_to.to_string());
    payload
}

/// Send one reminder per item overdue on `today`. Items are processed in
/// the given order; a failed send does not stop the rest.
pub async fn send_overdue_reminders<M: Mailer>(
    mailer: &M,
    items: &[ComplianceItem],
    employees: &Lookup<Employee>,
    reply_to: &str,
    today: NaiveDate,
) -> ReminderReport {
    let mut report = ReminderReport::default();
    for item in items.iter().filter(|item| item.is_overdue(today)) {
        let Some(employee) = employees.get(&item.employee_id) else {
            warn!(item = %item.id, "compliance item has no matching employee; skipping");
            report.missing_employee.push(item.id.clone());
            continue;
        };
        match mailer.send_email(&reminder(item, employee, reply_to)).await {
            Ok(message_id) => {
                info!(to = redact_value(&employee.email), %message_id, "reminder queued");
                report.sent.push((item.id.clone(), message_id));
            }
            Err(error) => {
                warn!(to = redact_value(&employee.email), %error, "reminder not sent");
                report.failed.push((item.id.clone(), error.to_string()));
            }
        }
    }
    info!(
        %today,
        sent = report.sent.len(),
        skipped = report.skipped(),
        "overdue reminders processed"
    );
    report
}
