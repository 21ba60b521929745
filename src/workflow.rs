// src/workflow.rs
//
// One pass of the daily reminder workflow: load every tenant, classify
// each against today's date, deliver whatever fired, and persist the
// state transition. A failure while processing one tenant never stops
// the rest of the batch.

use crate::db::connection::Database;
use crate::db::logs::{self, Channel, DeliveryStatus, NewLog};
use crate::db::tenants;
use crate::domain::classifier::{classify, Reminder};
use crate::domain::tenant::{ContactMethod, ReminderStage, Tenant};
use crate::errors::ServerError;
use crate::notify::Notifier;
use chrono::{NaiveDateTime, Utc};
use serde::Serialize;

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub evaluated: usize,
    pub sent: usize,
    pub skipped: usize,
    pub errored: usize,
}

enum Outcome {
    Sent(ReminderStage),
    Skipped,
    Failed(String),
}

pub fn run_daily_check(db: &Database, notifier: &dyn Notifier) -> Result<Summary, ServerError> {
    run_daily_check_at(db, notifier, Utc::now().naive_utc())
}

/// Injectable-clock variant so tests can pin a pass to a known date.
pub fn run_daily_check_at(
    db: &Database,
    notifier: &dyn Notifier,
    now: NaiveDateTime,
) -> Result<Summary, ServerError> {
    println!("[workflow] starting daily check");

    let all_tenants = tenants::list_tenants(db)?;

    // Each tenant is processed independently; errors are folded into
    // the outcome rather than propagated, so one bad tenant cannot
    // abort the batch.
    let outcomes: Vec<Outcome> = all_tenants
        .iter()
        .map(|tenant| process_tenant(db, notifier, tenant, now))
        .collect();

    let mut summary = Summary {
        evaluated: outcomes.len(),
        ..Default::default()
    };

    for (tenant, outcome) in all_tenants.iter().zip(&outcomes) {
        match outcome {
            Outcome::Sent(stage) => {
                println!("[workflow] sent {} to tenant {}", stage.as_str(), tenant.id);
                summary.sent += 1;
            }
            Outcome::Skipped => summary.skipped += 1,
            Outcome::Failed(msg) => {
                eprintln!("[workflow] error processing tenant {}: {msg}", tenant.id);
                summary.errored += 1;
            }
        }
    }

    println!(
        "[workflow] daily check completed: {} evaluated, {} sent, {} skipped, {} errored",
        summary.evaluated, summary.sent, summary.skipped, summary.errored
    );
    Ok(summary)
}

fn process_tenant(
    db: &Database,
    notifier: &dyn Notifier,
    tenant: &Tenant,
    now: NaiveDateTime,
) -> Outcome {
    let Some(reminder) = classify(tenant, now.date()) else {
        return Outcome::Skipped;
    };

    match deliver(db, notifier, tenant, &reminder, now) {
        Ok(()) => Outcome::Sent(reminder.stage),
        Err(e) => Outcome::Failed(e.to_string()),
    }
}

/// Send on the tenant's preferred channel(s), then persist the
/// transition. The tenant state is only updated after every channel
/// succeeded, so a failed send is retried on the next pass.
fn deliver(
    db: &Database,
    notifier: &dyn Notifier,
    tenant: &Tenant,
    reminder: &Reminder,
    now: NaiveDateTime,
) -> Result<(), ServerError> {
    let subject = format!("Rent Notification: {}", reminder.stage.as_str());

    if matches!(
        tenant.preferred_contact_method,
        ContactMethod::Email | ContactMethod::Both
    ) {
        send_on_channel(db, notifier, tenant, reminder, now, Channel::Email, &subject)?;
    }

    if matches!(
        tenant.preferred_contact_method,
        ContactMethod::Sms | ContactMethod::Both
    ) {
        send_on_channel(db, notifier, tenant, reminder, now, Channel::Sms, &subject)?;
    }

    tenants::mark_reminded(db, tenant.id, now, reminder.stage)
}

fn send_on_channel(
    db: &Database,
    notifier: &dyn Notifier,
    tenant: &Tenant,
    reminder: &Reminder,
    now: NaiveDateTime,
    channel: Channel,
    subject: &str,
) -> Result<(), ServerError> {
    let result = match channel {
        Channel::Email => notifier.send_email(
            &tenant.email,
            subject,
            &reminder.body,
            tenant.id,
            reminder.stage,
        ),
        Channel::Sms => notifier.send_sms(&tenant.phone_number, &reminder.body, tenant.id, reminder.stage),
    };

    let status = if result.is_ok() {
        DeliveryStatus::Sent
    } else {
        DeliveryStatus::Failed
    };

    let content = match channel {
        Channel::Email => format!("Subject: {subject}\nBody: {}", reminder.body),
        Channel::Sms => reminder.body.clone(),
    };

    logs::create_log(
        db,
        &NewLog {
            tenant_id: tenant.id,
            timestamp: now,
            channel,
            message_type: reminder.stage,
            status,
            content,
        },
    )?;

    result.map_err(|e| ServerError::NotifyError(e.to_string()))
}
