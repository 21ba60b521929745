// src/domain/classifier.rs

use crate::domain::calendar::{days_past_due, days_until_due};
use crate::domain::tenant::{ReminderStage, Tenant};
use chrono::NaiveDate;

/// A reminder the workflow should deliver: which stage fired and the
/// message body to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub stage: ReminderStage,
    pub body: String,
}

/// Decides which reminder, if any, a tenant is owed today.
///
/// Pure and deterministic: no I/O, no clock access; the caller supplies
/// `today`. The rules are checked in a fixed precedence order and the
/// first match wins:
///
/// 1. opted-out tenants are never contacted
/// 2. tenants whose lease ended before today are never contacted
/// 3. at most one message per calendar day
/// 4. pre-due nudge exactly 3 or 5 days out, while a full month is owed
/// 5. due-day notice, while a full month is owed
/// 6. late tiers at exactly 3/5 and 7/10 days past, FINAL at 14+ —
///    and FINAL only once per delinquency cycle
///
/// The exact-day cadence (3 or 5, not 3 through 5) is deliberate: a
/// sparse schedule, not daily nagging.
pub fn classify(tenant: &Tenant, today: NaiveDate) -> Option<Reminder> {
    if tenant.opted_out {
        return None;
    }

    if let Some(lease_end) = tenant.lease_end_date {
        if lease_end < today {
            return None;
        }
    }

    if let Some(last_sent) = tenant.last_message_sent {
        if last_sent.date() == today {
            return None;
        }
    }

    let until = days_until_due(tenant.rent_due_day, today);
    let past = days_past_due(tenant.rent_due_day, today);

    if (until == 3 || until == 5) && tenant.balance_owing >= tenant.monthly_rent {
        return Some(Reminder {
            stage: ReminderStage::PreDue,
            body: format!("Reminder: Your rent is due in {until} days."),
        });
    }

    if until == 0 && tenant.balance_owing >= tenant.monthly_rent {
        return Some(Reminder {
            stage: ReminderStage::Due,
            body: "Heads up! Your rent is due today.".to_string(),
        });
    }

    if tenant.balance_owing > 0.0 {
        if past == 3 || past == 5 {
            return Some(Reminder {
                stage: ReminderStage::Late1,
                body: "We noticed we haven't received your rent payment yet.".to_string(),
            });
        }

        if past == 7 || past == 10 {
            return Some(Reminder {
                stage: ReminderStage::Late2,
                body: format!("URGENT: Your rent is now {past} days overdue."),
            });
        }

        if past >= 14 && tenant.reminder_stage != ReminderStage::Final {
            return Some(Reminder {
                stage: ReminderStage::Final,
                body: "FINAL NOTICE: Your rent is significantly overdue.".to_string(),
            });
        }
    }

    None
}
