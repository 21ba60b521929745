use crate::db::connection::Database;
use crate::domain::tenant::ReminderStage;
use crate::errors::ServerError;
use crate::notify::{Notifier, NotifyError};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Fresh database at a unique temp path, with the production schema
/// applied.
pub fn make_test_db(prefix: &str) -> Database {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("{prefix}_{nanos}.sqlite"));

    let db = Database::new(path.to_string_lossy().to_string());
    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| ServerError::DbError(e.to_string()))?;
        Ok::<(), ServerError>(())
    })
    .expect("schema init failed");
    db
}

/// Insert a tenant directly, bypassing the API, so tests control the
/// balance and stage columns exactly. Returns the new row id.
#[allow(clippy::too_many_arguments)]
pub fn seed_tenant(
    db: &Database,
    full_name: &str,
    email: &str,
    phone: &str,
    contact_method: &str,
    monthly_rent: f64,
    rent_due_day: u32,
    balance_owing: f64,
    reminder_stage: &str,
) -> i64 {
    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO tenants (
                full_name, email, phone_number, property_name, unit_number,
                monthly_rent, rent_due_day, preferred_contact_method,
                balance_owing, reminder_stage
            ) VALUES (?1, ?2, ?3, 'Maple Court', '1A', ?4, ?5, ?6, ?7, ?8)
            "#,
            rusqlite::params![
                full_name,
                email,
                phone,
                monthly_rent,
                rent_due_day,
                contact_method,
                balance_owing,
                reminder_stage
            ],
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;
        Ok(conn.last_insert_rowid())
    })
    .expect("seed tenant failed")
}

pub fn set_balance_and_stage(db: &Database, id: i64, balance: f64, stage: &str) {
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE tenants SET balance_owing = ?1, reminder_stage = ?2 WHERE id = ?3",
            rusqlite::params![balance, stage, id],
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;
        Ok::<(), ServerError>(())
    })
    .expect("balance update failed");
}

#[derive(Debug)]
pub struct SentMessage {
    pub channel: &'static str,
    pub to: String,
    pub body: String,
    pub stage: ReminderStage,
}

/// In-memory notifier: records every send, optionally failing for one
/// recipient address to exercise fault isolation.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<SentMessage>>,
    pub fail_for: Option<String>,
}

impl RecordingNotifier {
    pub fn failing_for(address: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_for: Some(address.to_string()),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn record(
        &self,
        channel: &'static str,
        to: &str,
        body: &str,
        stage: ReminderStage,
    ) -> Result<(), NotifyError> {
        if self.fail_for.as_deref() == Some(to) {
            return Err(NotifyError::ApiError(format!("provider rejected {to}")));
        }
        self.sent.lock().unwrap().push(SentMessage {
            channel,
            to: to.to_string(),
            body: body.to_string(),
            stage,
        });
        Ok(())
    }
}

impl Notifier for RecordingNotifier {
    fn send_email(
        &self,
        to: &str,
        _subject: &str,
        body: &str,
        _tenant_id: i64,
        stage: ReminderStage,
    ) -> Result<(), NotifyError> {
        self.record("EMAIL", to, body, stage)
    }

    fn send_sms(
        &self,
        to: &str,
        body: &str,
        _tenant_id: i64,
        stage: ReminderStage,
    ) -> Result<(), NotifyError> {
        self.record("SMS", to, body, stage)
    }
}
