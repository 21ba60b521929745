// src/db/tenants.rs

use crate::db::connection::Database;
use crate::domain::tenant::{ContactMethod, NewTenant, ReminderStage, Tenant, TenantStatus};
use crate::errors::ServerError;
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

const TENANT_COLUMNS: &str = r#"
    id,                         -- 0
    full_name,                  -- 1
    email,                      -- 2
    phone_number,               -- 3
    property_name,              -- 4
    unit_number,                -- 5
    monthly_rent,               -- 6
    rent_due_day,               -- 7
    lease_start_date,           -- 8
    lease_end_date,             -- 9
    preferred_contact_method,   -- 10
    opted_out,                  -- 11
    last_payment_date,          -- 12
    last_payment_amount,        -- 13
    balance_owing,              -- 14
    status,                     -- 15
    last_message_sent,          -- 16
    reminder_stage,             -- 17
    notes                       -- 18
"#;

fn bad_code(idx: usize, what: &str, raw: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        format!("unknown {what}: {raw}").into(),
    )
}

fn tenant_from_row(row: &Row) -> rusqlite::Result<Tenant> {
    let contact_raw: String = row.get(10)?;
    let status_raw: String = row.get(15)?;
    let stage_raw: String = row.get(17)?;

    Ok(Tenant {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        phone_number: row.get(3)?,
        property_name: row.get(4)?,
        unit_number: row.get(5)?,
        monthly_rent: row.get(6)?,
        rent_due_day: row.get::<_, i64>(7)? as u32,
        lease_start_date: row.get(8)?,
        lease_end_date: row.get(9)?,
        preferred_contact_method: ContactMethod::parse(&contact_raw)
            .ok_or_else(|| bad_code(10, "contact method", &contact_raw))?,
        opted_out: row.get::<_, i64>(11)? != 0,
        last_payment_date: row.get(12)?,
        last_payment_amount: row.get(13)?,
        balance_owing: row.get(14)?,
        status: TenantStatus::parse(&status_raw)
            .ok_or_else(|| bad_code(15, "tenant status", &status_raw))?,
        last_message_sent: row.get(16)?,
        reminder_stage: ReminderStage::parse(&stage_raw)
            .ok_or_else(|| bad_code(17, "reminder stage", &stage_raw))?,
        notes: row.get(18)?,
    })
}

fn get_with_conn(conn: &Connection, id: i64) -> Result<Option<Tenant>, ServerError> {
    conn.query_row(
        &format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE id = ?"),
        params![id],
        tenant_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("tenant lookup failed: {e}")))
}

pub fn list_tenants(db: &Database) -> Result<Vec<Tenant>, ServerError> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(&format!("SELECT {TENANT_COLUMNS} FROM tenants ORDER BY id"))
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        let rows = stmt
            .query_map([], tenant_from_row)
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
        }
        Ok(out)
    })
}

pub fn get_tenant(db: &Database, id: i64) -> Result<Option<Tenant>, ServerError> {
    db.with_conn(|conn| get_with_conn(conn, id))
}

pub fn create_tenant(db: &Database, input: &NewTenant) -> Result<Tenant, ServerError> {
    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO tenants (
                full_name, email, phone_number, property_name, unit_number,
                monthly_rent, rent_due_day, lease_start_date, lease_end_date,
                preferred_contact_method, opted_out, balance_owing, status,
                reminder_stage, notes
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9,
                ?10, 0, 0, ?11,
                ?12, ?13
            )
            "#,
            params![
                input.full_name,
                input.email,
                input.phone_number,
                input.property_name,
                input.unit_number,
                input.monthly_rent,
                input.rent_due_day,
                input.lease_start_date,
                input.lease_end_date,
                input.preferred_contact_method.as_str(),
                TenantStatus::Paid.as_str(),
                ReminderStage::PreDue.as_str(),
                input.notes,
            ],
        )
        .map_err(|e| ServerError::DbError(format!("tenant insert failed: {e}")))?;

        let id = conn.last_insert_rowid();
        get_with_conn(conn, id)?.ok_or(ServerError::InternalError)
    })
}

/// Persist the outcome of a sent reminder: the send timestamp (drives
/// the one-message-per-day rule) and the stage that fired.
pub fn mark_reminded(
    db: &Database,
    id: i64,
    sent_at: NaiveDateTime,
    stage: ReminderStage,
) -> Result<(), ServerError> {
    db.with_conn(|conn| {
        let changed = conn
            .execute(
                "UPDATE tenants SET last_message_sent = ?1, reminder_stage = ?2 WHERE id = ?3",
                params![sent_at, stage.as_str(), id],
            )
            .map_err(|e| ServerError::DbError(format!("reminder update failed: {e}")))?;

        if changed == 0 {
            return Err(ServerError::NotFound);
        }
        Ok(())
    })
}

/// Record a payment. A payment that clears the balance resets the
/// reminder stage to PRE_DUE; a partial payment leaves the stage alone.
pub fn record_payment(
    db: &Database,
    id: i64,
    amount: f64,
    paid_at: NaiveDateTime,
) -> Result<Tenant, ServerError> {
    if amount <= 0.0 {
        return Err(ServerError::BadRequest(
            "Payment amount must be greater than 0".into(),
        ));
    }

    db.with_conn(|conn| {
        let tenant = get_with_conn(conn, id)?.ok_or(ServerError::NotFound)?;

        let new_balance = (tenant.balance_owing - amount).max(0.0);
        let (status, stage) = if new_balance == 0.0 {
            (TenantStatus::Paid, ReminderStage::PreDue)
        } else {
            (TenantStatus::Partial, tenant.reminder_stage)
        };

        conn.execute(
            r#"
            UPDATE tenants
            SET last_payment_date = ?1,
                last_payment_amount = ?2,
                balance_owing = ?3,
                status = ?4,
                reminder_stage = ?5
            WHERE id = ?6
            "#,
            params![
                paid_at,
                amount,
                new_balance,
                status.as_str(),
                stage.as_str(),
                id
            ],
        )
        .map_err(|e| ServerError::DbError(format!("payment update failed: {e}")))?;

        get_with_conn(conn, id)?.ok_or(ServerError::InternalError)
    })
}

pub fn opt_out(db: &Database, id: i64) -> Result<(), ServerError> {
    db.with_conn(|conn| {
        let changed = conn
            .execute("UPDATE tenants SET opted_out = 1 WHERE id = ?", params![id])
            .map_err(|e| ServerError::DbError(format!("opt-out update failed: {e}")))?;

        if changed == 0 {
            return Err(ServerError::NotFound);
        }
        Ok(())
    })
}
