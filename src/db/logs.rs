// src/db/logs.rs
//
// Append-only audit trail of every message attempt. The workflow writes
// one row per channel; nothing in the core reads these back except the
// logs API endpoint.

use crate::db::connection::Database;
use crate::domain::tenant::ReminderStage;
use crate::errors::ServerError;
use base64::Engine;
use chrono::NaiveDateTime;
use rand::RngCore;
use rusqlite::params;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Channel {
    #[serde(rename = "EMAIL")]
    Email,
    #[serde(rename = "SMS")]
    Sms,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Email => "EMAIL",
            Channel::Sms => "SMS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeliveryStatus {
    #[serde(rename = "SENT")]
    Sent,
    #[serde(rename = "FAILED")]
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "SENT",
            DeliveryStatus::Failed => "FAILED",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommunicationLog {
    pub id: i64,
    pub tenant_id: i64,
    pub timestamp: NaiveDateTime,
    pub channel: String,
    pub message_type: String,
    pub status: String,
    pub content: String,
    pub message_ref: String,
}

pub struct NewLog {
    pub tenant_id: i64,
    pub timestamp: NaiveDateTime,
    pub channel: Channel,
    pub message_type: ReminderStage,
    pub status: DeliveryStatus,
    pub content: String,
}

/// 128-bit url-safe reference so a log row can be quoted back to a
/// tenant or a provider without exposing row ids.
fn generate_message_ref() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

pub fn create_log(db: &Database, log: &NewLog) -> Result<String, ServerError> {
    let message_ref = generate_message_ref();

    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO communication_logs (
                tenant_id, timestamp, channel, message_type, status, content, message_ref
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                log.tenant_id,
                log.timestamp,
                log.channel.as_str(),
                log.message_type.as_str(),
                log.status.as_str(),
                log.content,
                message_ref,
            ],
        )
        .map_err(|e| ServerError::DbError(format!("log insert failed: {e}")))?;
        Ok(())
    })?;

    Ok(message_ref)
}

pub fn logs_for_tenant(db: &Database, tenant_id: i64) -> Result<Vec<CommunicationLog>, ServerError> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(
                r#"
                SELECT
                    id,             -- 0
                    tenant_id,      -- 1
                    timestamp,      -- 2
                    channel,        -- 3
                    message_type,   -- 4
                    status,         -- 5
                    content,        -- 6
                    message_ref     -- 7
                FROM communication_logs
                WHERE tenant_id = ?
                ORDER BY timestamp DESC, id DESC
                "#,
            )
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        let rows = stmt
            .query_map(params![tenant_id], |row| {
                Ok(CommunicationLog {
                    id: row.get(0)?,
                    tenant_id: row.get(1)?,
                    timestamp: row.get(2)?,
                    channel: row.get(3)?,
                    message_type: row.get(4)?,
                    status: row.get(5)?,
                    content: row.get(6)?,
                    message_ref: row.get(7)?,
                })
            })
            .map_err(|e| ServerError::DbError(e.to_string()))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
        }
        Ok(out)
    })
}
