// src/domain/tenant.rs
//
// Tenant domain model and the string codes used for its enum columns.
// Storage keeps the codes as TEXT; the JSON API uses the same codes.

use crate::errors::ServerError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Stage of the most recent reminder sent to a tenant. Governs which
/// future reminders are still eligible (FINAL is sent at most once).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderStage {
    #[serde(rename = "PRE_DUE")]
    PreDue,
    #[serde(rename = "DUE")]
    Due,
    #[serde(rename = "LATE_1")]
    Late1,
    #[serde(rename = "LATE_2")]
    Late2,
    #[serde(rename = "FINAL")]
    Final,
}

impl ReminderStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ReminderStage::PreDue => "PRE_DUE",
            ReminderStage::Due => "DUE",
            ReminderStage::Late1 => "LATE_1",
            ReminderStage::Late2 => "LATE_2",
            ReminderStage::Final => "FINAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PRE_DUE" => Some(ReminderStage::PreDue),
            "DUE" => Some(ReminderStage::Due),
            "LATE_1" => Some(ReminderStage::Late1),
            "LATE_2" => Some(ReminderStage::Late2),
            "FINAL" => Some(ReminderStage::Final),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactMethod {
    #[serde(rename = "EMAIL")]
    Email,
    #[serde(rename = "SMS")]
    Sms,
    #[serde(rename = "BOTH")]
    Both,
}

impl ContactMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactMethod::Email => "EMAIL",
            ContactMethod::Sms => "SMS",
            ContactMethod::Both => "BOTH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EMAIL" => Some(ContactMethod::Email),
            "SMS" => Some(ContactMethod::Sms),
            "BOTH" => Some(ContactMethod::Both),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TenantStatus {
    #[serde(rename = "PAID")]
    Paid,
    #[serde(rename = "LATE")]
    Late,
    #[serde(rename = "PARTIAL")]
    Partial,
    #[serde(rename = "DELINQUENT")]
    Delinquent,
}

impl TenantStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TenantStatus::Paid => "PAID",
            TenantStatus::Late => "LATE",
            TenantStatus::Partial => "PARTIAL",
            TenantStatus::Delinquent => "DELINQUENT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PAID" => Some(TenantStatus::Paid),
            "LATE" => Some(TenantStatus::Late),
            "PARTIAL" => Some(TenantStatus::Partial),
            "DELINQUENT" => Some(TenantStatus::Delinquent),
            _ => None,
        }
    }
}

/// Tenant row as seen by the workflow and the API.
/// `opted_out` is a real bool here; the 0/1 convention lives in the store.
#[derive(Debug, Clone, Serialize)]
pub struct Tenant {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub property_name: String,
    pub unit_number: String,
    pub monthly_rent: f64,
    pub rent_due_day: u32,
    pub lease_start_date: Option<NaiveDate>,
    pub lease_end_date: Option<NaiveDate>,
    pub preferred_contact_method: ContactMethod,
    pub opted_out: bool,
    pub last_payment_date: Option<NaiveDateTime>,
    pub last_payment_amount: Option<f64>,
    pub balance_owing: f64,
    pub status: TenantStatus,
    pub last_message_sent: Option<NaiveDateTime>,
    pub reminder_stage: ReminderStage,
    pub notes: Option<String>,
}

/// Creation payload (API request). System-managed fields (status,
/// reminder stage, balance, opt-out) are defaulted by the store.
#[derive(Debug, Deserialize)]
pub struct NewTenant {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub property_name: String,
    pub unit_number: String,
    pub monthly_rent: f64,
    pub rent_due_day: u32,
    pub lease_start_date: Option<NaiveDate>,
    pub lease_end_date: Option<NaiveDate>,
    pub preferred_contact_method: ContactMethod,
    pub notes: Option<String>,
}

impl NewTenant {
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.full_name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(ServerError::BadRequest(
                "Missing required tenant fields".into(),
            ));
        }

        if self.property_name.trim().is_empty() || self.unit_number.trim().is_empty() {
            return Err(ServerError::BadRequest(
                "Property name and unit number are required".into(),
            ));
        }

        if self.monthly_rent <= 0.0 {
            return Err(ServerError::BadRequest(
                "Monthly rent must be greater than 0".into(),
            ));
        }

        if self.rent_due_day < 1 || self.rent_due_day > 31 {
            return Err(ServerError::BadRequest(
                "Rent due day must be between 1 and 31".into(),
            ));
        }

        Ok(())
    }
}
