// src/notify/mod.rs

pub mod brevo;

use crate::domain::tenant::ReminderStage;
use std::env;
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
pub enum NotifyError {
    RequestFailed(String),
    ApiError(String),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            NotifyError::ApiError(msg) => write!(f, "API error: {}", msg),
        }
    }
}

impl std::error::Error for NotifyError {}

/// Outbound message delivery. Implementations must be safe to share
/// across server worker threads.
pub trait Notifier: Send + Sync {
    fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        tenant_id: i64,
        stage: ReminderStage,
    ) -> Result<(), NotifyError>;

    fn send_sms(
        &self,
        to: &str,
        body: &str,
        tenant_id: i64,
        stage: ReminderStage,
    ) -> Result<(), NotifyError>;
}

/// Stdout-only notifier used when no provider is configured.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        tenant_id: i64,
        stage: ReminderStage,
    ) -> Result<(), NotifyError> {
        println!(
            "[MOCK EMAIL] To: {to} | Subject: {subject} | Body: {body} (tenant {tenant_id}, {})",
            stage.as_str()
        );
        Ok(())
    }

    fn send_sms(
        &self,
        to: &str,
        body: &str,
        tenant_id: i64,
        stage: ReminderStage,
    ) -> Result<(), NotifyError> {
        println!(
            "[MOCK SMS] To: {to} | Message: {body} (tenant {tenant_id}, {})",
            stage.as_str()
        );
        Ok(())
    }
}

/// Brevo when `BREVO_API_KEY` is set, console mock otherwise.
pub fn build_notifier() -> Arc<dyn Notifier> {
    match env::var("BREVO_API_KEY") {
        Ok(key) if !key.is_empty() => {
            let sender_email = env::var("BREVO_SENDER_EMAIL")
                .unwrap_or_else(|_| "no-reply@example.com".to_string());
            let sender_name =
                env::var("BREVO_SENDER_NAME").unwrap_or_else(|_| "Property Management".to_string());
            let sms_sender = env::var("BREVO_SMS_SENDER").unwrap_or_else(|_| "RentDesk".to_string());
            println!("Using Brevo notifier (sender: {sender_email})");
            Arc::new(brevo::BrevoNotifier::new(
                key,
                sender_email,
                sender_name,
                sms_sender,
            ))
        }
        _ => {
            println!("BREVO_API_KEY not set, using console notifier");
            Arc::new(ConsoleNotifier)
        }
    }
}
