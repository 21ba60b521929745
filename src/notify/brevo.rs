// src/notify/brevo.rs

use crate::domain::tenant::ReminderStage;
use crate::notify::{Notifier, NotifyError};
use reqwest::blocking::Client;
use serde::Serialize;

const EMAIL_ENDPOINT: &str = "https://api.brevo.com/v3/smtp/email";
const SMS_ENDPOINT: &str = "https://api.brevo.com/v3/transactionalSMS/sms";

pub struct BrevoNotifier {
    api_key: String,
    sender_email: String,
    sender_name: String,
    sms_sender: String,
    client: Client,
}

#[derive(Serialize)]
struct BrevoSender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct BrevoRecipient<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoEmailPayload<'a> {
    sender: BrevoSender<'a>,
    to: Vec<BrevoRecipient<'a>>,
    subject: &'a str,
    html_content: String,
    tags: Vec<&'a str>,
}

#[derive(Serialize)]
struct BrevoSmsPayload<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    sender: &'a str,
    recipient: &'a str,
    content: &'a str,
    tag: &'a str,
}

impl BrevoNotifier {
    pub fn new(
        api_key: String,
        sender_email: String,
        sender_name: String,
        sms_sender: String,
    ) -> Self {
        Self {
            api_key,
            sender_email,
            sender_name,
            sms_sender,
            client: Client::new(),
        }
    }

    fn post<T: Serialize>(&self, endpoint: &str, payload: &T) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(endpoint)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .map_err(|e| NotifyError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let error_body = resp.text().unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NotifyError::ApiError(format!(
                "Failed to send message: {}",
                error_body
            )));
        }

        Ok(())
    }
}

impl Notifier for BrevoNotifier {
    fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        _tenant_id: i64,
        stage: ReminderStage,
    ) -> Result<(), NotifyError> {
        let html_content = format!("<p>{}</p>", body);

        let payload = BrevoEmailPayload {
            sender: BrevoSender {
                name: &self.sender_name,
                email: &self.sender_email,
            },
            to: vec![BrevoRecipient { email: to }],
            subject,
            html_content,
            tags: vec![stage.as_str()],
        };

        self.post(EMAIL_ENDPOINT, &payload)
    }

    fn send_sms(
        &self,
        to: &str,
        body: &str,
        _tenant_id: i64,
        stage: ReminderStage,
    ) -> Result<(), NotifyError> {
        let payload = BrevoSmsPayload {
            kind: "transactional",
            sender: &self.sms_sender,
            recipient: to,
            content: body,
            tag: stage.as_str(),
        };

        self.post(SMS_ENDPOINT, &payload)
    }
}
