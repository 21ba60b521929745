use crate::db::connection::Database;
use crate::db::{logs, tenants};
use crate::domain::tenant::NewTenant;
use crate::errors::ServerError;
use crate::notify::Notifier;
use crate::responses::{json_created, json_response, ResultResp};
use crate::workflow;
use astra::Request;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::io::Read;

pub fn handle(req: Request, db: &Database, notifier: &dyn Notifier) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/api/health") => json_response(&json!({ "status": "ok" })),

        ("GET", "/api/tenants") => json_response(&tenants::list_tenants(db)?),

        ("POST", "/api/tenants") => {
            let input: NewTenant = read_json(req)?;
            input.validate()?;
            let tenant = tenants::create_tenant(db, &input)?;
            json_created(&tenant)
        }

        // Manual trigger for the daily pass. Per-tenant errors are
        // reported in the summary, never as a request failure.
        ("POST", "/api/trigger-daily") => {
            let summary = workflow::run_daily_check(db, notifier)?;
            json_response(&summary)
        }

        _ => handle_with_id(req, db, &method, &path),
    }
}

/// Routes carrying a tenant id in the path.
fn handle_with_id(req: Request, db: &Database, method: &str, path: &str) -> ResultResp {
    if let Some(raw_id) = path.strip_prefix("/api/logs/") {
        if method == "GET" {
            let id = parse_id(raw_id)?;
            return json_response(&logs::logs_for_tenant(db, id)?);
        }
    }

    if let Some(rest) = path.strip_prefix("/api/tenants/") {
        if let Some(raw_id) = rest.strip_suffix("/payments") {
            if method == "POST" {
                let id = parse_id(raw_id)?;
                let input: PaymentInput = read_json(req)?;
                let tenant =
                    tenants::record_payment(db, id, input.amount, Utc::now().naive_utc())?;
                return json_response(&tenant);
            }
        }

        if let Some(raw_id) = rest.strip_suffix("/opt-out") {
            if method == "POST" {
                let id = parse_id(raw_id)?;
                tenants::opt_out(db, id)?;
                return json_response(&json!({ "message": "Tenant opted out" }));
            }
        }
    }

    Err(ServerError::NotFound)
}

#[derive(Deserialize)]
struct PaymentInput {
    amount: f64,
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse()
        .map_err(|_| ServerError::BadRequest(format!("invalid tenant id: {raw}")))
}

fn read_json<T: serde::de::DeserializeOwned>(req: Request) -> Result<T, ServerError> {
    let mut body = req.into_body();
    let mut buf = Vec::new();
    body.reader()
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("failed to read request body: {e}")))?;

    serde_json::from_slice(&buf)
        .map_err(|e| ServerError::BadRequest(format!("invalid JSON body: {e}")))
}
