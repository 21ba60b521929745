// src/tests/router_tests/trigger_tests.rs

use crate::router::handle;
use crate::tests::utils::{make_test_db, seed_tenant, RecordingNotifier};
use astra::Body;
use chrono::{Datelike, Utc};
use http::Method;
use std::io::Read;

fn post(path: &str) -> astra::Request {
    http::Request::builder()
        .method(Method::POST)
        .uri(path)
        .body(Body::new(""))
        .unwrap()
}

fn get(path: &str) -> astra::Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::new(""))
        .unwrap()
}

fn body_json(mut resp: astra::Response) -> serde_json::Value {
    let mut bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn trigger_daily_sends_due_reminders_and_dedupes_within_the_day() {
    let db = make_test_db("trigger_daily");

    // Due today from the runner's point of view: the trigger endpoint
    // uses the real clock, so anchor the due day to it.
    let due_day = Utc::now().naive_utc().day();
    let id = seed_tenant(
        &db,
        "Alex Tenant",
        "alex@example.com",
        "+15550100",
        "EMAIL",
        1000.0,
        due_day,
        1000.0,
        "PRE_DUE",
    );

    let notifier = RecordingNotifier::default();

    let resp = handle(post("/api/trigger-daily"), &db, &notifier).unwrap();
    assert_eq!(resp.status(), 200);

    let summary = body_json(resp);
    assert_eq!(summary["evaluated"], 1);
    assert_eq!(summary["sent"], 1);
    assert_eq!(summary["errored"], 0);

    // Second trigger the same day: the dedupe gate holds end to end.
    let again = body_json(handle(post("/api/trigger-daily"), &db, &notifier).unwrap());
    assert_eq!(again["sent"], 0);
    assert_eq!(again["skipped"], 1);
    assert_eq!(notifier.sent_count(), 1);

    // The send shows up in the tenant's audit log.
    let logs = body_json(handle(get(&format!("/api/logs/{id}")), &db, &notifier).unwrap());
    let rows = logs.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], "SENT");
    assert_eq!(rows[0]["message_type"], "DUE");
}

#[test]
fn trigger_daily_with_no_tenants_reports_an_empty_summary() {
    let db = make_test_db("trigger_empty");
    let notifier = RecordingNotifier::default();

    let summary = body_json(handle(post("/api/trigger-daily"), &db, &notifier).unwrap());
    assert_eq!(summary["evaluated"], 0);
    assert_eq!(summary["sent"], 0);
}
