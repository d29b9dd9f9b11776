//! Tests for the JSON surface the storefront and admin call through WASM.

use serde_json::{json, Value};
use slotly_wasm::json as api;

const STORE: &str = r#"{
    "leadTimeHours": 24,
    "furthestDays": 10,
    "closedDays": [0],
    "blockedDateRules": [{"applyTo": "single", "singleDate": "2025-06-13"}],
    "cutoffTime": "18:00",
    "timezone": "America/New_York",
    "mode": "delivery"
}"#;

const NOW: &str = "2025-06-10T14:00:00.000Z";

fn parse(s: &str) -> Value {
    serde_json::from_str(s).expect("binding output should be JSON")
}

#[test]
fn now_accepts_iso_strings_from_javascript() {
    assert!(api::parse_now("2025-06-10T14:00:00.000Z").is_ok());
    assert!(api::parse_now("2025-06-10T10:00:00-04:00").is_ok());
    assert!(api::parse_now("2025-06-10T14:00:00").is_ok());
    assert!(api::parse_now("yesterday").is_err());
}

#[test]
fn evaluate_date_reports_reason_and_message() {
    let ok = parse(&api::evaluate_date(STORE, "2025-06-12", NOW).unwrap());
    assert_eq!(ok["available"], true);
    assert_eq!(ok["reason"], "OK");

    let blocked = parse(&api::evaluate_date(STORE, "2025-06-13", NOW).unwrap());
    assert_eq!(blocked["available"], false);
    assert_eq!(blocked["reason"], "DATE_BLOCKED");
    assert_eq!(blocked["message"], "this date is blocked");
    assert_eq!(blocked["date"], "2025-06-13");
}

#[test]
fn expand_uses_store_horizon_by_default() {
    let dates = parse(&api::expand_available_dates(STORE, NOW, None).unwrap());
    // Today is 2025-06-10 in New York; lead time pushes to the 11th, the
    // horizon stops at the 20th, Sunday the 15th is closed and the 13th blocked.
    assert_eq!(
        dates,
        json!([
            "2025-06-11",
            "2025-06-12",
            "2025-06-14",
            "2025-06-16",
            "2025-06-17",
            "2025-06-18",
            "2025-06-19",
            "2025-06-20"
        ])
    );
}

#[test]
fn explicit_horizon_narrows_the_window() {
    let dates = parse(&api::expand_available_dates(STORE, NOW, Some(2)).unwrap());
    assert_eq!(dates, json!(["2025-06-11", "2025-06-12"]));
}

#[test]
fn selectable_dates_fail_closed() {
    assert_eq!(api::selectable_dates(r#"{"timezone": "Nowhere/City"}"#, NOW, None), "[]");
    assert_eq!(api::selectable_dates(STORE, "not a time", None), "[]");
    assert_eq!(api::selectable_dates(STORE, NOW, Some(-1)), "[]");
}

#[test]
fn invalid_configuration_surfaces_the_message() {
    let err = api::normalize_configuration(
        r#"{"blockedDateRules": [{"applyTo": "range", "fromDate": "2025-06-20", "toDate": "2025-06-10"}]}"#,
    )
    .unwrap_err();
    assert!(err.contains("ends before it starts"), "unexpected message: {err}");
}

#[test]
fn month_view_serializes_grid() {
    let view = parse(&api::month_view(STORE, NOW, 2025, 6).unwrap());
    assert_eq!(view["leading_blanks"], 6);
    assert_eq!(view["days"].as_array().map(Vec::len), Some(30));
    assert_eq!(view["days"][10]["date"], "2025-06-11");
    assert_eq!(view["days"][10]["verdict"]["reason"], "OK");
}

#[test]
fn selection_checks_mode_and_date() {
    let accepted = parse(
        &api::validate_selection(STORE, r#"{"scheduleType": "delivery", "date": "2025-06-12"}"#, NOW)
            .unwrap(),
    );
    assert_eq!(accepted, json!({"accepted": true, "date": "2025-06-12"}));

    let wrong_mode = parse(
        &api::validate_selection(STORE, r#"{"schedule_type": "pickup", "date": "2025-06-12"}"#, NOW)
            .unwrap(),
    );
    assert_eq!(wrong_mode["accepted"], false);
    assert!(wrong_mode.get("reason").is_none());

    let too_soon = parse(
        &api::validate_selection(STORE, r#"{"schedule_type": "delivery", "date": "2025-06-10"}"#, NOW)
            .unwrap(),
    );
    assert_eq!(too_soon["accepted"], false);
    assert_eq!(too_soon["reason"], "BEFORE_LEAD_TIME");
}

#[test]
fn cart_attributes_object() {
    let attrs = parse(
        &api::cart_attributes(r#"{"schedule_type": "pickup", "date": "2025-06-14"}"#, true).unwrap(),
    );
    assert_eq!(
        attrs,
        json!({
            "_pickup_date": "2025-06-14",
            "_schedule_type": "pickup",
            "_slotly_schedule": "Pickup Date: Saturday, June 14, 2025"
        })
    );
}
