//! JSON-in/JSON-out surface behind the `#[wasm_bindgen]` exports.
//!
//! Kept free of `JsValue` so it runs (and is tested) on native targets. Every
//! call takes the raw metafield JSON and normalizes it afresh.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use slotly_engine::{
    AvailabilityVerdict, MonthView, Reason, ScheduleSelection, SchedulingConfiguration,
    SelectionError,
};

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct VerdictDto {
    date: NaiveDate,
    available: bool,
    reason: Reason,
    message: &'static str,
}

impl VerdictDto {
    fn new(date: NaiveDate, verdict: AvailabilityVerdict) -> Self {
        Self {
            date,
            available: verdict.available,
            reason: verdict.reason,
            message: verdict.reason.message(),
        }
    }
}

#[derive(Serialize)]
struct SelectionDto {
    accepted: bool,
    date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<Reason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 instant.
///
/// Accepts RFC 3339 (as produced by `Date.prototype.toISOString()`) and naive
/// `YYYY-MM-DDTHH:MM:SS`, which is read as UTC.
pub fn parse_now(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}", s, e))
}

fn load(config_json: &str) -> Result<SchedulingConfiguration, String> {
    slotly_engine::normalize_configuration_json(config_json).map_err(|e| e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Canonical form of a stored configuration.
pub fn normalize_configuration(config_json: &str) -> Result<String, String> {
    to_json(&load(config_json)?)
}

/// `{date, available, reason, message}` for one candidate date.
pub fn evaluate_date(config_json: &str, date: &str, now: &str) -> Result<String, String> {
    let config = load(config_json)?;
    let date = parse_date(date)?;
    let verdict =
        slotly_engine::evaluate(&config, date, parse_now(now)?).map_err(|e| e.to_string())?;
    to_json(&VerdictDto::new(date, verdict))
}

/// JSON array of available `YYYY-MM-DD` dates. `horizon_days` defaults to the
/// store's furthest-date setting.
pub fn expand_available_dates(
    config_json: &str,
    now: &str,
    horizon_days: Option<i64>,
) -> Result<String, String> {
    let config = load(config_json)?;
    let horizon =
        horizon_days.unwrap_or_else(|| i64::from(slotly_engine::default_horizon(&config)));
    let dates: Vec<NaiveDate> =
        slotly_engine::expand_available_dates(&config, parse_now(now)?, horizon)
            .map_err(|e| e.to_string())?
            .collect();
    to_json(&dates)
}

/// Like [`expand_available_dates`], but any error yields `[]` so the picker
/// offers nothing rather than an unchecked date.
pub fn selectable_dates(config_json: &str, now: &str, horizon_days: Option<i64>) -> String {
    expand_available_dates(config_json, now, horizon_days).unwrap_or_else(|_| "[]".to_string())
}

/// Month grid with a verdict per day.
pub fn month_view(config_json: &str, now: &str, year: i32, month: u32) -> Result<String, String> {
    let config = load(config_json)?;
    let view: MonthView = slotly_engine::month_view(&config, parse_now(now)?, year, month)
        .map_err(|e| e.to_string())?;
    to_json(&view)
}

/// `{accepted, date, reason?, error?}` for a shopper's pick.
///
/// A rejected pick is a normal answer; only unreadable input is an error.
pub fn validate_selection(
    config_json: &str,
    selection_json: &str,
    now: &str,
) -> Result<String, String> {
    let config = load(config_json)?;
    let selection: ScheduleSelection = serde_json::from_str(selection_json)
        .map_err(|e| format!("Invalid selection JSON: {}", e))?;

    let dto = match slotly_engine::validate_selection(&config, &selection, parse_now(now)?) {
        Ok(date) => SelectionDto {
            accepted: true,
            date,
            reason: None,
            error: None,
        },
        Err(SelectionError::InvalidCandidate(e)) => return Err(e.to_string()),
        Err(e) => SelectionDto {
            accepted: false,
            date: selection.date,
            reason: match &e {
                SelectionError::Unavailable { reason, .. } => Some(*reason),
                _ => None,
            },
            error: Some(e.to_string()),
        },
    };
    to_json(&dto)
}

/// Cart attributes object for a selection.
pub fn cart_attributes(selection_json: &str, include_note: bool) -> Result<String, String> {
    let selection: ScheduleSelection = serde_json::from_str(selection_json)
        .map_err(|e| format!("Invalid selection JSON: {}", e))?;
    to_json(&slotly_engine::cart_attributes(&selection, include_note))
}
