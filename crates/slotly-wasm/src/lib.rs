//! WASM bindings for slotly-engine.
//!
//! Exposes availability checks, horizon expansion, month grids and selection
//! validation to the storefront date picker and the admin calendar preview via
//! `wasm-bindgen`. All complex types are passed as JSON strings; the
//! configuration argument is always the raw JSON stored in the shop metafield.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slotly-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir extensions/pickup-timer/assets/wasm/ \
//!   target/wasm32-unknown-unknown/release/slotly_wasm.wasm
//! ```

pub mod json;

use wasm_bindgen::prelude::*;

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// Normalize a stored configuration and return its canonical JSON.
///
/// Throws with the validation message when the configuration is invalid, so
/// the admin UI can show it to the merchant.
#[wasm_bindgen(js_name = "normalizeConfiguration")]
pub fn normalize_configuration(config_json: &str) -> Result<String, JsValue> {
    json::normalize_configuration(config_json).map_err(js_err)
}

/// Evaluate one `YYYY-MM-DD` date at instant `now` (ISO 8601).
///
/// Returns `{date, available, reason, message}` as JSON.
#[wasm_bindgen(js_name = "evaluateDate")]
pub fn evaluate_date(config_json: &str, date: &str, now: &str) -> Result<String, JsValue> {
    json::evaluate_date(config_json, date, now).map_err(js_err)
}

/// Every available date from today through `horizon_days` (default: the
/// store's furthest-date setting), as a JSON array of `YYYY-MM-DD` strings.
#[wasm_bindgen(js_name = "expandAvailableDates")]
pub fn expand_available_dates(
    config_json: &str,
    now: &str,
    horizon_days: Option<i32>,
) -> Result<String, JsValue> {
    json::expand_available_dates(config_json, now, horizon_days.map(i64::from)).map_err(js_err)
}

/// Storefront variant of `expandAvailableDates`: never throws, and returns
/// `[]` when anything about the input is invalid.
#[wasm_bindgen(js_name = "selectableDates")]
pub fn selectable_dates(config_json: &str, now: &str, horizon_days: Option<i32>) -> String {
    json::selectable_dates(config_json, now, horizon_days.map(i64::from))
}

/// Month grid (`{year, month, leading_blanks, days: [{date, verdict}]}`).
#[wasm_bindgen(js_name = "monthView")]
pub fn month_view(config_json: &str, now: &str, year: i32, month: u32) -> Result<String, JsValue> {
    json::month_view(config_json, now, year, month).map_err(js_err)
}

/// Re-check a `{schedule_type, date}` pick before it is written to the cart.
#[wasm_bindgen(js_name = "validateSelection")]
pub fn validate_selection(
    config_json: &str,
    selection_json: &str,
    now: &str,
) -> Result<String, JsValue> {
    json::validate_selection(config_json, selection_json, now).map_err(js_err)
}

/// Cart attributes for a `{schedule_type, date}` pick.
#[wasm_bindgen(js_name = "cartAttributes")]
pub fn cart_attributes(selection_json: &str, include_note: bool) -> Result<String, JsValue> {
    json::cart_attributes(selection_json, include_note).map_err(js_err)
}
