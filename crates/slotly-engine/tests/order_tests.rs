//! Tests for cart attributes, order webhook parsing, and selection checks.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use slotly_engine::order::{NoteAttribute, DELIVERY_DATE_ATTRIBUTE};
use slotly_engine::{
    cart_attributes, extract_selection, validate_selection, OrderPayload, Reason, ScheduleMode,
    ScheduleSelection, ScheduleType, SchedulingConfiguration, SelectionError,
};

fn utc(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0).unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn selection(schedule_type: ScheduleType, date: NaiveDate) -> ScheduleSelection {
    ScheduleSelection {
        schedule_type,
        date,
    }
}

fn attribute(name: &str, value: &str) -> NoteAttribute {
    NoteAttribute {
        name: name.to_string(),
        value: Some(value.to_string()),
    }
}

// ── Cart attributes ─────────────────────────────────────────────────────────

#[test]
fn delivery_attributes_with_note() {
    let attrs = cart_attributes(&selection(ScheduleType::Delivery, date(2025, 6, 10)), true);

    assert_eq!(attrs.len(), 3);
    assert_eq!(attrs["_delivery_date"], "2025-06-10");
    assert_eq!(attrs["_schedule_type"], "delivery");
    assert_eq!(
        attrs["_slotly_schedule"],
        "Delivery Date: Tuesday, June 10, 2025"
    );
}

#[test]
fn pickup_attributes_without_note() {
    let attrs = cart_attributes(&selection(ScheduleType::Pickup, date(2025, 6, 6)), false);

    assert_eq!(attrs.len(), 2);
    assert_eq!(attrs["_pickup_date"], "2025-06-06");
    assert_eq!(attrs["_schedule_type"], "pickup");
    assert!(!attrs.contains_key(DELIVERY_DATE_ATTRIBUTE));
}

// ── Order webhook parsing ───────────────────────────────────────────────────

#[test]
fn selection_from_note_attributes() {
    let order: OrderPayload = serde_json::from_str(
        r#"{
            "id": 820982911946154508,
            "note": null,
            "note_attributes": [
                {"name": "_pickup_date", "value": "2025-06-13"},
                {"name": "_schedule_type", "value": "pickup"},
                {"name": "gift_wrap", "value": "yes"}
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(
        extract_selection(&order),
        Some(selection(ScheduleType::Pickup, date(2025, 6, 13)))
    );
}

#[test]
fn selection_from_note_line() {
    let order = OrderPayload {
        note: Some("Leave at the back door\nPickup Date: Friday, June 13, 2025".to_string()),
        note_attributes: vec![],
    };

    assert_eq!(
        extract_selection(&order),
        Some(selection(ScheduleType::Pickup, date(2025, 6, 13)))
    );
}

#[test]
fn note_label_is_case_insensitive() {
    let order = OrderPayload {
        note: Some("DELIVERY DATE: 2025-06-10".to_string()),
        note_attributes: vec![],
    };

    assert_eq!(
        extract_selection(&order),
        Some(selection(ScheduleType::Delivery, date(2025, 6, 10)))
    );
}

#[test]
fn attributes_override_the_note() {
    let order = OrderPayload {
        note: Some("Delivery Date: Tuesday, June 10, 2025".to_string()),
        note_attributes: vec![attribute("_delivery_date", "2025-06-11")],
    };

    assert_eq!(
        extract_selection(&order),
        Some(selection(ScheduleType::Delivery, date(2025, 6, 11)))
    );
}

#[test]
fn type_defaults_from_which_date_is_present() {
    let order = OrderPayload {
        note: None,
        note_attributes: vec![attribute("_delivery_date", "2025-06-11")],
    };

    assert_eq!(
        extract_selection(&order).map(|s| s.schedule_type),
        Some(ScheduleType::Delivery)
    );
}

#[test]
fn order_without_schedule_yields_none() {
    let order = OrderPayload {
        note: Some("Please ring twice".to_string()),
        note_attributes: vec![attribute("_delivery_date", "next tuesday")],
    };

    assert_eq!(extract_selection(&order), None);
}

#[test]
fn unreadable_delivery_line_does_not_fall_back_to_pickup() {
    let order = OrderPayload {
        note: Some("Delivery Date: as soon as possible\nPickup Date: Friday, June 13, 2025".to_string()),
        note_attributes: vec![],
    };

    assert_eq!(extract_selection(&order), None);
}

#[test]
fn unreadable_delivery_line_still_yields_to_attributes() {
    let order = OrderPayload {
        note: Some("Delivery Date: as soon as possible".to_string()),
        note_attributes: vec![attribute("_pickup_date", "2025-06-13")],
    };

    assert_eq!(
        extract_selection(&order),
        Some(selection(ScheduleType::Pickup, date(2025, 6, 13)))
    );
}

// ── Selection checks ────────────────────────────────────────────────────────

#[test]
fn available_selection_is_accepted() {
    let config = SchedulingConfiguration::open(Tz::UTC);
    let now = utc(2025, 6, 10, 9, 0);

    let accepted =
        validate_selection(&config, &selection(ScheduleType::Delivery, date(2025, 6, 12)), now);
    assert_eq!(accepted, Ok(date(2025, 6, 12)));
}

#[test]
fn schedule_type_outside_mode_is_rejected() {
    let config = SchedulingConfiguration {
        mode: ScheduleMode::Delivery,
        ..SchedulingConfiguration::open(Tz::UTC)
    };
    let now = utc(2025, 6, 10, 9, 0);

    let err = validate_selection(&config, &selection(ScheduleType::Pickup, date(2025, 6, 12)), now)
        .unwrap_err();
    assert_eq!(
        err,
        SelectionError::ModeNotOffered {
            mode: ScheduleMode::Delivery,
            requested: ScheduleType::Pickup,
        }
    );
    assert_eq!(err.to_string(), "pickup is not offered in delivery mode");
}

#[test]
fn unavailable_selection_reports_the_reason() {
    let config = SchedulingConfiguration {
        cutoff_time: NaiveTime::from_hms_opt(12, 0, 0),
        ..SchedulingConfiguration::open(Tz::UTC)
    };
    let now = utc(2025, 6, 10, 12, 30);

    let err = validate_selection(&config, &selection(ScheduleType::Pickup, date(2025, 6, 10)), now)
        .unwrap_err();
    assert_eq!(
        err,
        SelectionError::Unavailable {
            date: date(2025, 6, 10),
            reason: Reason::PastCutoff,
        }
    );
}

#[test]
fn both_mode_offers_every_type() {
    assert!(ScheduleMode::Both.offers(ScheduleType::Delivery));
    assert!(ScheduleMode::Both.offers(ScheduleType::Pickup));
    assert!(!ScheduleMode::Pickup.offers(ScheduleType::Delivery));
}
