//! Shopper selections: writing them to cart attributes, reading them back from
//! order webhooks, and re-checking them against the store configuration.
//!
//! The storefront stores the pick as private cart attributes (`_delivery_date`
//! or `_pickup_date`, plus `_schedule_type`) and optionally a readable
//! `_slotly_schedule` line such as `Delivery Date: Tuesday, June 10, 2025`.
//! Older orders only carry that line in the order note.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::availability::evaluate;
use crate::config::{ScheduleType, SchedulingConfiguration};
use crate::error::SelectionError;

pub const DELIVERY_DATE_ATTRIBUTE: &str = "_delivery_date";
pub const PICKUP_DATE_ATTRIBUTE: &str = "_pickup_date";
pub const SCHEDULE_TYPE_ATTRIBUTE: &str = "_schedule_type";
pub const SCHEDULE_NOTE_ATTRIBUTE: &str = "_slotly_schedule";

const DISPLAY_FORMAT: &str = "%A, %B %-d, %Y";

/// What the shopper picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSelection {
    #[serde(alias = "scheduleType")]
    pub schedule_type: ScheduleType,
    pub date: NaiveDate,
}

impl ScheduleSelection {
    /// `"Delivery Date: Tuesday, June 10, 2025"`.
    pub fn note_line(&self) -> String {
        format!(
            "{} Date: {}",
            self.schedule_type.label(),
            self.date.format(DISPLAY_FORMAT)
        )
    }
}

/// The subset of an `orders/create` webhook payload that carries the schedule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPayload {
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub note_attributes: Vec<NoteAttribute>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteAttribute {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Cart attributes the storefront writes for `selection`.
pub fn cart_attributes(
    selection: &ScheduleSelection,
    include_note: bool,
) -> BTreeMap<String, String> {
    let date_key = match selection.schedule_type {
        ScheduleType::Delivery => DELIVERY_DATE_ATTRIBUTE,
        ScheduleType::Pickup => PICKUP_DATE_ATTRIBUTE,
    };

    let mut attributes = BTreeMap::new();
    attributes.insert(date_key.to_string(), selection.date.to_string());
    attributes.insert(
        SCHEDULE_TYPE_ATTRIBUTE.to_string(),
        selection.schedule_type.to_string(),
    );
    if include_note {
        attributes.insert(SCHEDULE_NOTE_ATTRIBUTE.to_string(), selection.note_line());
    }
    attributes
}

/// Recover the shopper's selection from an order.
///
/// Note lines are read first; note attributes, when present, take precedence.
/// Returns `None` when the order carries no readable schedule date.
pub fn extract_selection(order: &OrderPayload) -> Option<ScheduleSelection> {
    let mut delivery = None;
    let mut pickup = None;
    let mut schedule_type = None;

    if let Some(note) = order.note.as_deref() {
        // A delivery label shadows any pickup label, even when its date is unreadable.
        if let Some(value) = labelled_value(note, "delivery date:") {
            delivery = parse_order_date(value);
            schedule_type = delivery.map(|_| ScheduleType::Delivery);
        } else if let Some(value) = labelled_value(note, "pickup date:") {
            pickup = parse_order_date(value);
            schedule_type = pickup.map(|_| ScheduleType::Pickup);
        }
    }

    for attr in &order.note_attributes {
        let Some(value) = attr.value.as_deref() else {
            continue;
        };
        match attr.name.as_str() {
            DELIVERY_DATE_ATTRIBUTE => delivery = parse_order_date(value).or(delivery),
            PICKUP_DATE_ATTRIBUTE => pickup = parse_order_date(value).or(pickup),
            SCHEDULE_TYPE_ATTRIBUTE => {
                schedule_type = match value.trim().to_ascii_lowercase().as_str() {
                    "delivery" => Some(ScheduleType::Delivery),
                    "pickup" => Some(ScheduleType::Pickup),
                    _ => schedule_type,
                }
            }
            _ => {}
        }
    }

    let schedule_type = schedule_type.unwrap_or(if delivery.is_some() {
        ScheduleType::Delivery
    } else {
        ScheduleType::Pickup
    });
    let date = match schedule_type {
        ScheduleType::Delivery => delivery.or(pickup),
        ScheduleType::Pickup => pickup.or(delivery),
    }?;

    Some(ScheduleSelection {
        schedule_type,
        date,
    })
}

/// Re-check a selection before it is written to an order.
///
/// # Errors
/// [`SelectionError::ModeNotOffered`] if the store does not offer the
/// schedule type, [`SelectionError::Unavailable`] with the verdict reason if
/// the date is not selectable.
pub fn validate_selection(
    config: &SchedulingConfiguration,
    selection: &ScheduleSelection,
    now: DateTime<Utc>,
) -> Result<NaiveDate, SelectionError> {
    if !config.mode.offers(selection.schedule_type) {
        return Err(SelectionError::ModeNotOffered {
            mode: config.mode,
            requested: selection.schedule_type,
        });
    }

    let verdict = evaluate(config, selection.date, now)?;
    if !verdict.available {
        return Err(SelectionError::Unavailable {
            date: selection.date,
            reason: verdict.reason,
        });
    }
    Ok(selection.date)
}

/// Text after `label` on the first note line that carries it.
fn labelled_value<'a>(note: &'a str, label: &str) -> Option<&'a str> {
    note.lines().find_map(|line| {
        // ASCII lowercasing keeps byte offsets aligned with `line`.
        let start = line.to_ascii_lowercase().find(label)? + label.len();
        Some(&line[start..])
    })
}

fn parse_order_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    ["%Y-%m-%d", "%A, %B %d, %Y", "%B %d, %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}
