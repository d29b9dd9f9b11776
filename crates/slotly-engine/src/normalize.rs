//! Reconciles the configuration shapes the admin surfaces have stored over time
//! into one [`SchedulingConfiguration`].
//!
//! The stored JSON comes in several dialects:
//!
//! - delivery settings: `availableDays` (weekday names, allow-list),
//!   `earliestDays`, `furthestDays`, `blockedDateRules`
//! - pickup store rules: `closedDays` (0 = Sunday, deny-list),
//!   `leadTimeHours`, `maxSelectableDays`, `disableWeekends`, `cutoffTime`
//! - schedules: `leadTime`, `cutoffTime`, `timezone`
//! - storefront widget: `disabledDates`
//!
//! Every field is optional; absent fields mean "no restriction".

use chrono::{NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{BlockedDateRule, ScheduleMode, SchedulingConfiguration, WeekdaySet};
use crate::error::ConfigurationError;

/// Index 0 is Sunday, matching JavaScript's `Date.getDay()`.
const SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Configuration as persisted in the shop metafield, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawConfiguration {
    #[serde(alias = "defaultMode")]
    pub mode: Option<String>,
    #[serde(alias = "leadTime")]
    pub lead_time_hours: Option<i64>,
    pub earliest_days: Option<i64>,
    #[serde(alias = "maxSelectableDays")]
    pub furthest_days: Option<i64>,
    pub available_days: Option<Vec<String>>,
    pub closed_days: Option<Vec<i64>>,
    pub disable_weekends: Option<bool>,
    pub disabled_dates: Option<Vec<String>>,
    pub blocked_date_rules: Option<Vec<RawBlockedDateRule>>,
    pub cutoff_time: Option<String>,
    pub timezone: Option<String>,
}

/// A blocked-date rule as the admin form stores it.
///
/// Unused date fields are usually left as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlockedDateRule {
    pub apply_to: String,
    #[serde(default)]
    pub single_date: Option<String>,
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
}

/// Parse a metafield JSON blob and normalize it.
pub fn normalize_configuration_json(
    json: &str,
) -> Result<SchedulingConfiguration, ConfigurationError> {
    let raw: RawConfiguration = serde_json::from_str(json)?;
    normalize_configuration(&raw)
}

/// Validate `raw` and fold its legacy shapes into the canonical configuration.
///
/// # Errors
/// Returns a [`ConfigurationError`] naming the first invalid field: negative
/// lead time or horizon, an inverted range, an unknown timezone, weekday or
/// mode, a malformed date or cutoff time, or an incomplete rule.
pub fn normalize_configuration(
    raw: &RawConfiguration,
) -> Result<SchedulingConfiguration, ConfigurationError> {
    let mode = raw
        .mode
        .as_deref()
        .map(parse_mode)
        .transpose()?
        .unwrap_or_default();

    let lead_time_hours = normalize_lead_time(raw.lead_time_hours)?;

    let earliest_days = match raw.earliest_days {
        None => 0,
        Some(days) if days < 0 => return Err(ConfigurationError::NegativeEarliestDays(days)),
        Some(days) => u32::try_from(days).unwrap_or(u32::MAX),
    };

    let furthest_days = match raw.furthest_days {
        None => None,
        Some(days) if days < 0 => return Err(ConfigurationError::NegativeFurthestDays(days)),
        Some(days) => Some(u32::try_from(days).unwrap_or(u32::MAX)),
    };

    let available_weekdays = normalize_weekdays(raw)?;

    let mut blocked_date_rules = raw
        .blocked_date_rules
        .iter()
        .flatten()
        .map(normalize_rule)
        .collect::<Result<Vec<_>, _>>()?;
    for value in raw.disabled_dates.iter().flatten() {
        blocked_date_rules.push(BlockedDateRule::Single {
            date: parse_date("disabledDates", value)?,
        });
    }

    let cutoff_time = raw
        .cutoff_time
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(parse_cutoff)
        .transpose()?;

    let timezone = match raw.timezone.as_deref().map(str::trim) {
        None | Some("") => Tz::UTC,
        Some(name) => name
            .parse::<Tz>()
            .map_err(|_| ConfigurationError::UnknownTimezone(name.to_string()))?,
    };

    let config = SchedulingConfiguration {
        mode,
        lead_time_hours,
        earliest_days,
        furthest_days,
        available_weekdays,
        blocked_date_rules,
        cutoff_time,
        timezone,
    };

    debug!(
        %mode,
        timezone = %config.timezone,
        lead_time_hours,
        earliest_days,
        furthest_days = ?config.furthest_days,
        weekdays = ?config.available_weekdays,
        rules = config.blocked_date_rules.len(),
        "normalized scheduling configuration"
    );

    Ok(config)
}

fn parse_mode(value: &str) -> Result<ScheduleMode, ConfigurationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "delivery" => Ok(ScheduleMode::Delivery),
        "pickup" => Ok(ScheduleMode::Pickup),
        "both" | "" => Ok(ScheduleMode::Both),
        _ => Err(ConfigurationError::UnknownMode(value.to_string())),
    }
}

fn normalize_lead_time(hours: Option<i64>) -> Result<u32, ConfigurationError> {
    let hours = hours.unwrap_or(0);
    if hours < 0 {
        return Err(ConfigurationError::NegativeLeadTime(hours));
    }
    u32::try_from(hours).map_err(|_| ConfigurationError::LeadTimeTooLarge(hours))
}

/// Allow-list minus deny-list minus weekends. An empty allow-list means every
/// weekday is allowed.
fn normalize_weekdays(raw: &RawConfiguration) -> Result<WeekdaySet, ConfigurationError> {
    let mut weekdays = match raw.available_days.as_deref() {
        None | Some([]) => WeekdaySet::ALL,
        Some(names) => names
            .iter()
            .map(|name| {
                name.trim()
                    .parse::<Weekday>()
                    .map_err(|_| ConfigurationError::UnknownWeekday(name.clone()))
            })
            .collect::<Result<WeekdaySet, _>>()?,
    };

    for &index in raw.closed_days.iter().flatten() {
        let day = usize::try_from(index)
            .ok()
            .and_then(|i| SUNDAY_FIRST.get(i))
            .ok_or(ConfigurationError::WeekdayIndexOutOfRange(index))?;
        weekdays.remove(*day);
    }

    if raw.disable_weekends.unwrap_or(false) {
        weekdays.remove(Weekday::Sat);
        weekdays.remove(Weekday::Sun);
    }

    Ok(weekdays)
}

fn normalize_rule(rule: &RawBlockedDateRule) -> Result<BlockedDateRule, ConfigurationError> {
    match rule.apply_to.trim().to_ascii_lowercase().as_str() {
        "all" => Ok(BlockedDateRule::All),
        "single" => {
            let date = required("single", "singleDate", rule.single_date.as_deref())?;
            Ok(BlockedDateRule::Single {
                date: parse_date("singleDate", date)?,
            })
        }
        "range" => {
            let from = required("range", "fromDate", rule.from_date.as_deref())?;
            let to = required("range", "toDate", rule.to_date.as_deref())?;
            let from = parse_date("fromDate", from)?;
            let to = parse_date("toDate", to)?;
            if to < from {
                return Err(ConfigurationError::InvertedRange { from, to });
            }
            Ok(BlockedDateRule::Range { from, to })
        }
        _ => Err(ConfigurationError::UnknownRuleKind(rule.apply_to.clone())),
    }
}

fn required<'a>(
    kind: &'static str,
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, ConfigurationError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigurationError::IncompleteRule { kind, field })
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ConfigurationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ConfigurationError::InvalidDate {
            field,
            value: value.to_string(),
        }
    })
}

fn parse_cutoff(value: &str) -> Result<NaiveTime, ConfigurationError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| ConfigurationError::InvalidCutoff(value.to_string()))
}
