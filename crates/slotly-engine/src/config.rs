//! Canonical scheduling configuration.
//!
//! Values of these types are only ever produced by
//! [`normalize_configuration`](crate::normalize::normalize_configuration), so
//! the engine can rely on their invariants: non-negative lead time and horizon,
//! ranges with `to >= from`, and a valid IANA timezone.

use std::fmt;

use chrono::{NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Upper bound on how many days ahead enumeration will walk.
pub const DEFAULT_CAP: u32 = 365;

/// Which schedule types a store offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    Delivery,
    Pickup,
    #[default]
    Both,
}

impl ScheduleMode {
    pub fn offers(self, schedule_type: ScheduleType) -> bool {
        matches!(
            (self, schedule_type),
            (ScheduleMode::Both, _)
                | (ScheduleMode::Delivery, ScheduleType::Delivery)
                | (ScheduleMode::Pickup, ScheduleType::Pickup)
        )
    }
}

impl fmt::Display for ScheduleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScheduleMode::Delivery => "delivery",
            ScheduleMode::Pickup => "pickup",
            ScheduleMode::Both => "both",
        })
    }
}

/// The kind of fulfilment a shopper picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    Delivery,
    Pickup,
}

impl ScheduleType {
    /// Human label used in order notes ("Delivery Date: ...").
    pub fn label(self) -> &'static str {
        match self {
            ScheduleType::Delivery => "Delivery",
            ScheduleType::Pickup => "Pickup",
        }
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScheduleType::Delivery => "delivery",
            ScheduleType::Pickup => "pickup",
        })
    }
}

/// A set of weekdays stored as a 7-bit mask (bit 0 = Monday).
///
/// [`WeekdaySet::EMPTY`] contains no day; as an allow-list it closes the store
/// every day of the week.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Weekday>", into = "Vec<Weekday>")]
pub struct WeekdaySet(u8);

const ALL_DAYS_MASK: u8 = 0b111_1111;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);
    pub const ALL: WeekdaySet = WeekdaySet(ALL_DAYS_MASK);

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    pub fn remove(&mut self, day: Weekday) {
        self.0 &= !Self::bit(day);
    }

    pub fn intersection(self, other: WeekdaySet) -> WeekdaySet {
        WeekdaySet(self.0 & other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Weekdays in the set, Monday first.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        WEEK.into_iter().filter(move |d| self.contains(*d))
    }
}

impl Default for WeekdaySet {
    fn default() -> Self {
        WeekdaySet::ALL
    }
}

impl fmt::Debug for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl From<Vec<Weekday>> for WeekdaySet {
    fn from(days: Vec<Weekday>) -> Self {
        days.into_iter().collect()
    }
}

impl From<WeekdaySet> for Vec<Weekday> {
    fn from(set: WeekdaySet) -> Self {
        set.iter().collect()
    }
}

/// A declarative exclusion layered on top of weekday/lead-time/horizon checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockedDateRule {
    /// Blocks every date.
    All,
    /// Blocks exactly one calendar date.
    Single { date: NaiveDate },
    /// Blocks `from..=to`. Always satisfies `from <= to`.
    Range { from: NaiveDate, to: NaiveDate },
}

impl BlockedDateRule {
    pub fn blocks(&self, date: NaiveDate) -> bool {
        match *self {
            BlockedDateRule::All => true,
            BlockedDateRule::Single { date: blocked } => blocked == date,
            BlockedDateRule::Range { from, to } => from <= date && date <= to,
        }
    }
}

/// The validated input to the availability engine.
///
/// `available_weekdays` is taken literally: an empty set closes every day.
/// Only normalization reads an empty stored allow-list as "all days".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingConfiguration {
    pub mode: ScheduleMode,
    pub lead_time_hours: u32,
    /// Whole store-local days from today to the first selectable date.
    #[serde(default)]
    pub earliest_days: u32,
    pub furthest_days: Option<u32>,
    pub available_weekdays: WeekdaySet,
    pub blocked_date_rules: Vec<BlockedDateRule>,
    pub cutoff_time: Option<NaiveTime>,
    pub timezone: Tz,
}

impl SchedulingConfiguration {
    /// A configuration with no restrictions in the given zone.
    pub fn open(timezone: Tz) -> Self {
        Self {
            mode: ScheduleMode::Both,
            lead_time_hours: 0,
            earliest_days: 0,
            furthest_days: None,
            available_weekdays: WeekdaySet::ALL,
            blocked_date_rules: Vec::new(),
            cutoff_time: None,
            timezone,
        }
    }

    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        self.blocked_date_rules.iter().any(|rule| rule.blocks(date))
    }
}
