//! Single-date availability verdicts.
//!
//! A candidate date is checked against the configuration in a fixed order and
//! the first failing check names the verdict:
//!
//! 1. lead time and earliest day (`BEFORE_LEAD_TIME`)
//! 2. furthest-date horizon (`AFTER_HORIZON`)
//! 3. weekday allow-list (`WEEKDAY_CLOSED`)
//! 4. blocked-date rules, OR'ed together (`DATE_BLOCKED`)
//! 5. same-day cutoff (`PAST_CUTOFF`)
//!
//! The store-local clock is derived from `now` once per call, so the lead-time
//! and cutoff checks always agree on what "now" is.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SchedulingConfiguration;
use crate::error::InvalidCandidateError;
use crate::zone::{self, LocalNow};

/// Why a date is or is not selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    Ok,
    BeforeLeadTime,
    AfterHorizon,
    WeekdayClosed,
    DateBlocked,
    PastCutoff,
}

impl Reason {
    /// Shopper-facing explanation.
    pub fn message(self) -> &'static str {
        match self {
            Reason::Ok => "available",
            Reason::BeforeLeadTime => "too soon, not enough lead time",
            Reason::AfterHorizon => "too far in the future",
            Reason::WeekdayClosed => "closed on this day of the week",
            Reason::DateBlocked => "this date is blocked",
            Reason::PastCutoff => "past today's order cutoff",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of evaluating one candidate date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityVerdict {
    pub available: bool,
    pub reason: Reason,
}

impl From<Reason> for AvailabilityVerdict {
    fn from(reason: Reason) -> Self {
        Self {
            available: reason == Reason::Ok,
            reason,
        }
    }
}

/// Everything about `now` the checks need, resolved once.
///
/// Shared by [`evaluate`] and date enumeration so both produce the same
/// verdict for the same `(config, date, now)`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EvaluationContext<'a> {
    config: &'a SchedulingConfiguration,
    local: LocalNow,
    min_date: NaiveDate,
    max_date: Option<NaiveDate>,
}

impl<'a> EvaluationContext<'a> {
    pub(crate) fn new(
        config: &'a SchedulingConfiguration,
        now: DateTime<Utc>,
    ) -> Result<Self, InvalidCandidateError> {
        let local = LocalNow::new(now, config.timezone);
        let lead_floor = zone::lead_time_floor(now, config.lead_time_hours, config.timezone)?;
        let day_floor = zone::add_days(local.today, config.earliest_days)?;
        let min_date = lead_floor.max(day_floor);
        // A horizon past chrono's last date excludes nothing.
        let max_date = config
            .furthest_days
            .and_then(|days| zone::add_days(local.today, days).ok());

        Ok(Self {
            config,
            local,
            min_date,
            max_date,
        })
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.local.today
    }

    pub(crate) fn reason(&self, date: NaiveDate) -> Reason {
        let config = self.config;

        if date < self.min_date {
            return Reason::BeforeLeadTime;
        }
        if self.max_date.is_some_and(|max| date > max) {
            return Reason::AfterHorizon;
        }
        if !config.available_weekdays.contains(date.weekday()) {
            return Reason::WeekdayClosed;
        }
        if config.is_blocked(date) {
            return Reason::DateBlocked;
        }
        if let Some(cutoff) = config.cutoff_time {
            if date == self.local.today && self.local.time >= cutoff {
                return Reason::PastCutoff;
            }
        }
        Reason::Ok
    }
}

/// Decide whether `candidate` can be selected, given the store configuration
/// and the instant `now`.
///
/// `candidate` is a calendar date in the store's timezone.
///
/// # Errors
/// Returns [`InvalidCandidateError::OutOfRange`] if `now` plus the lead time,
/// or today plus the earliest days, falls outside chrono's representable range.
pub fn evaluate(
    config: &SchedulingConfiguration,
    candidate: NaiveDate,
    now: DateTime<Utc>,
) -> Result<AvailabilityVerdict, InvalidCandidateError> {
    let ctx = EvaluationContext::new(config, now)?;
    Ok(ctx.reason(candidate).into())
}
