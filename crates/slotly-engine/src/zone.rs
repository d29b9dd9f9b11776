//! Store-local view of an instant.
//!
//! Every "today" and "time of day" question is answered in the store's
//! timezone, never the caller's. Converting an instant to a zone is always
//! unambiguous (unlike converting a local wall-clock time to an instant), so
//! DST transitions only affect which calendar date an instant lands on.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;

use crate::error::InvalidCandidateError;

/// `now` as seen from the store: its calendar date and wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalNow {
    pub today: NaiveDate,
    pub time: NaiveTime,
}

impl LocalNow {
    pub fn new(now: DateTime<Utc>, timezone: Tz) -> Self {
        let local = now.with_timezone(&timezone);
        Self {
            today: local.date_naive(),
            time: local.time(),
        }
    }
}

/// First calendar date reachable after `lead_time_hours`, truncated to the day
/// the lead time ends on.
pub fn lead_time_floor(
    now: DateTime<Utc>,
    lead_time_hours: u32,
    timezone: Tz,
) -> Result<NaiveDate, InvalidCandidateError> {
    let lead = TimeDelta::try_hours(i64::from(lead_time_hours)).ok_or_else(|| {
        InvalidCandidateError::OutOfRange(format!("lead time of {lead_time_hours} hours"))
    })?;
    let earliest = now.checked_add_signed(lead).ok_or_else(|| {
        InvalidCandidateError::OutOfRange(format!("{now} + {lead_time_hours} hours"))
    })?;
    Ok(earliest.with_timezone(&timezone).date_naive())
}

/// `date + days`, as an error instead of a panic when it leaves chrono's range.
pub fn add_days(date: NaiveDate, days: u32) -> Result<NaiveDate, InvalidCandidateError> {
    date.checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| InvalidCandidateError::OutOfRange(format!("{date} + {days} days")))
}
