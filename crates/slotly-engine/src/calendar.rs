//! Month grids for calendar previews.
//!
//! Both the admin preview and the storefront picker lay a month out Monday
//! first, padding the first row with blank cells.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::availability::{AvailabilityVerdict, EvaluationContext};
use crate::config::SchedulingConfiguration;
use crate::error::InvalidCandidateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStatus {
    pub date: NaiveDate,
    pub verdict: AvailabilityVerdict,
}

/// One month of verdicts, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st in a Monday-first week (0..=6).
    pub leading_blanks: u32,
    pub days: Vec<DayStatus>,
}

impl MonthView {
    pub fn available_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days
            .iter()
            .filter(|d| d.verdict.available)
            .map(|d| d.date)
    }
}

/// Evaluate every day of `year`-`month` against one `now`.
///
/// # Errors
/// Returns [`InvalidCandidateError::OutOfRange`] for a month that does not
/// exist or an unrepresentable lead time.
pub fn month_view(
    config: &SchedulingConfiguration,
    now: DateTime<Utc>,
    year: i32,
    month: u32,
) -> Result<MonthView, InvalidCandidateError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| InvalidCandidateError::OutOfRange(format!("{year}-{month:02}")))?;
    let ctx = EvaluationContext::new(config, now)?;

    let days = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|date| DayStatus {
            date,
            verdict: ctx.reason(date).into(),
        })
        .collect();

    Ok(MonthView {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_monday(),
        days,
    })
}
