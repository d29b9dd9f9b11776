//! Horizon expansion -- enumerates every selectable date for calendar UIs.
//!
//! The enumeration is lazy and walks `[today, today + horizon]` in the store's
//! timezone, yielding only the dates whose verdict is `OK`. It reuses the same
//! evaluation context as [`evaluate`](crate::availability::evaluate), so the
//! result is exactly the per-date verdicts filtered to the available ones.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::trace;

use crate::availability::{EvaluationContext, Reason};
use crate::config::{SchedulingConfiguration, DEFAULT_CAP};
use crate::error::InvalidCandidateError;
use crate::zone;

/// The horizon calendar previews use when the caller has no opinion:
/// the configured furthest day, capped at [`DEFAULT_CAP`].
pub fn default_horizon(config: &SchedulingConfiguration) -> u32 {
    config.furthest_days.unwrap_or(DEFAULT_CAP).min(DEFAULT_CAP)
}

/// Lazy iterator over available dates, in ascending order.
///
/// Cloning yields an independent iterator from the same position, so a caller
/// can restart enumeration without re-validating inputs.
#[derive(Debug, Clone)]
pub struct AvailableDates<'a> {
    ctx: EvaluationContext<'a>,
    next: Option<NaiveDate>,
    last: NaiveDate,
}

impl Iterator for AvailableDates<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        while let Some(date) = self.next {
            self.next = if date < self.last { date.succ_opt() } else { None };

            match self.ctx.reason(date) {
                Reason::Ok => return Some(date),
                reason => trace!(%date, ?reason, "date unavailable"),
            }
        }
        None
    }
}

/// Enumerate every available date in `[today, today + horizon_days]`.
///
/// `horizon_days` is clamped to [`DEFAULT_CAP`]; pass
/// [`default_horizon`] to follow the store's furthest-date setting.
///
/// # Errors
/// Returns [`InvalidCandidateError::NegativeHorizon`] for a negative horizon
/// and [`InvalidCandidateError::OutOfRange`] if the window leaves chrono's
/// date range.
pub fn expand_available_dates(
    config: &SchedulingConfiguration,
    now: DateTime<Utc>,
    horizon_days: i64,
) -> Result<AvailableDates<'_>, InvalidCandidateError> {
    if horizon_days < 0 {
        return Err(InvalidCandidateError::NegativeHorizon(horizon_days));
    }
    let horizon = u32::try_from(horizon_days)
        .unwrap_or(DEFAULT_CAP)
        .min(DEFAULT_CAP);

    let ctx = EvaluationContext::new(config, now)?;
    let today = ctx.today();
    let last = zone::add_days(today, horizon)?;

    Ok(AvailableDates {
        ctx,
        next: Some(today),
        last,
    })
}
