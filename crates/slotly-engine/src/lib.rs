//! # slotly-engine
//!
//! Deterministic delivery/pickup date availability for storefront scheduling.
//!
//! Given a store's scheduling configuration (lead time, furthest-date horizon,
//! weekly closures, blocked-date rules, order cutoff, timezone), the engine
//! decides which calendar dates a shopper may pick and why the others are
//! closed. It reads no clock: `now` is always passed in, so the same inputs
//! always give the same answer.
//!
//! ## Modules
//!
//! - [`normalize`]: stored JSON (every legacy shape) → [`SchedulingConfiguration`]
//! - [`availability`]: single-date verdicts in fixed precedence order
//! - [`expander`]: lazy enumeration of available dates within a horizon
//! - [`calendar`]: Monday-first month grids for previews
//! - [`order`]: cart attributes, order webhook parsing, selection checks
//! - [`zone`]: store-local "today" and lead-time arithmetic
//! - [`config`]: canonical configuration types
//! - [`error`]: Error types

pub mod availability;
pub mod calendar;
pub mod config;
pub mod error;
pub mod expander;
pub mod normalize;
pub mod order;
pub mod zone;

pub use availability::{evaluate, AvailabilityVerdict, Reason};
pub use calendar::{month_view, DayStatus, MonthView};
pub use config::{
    BlockedDateRule, ScheduleMode, ScheduleType, SchedulingConfiguration, WeekdaySet, DEFAULT_CAP,
};
pub use error::{ConfigurationError, InvalidCandidateError, SelectionError};
pub use expander::{default_horizon, expand_available_dates, AvailableDates};
pub use normalize::{normalize_configuration, normalize_configuration_json, RawConfiguration};
pub use order::{
    cart_attributes, extract_selection, validate_selection, OrderPayload, ScheduleSelection,
};
