//! # billing-engine
//!
//! Deterministic recurring billing schedules for subscriptions.
//!
//! Given an anchor start date, a billing cycle, an optional end date and an
//! explicit evaluation clock, the engine answers "when is the next charge?"
//! and "which charges already happened?". Every function is pure in its
//! arguments: nothing here reads the system clock.
//!
//! ## Modules
//!
//! - [`cycle`]: Billing cycles and clamp-to-month-end cycle arithmetic
//! - [`clock`]: The caller-supplied evaluation instant
//! - [`resolver`]: Next occurrence (or `Ended`) for a schedule
//! - [`history`]: Past occurrences, most recent first
//! - [`label`]: Relative labels ("Today", "in 5 days") and urgency badges
//! - [`format`]: Display formatting for dates, amounts and cycles
//! - [`subscription`]: Boundary validation of stored subscription records
//! - [`error`]: Error types

pub mod clock;
pub mod cycle;
pub mod error;
pub mod format;
pub mod history;
pub mod label;
pub mod resolver;
pub mod subscription;

pub use clock::EvaluationClock;
pub use cycle::{advance, cycles_between, days_in_month, BillingCycle};
pub use error::ScheduleError;
pub use format::{
    describe_cycle, format_amount, format_local_date, DayStyle, FormatOptions, MonthStyle,
    YearStyle,
};
pub use history::{occurrence_history, payment_count};
pub use label::{days_between, days_until, relative_label, urgency, Urgency};
pub use resolver::{next_occurrence, NextOccurrence};
pub use subscription::{
    parse_date, parse_date_in, sort_by_next_occurrence, Schedule, Subscription,
    SubscriptionRecord,
};
