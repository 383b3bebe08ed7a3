//! The evaluation instant supplied by the caller.
//!
//! Engine functions never read a system clock. The presentation layer reads
//! "now" once, wraps it in an [`EvaluationClock`] and hands the same value to
//! every computation, so the next-occurrence and history results always
//! observe the same instant.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

/// A fixed "now" in the caller's local calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EvaluationClock {
    local: NaiveDateTime,
}

impl EvaluationClock {
    /// A clock at the given local wall-clock time.
    pub fn at(local: NaiveDateTime) -> Self {
        Self { local }
    }

    /// A clock at midnight of `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self::at(date.and_time(NaiveTime::MIN))
    }

    /// A clock reading `instant` in the calendar of its own timezone.
    ///
    /// ```
    /// use billing_engine::EvaluationClock;
    /// use chrono::{FixedOffset, NaiveDate, TimeZone};
    ///
    /// let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
    /// let instant = tokyo.with_ymd_and_hms(2024, 3, 1, 2, 30, 0).unwrap();
    /// let clock = EvaluationClock::from_datetime(&instant);
    /// assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    /// ```
    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::at(instant.naive_local())
    }

    /// The calendar date every engine comparison uses.
    pub fn today(&self) -> NaiveDate {
        self.local.date()
    }

    /// The full local wall-clock reading.
    pub fn local(&self) -> NaiveDateTime {
        self.local
    }
}

impl From<NaiveDate> for EvaluationClock {
    fn from(date: NaiveDate) -> Self {
        Self::on(date)
    }
}

impl From<NaiveDateTime> for EvaluationClock {
    fn from(local: NaiveDateTime) -> Self {
        Self::at(local)
    }
}
