//! Billing cycles and cycle arithmetic.
//!
//! All offsets in the engine go through [`advance`], which applies a single
//! overflow policy: when adding months lands on a day that does not exist in
//! the target month, the day is clamped to the last day of that month. There
//! is no rollover into the following month, so an anchor on January 31
//! advanced by one month is February 28 (or 29), never March 2 or 3.
//!
//! Occurrences are always computed from the anchor (`advance(anchor, cycle, k)`),
//! never by chaining one-cycle steps, so clamping in a short month does not
//! drift later occurrences away from the anchor's day.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// The recurrence unit of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Week,
    Month,
    Quarter,
    Year,
}

impl BillingCycle {
    pub const ALL: [BillingCycle; 4] = [
        BillingCycle::Week,
        BillingCycle::Month,
        BillingCycle::Quarter,
        BillingCycle::Year,
    ];

    /// Number of calendar months in one cycle, or `None` for fixed-length weeks.
    pub fn months(self) -> Option<u32> {
        match self {
            BillingCycle::Week => None,
            BillingCycle::Month => Some(1),
            BillingCycle::Quarter => Some(3),
            BillingCycle::Year => Some(12),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BillingCycle::Week => "week",
            BillingCycle::Month => "month",
            BillingCycle::Quarter => "quarter",
            BillingCycle::Year => "year",
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(BillingCycle::Week),
            "month" => Ok(BillingCycle::Month),
            "quarter" => Ok(BillingCycle::Quarter),
            "year" => Ok(BillingCycle::Year),
            _ => Err(ScheduleError::InvalidCycle(format!("'{}'", s.trim()))),
        }
    }
}

/// Advance `anchor` by `count` whole cycles (negative counts move backwards).
///
/// Weeks are a fixed 7 days. Months, quarters and years move the month/year
/// component and clamp the day to the last valid day of the resulting month.
/// Results beyond chrono's representable range saturate to
/// [`NaiveDate::MIN`] / [`NaiveDate::MAX`].
///
/// # Examples
///
/// ```
/// use billing_engine::cycle::{advance, BillingCycle};
/// use chrono::NaiveDate;
///
/// let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
/// let feb = advance(jan31, BillingCycle::Month, 1);
/// assert_eq!(feb, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// ```
pub fn advance(anchor: NaiveDate, cycle: BillingCycle, count: i64) -> NaiveDate {
    match cycle.months() {
        None => advance_days(anchor, count.saturating_mul(7)),
        Some(months) => advance_months(anchor, count.saturating_mul(i64::from(months))),
    }
}

/// Whole cycles from `start` to `date`, using calendar components.
///
/// Weeks use floor division of the day difference. Months, quarters and years
/// use the month-index (or year) difference and ignore the day of month, so
/// the result can be one more than the number of fully completed cycles. The
/// resolver corrects for that. Negative when `date` precedes `start`.
pub fn cycles_between(start: NaiveDate, date: NaiveDate, cycle: BillingCycle) -> i64 {
    match cycle {
        BillingCycle::Week => date.signed_duration_since(start).num_days().div_euclid(7),
        BillingCycle::Month => month_index(date) - month_index(start),
        BillingCycle::Quarter => (month_index(date) - month_index(start)).div_euclid(3),
        BillingCycle::Year => i64::from(date.year()) - i64::from(start.year()),
    }
}

/// Number of days in `month` (1-12) of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        2 => 28,
        _ => 0,
    }
}

fn advance_days(anchor: NaiveDate, days: i64) -> NaiveDate {
    if days >= 0 {
        anchor
            .checked_add_days(Days::new(days.unsigned_abs()))
            .unwrap_or(NaiveDate::MAX)
    } else {
        anchor
            .checked_sub_days(Days::new(days.unsigned_abs()))
            .unwrap_or(NaiveDate::MIN)
    }
}

fn advance_months(anchor: NaiveDate, months: i64) -> NaiveDate {
    let saturated = if months >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    };

    let target = month_index(anchor).saturating_add(months);
    let Ok(year) = i32::try_from(target.div_euclid(12)) else {
        return saturated;
    };
    // rem_euclid(12) is always in 0..12
    let month = target.rem_euclid(12) as u32 + 1;
    let day = anchor.day().min(days_in_month(year, month));

    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(saturated)
}

/// Months since year 0, January.
fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}
