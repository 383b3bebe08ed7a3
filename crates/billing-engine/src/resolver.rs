//! Next occurrence resolution.
//!
//! An occurrence on today's date is already charged and belongs to the
//! payment history, so the next occurrence is the first anchor-aligned date
//! strictly after today. End dates are inclusive: an occurrence on the end
//! date is still billed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::EvaluationClock;
use crate::cycle::{advance, cycles_between, BillingCycle};

/// The next billing event of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "date", rename_all = "lowercase")]
pub enum NextOccurrence {
    /// The next charge falls on this date.
    On(NaiveDate),
    /// No further charges: the end date has passed or no representable date
    /// follows today.
    Ended,
}

impl NextOccurrence {
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            NextOccurrence::On(date) => Some(date),
            NextOccurrence::Ended => None,
        }
    }

    pub fn is_ended(self) -> bool {
        matches!(self, NextOccurrence::Ended)
    }
}

/// Find the next occurrence for `start`/`cycle`, or [`NextOccurrence::Ended`].
///
/// The returned date is always `advance(start, cycle, k)` for some `k >= 0`,
/// strictly after `clock.today()`, and not after `end` when one is given.
///
/// # Examples
///
/// ```
/// use billing_engine::{next_occurrence, BillingCycle, EvaluationClock, NextOccurrence};
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
/// let now = EvaluationClock::on(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
/// assert_eq!(
///     next_occurrence(start, BillingCycle::Month, None, now),
///     NextOccurrence::On(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
/// );
/// ```
pub fn next_occurrence(
    start: NaiveDate,
    cycle: BillingCycle,
    end: Option<NaiveDate>,
    clock: EvaluationClock,
) -> NextOccurrence {
    let today = clock.today();

    if end.is_some_and(|end| today > end) {
        return NextOccurrence::Ended;
    }

    // The calendar-component estimate lands in today's period at most; one
    // step forward is the only correction ever needed.
    let mut elapsed = cycles_between(start, today, cycle).max(0);
    let mut candidate = advance(start, cycle, elapsed);
    while candidate <= today && candidate < NaiveDate::MAX {
        elapsed += 1;
        candidate = advance(start, cycle, elapsed);
    }

    // Saturated at the calendar limit without passing today.
    if candidate <= today {
        return NextOccurrence::Ended;
    }

    match end {
        Some(end) if candidate > end => NextOccurrence::Ended,
        _ => {
            tracing::trace!(%start, %cycle, %today, next = %candidate, elapsed, "resolved next occurrence");
            NextOccurrence::On(candidate)
        }
    }
}
