//! Relative labels for the next occurrence.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::EvaluationClock;
use crate::resolver::NextOccurrence;

/// Days a charge may be away and still count as [`Urgency::Soon`].
pub const SOON_THRESHOLD_DAYS: i64 = 3;

/// How pressing an upcoming charge is, for list badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Due today or overdue.
    Due,
    /// Due within [`SOON_THRESHOLD_DAYS`].
    Soon,
    Normal,
}

/// Whole calendar days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Days from the clock's date to the next occurrence, `None` once ended.
pub fn days_until(next: NextOccurrence, clock: EvaluationClock) -> Option<i64> {
    next.date().map(|date| days_between(clock.today(), date))
}

/// A short label such as `"Today"`, `"Tomorrow"`, `"Overdue"` or `"in 5 days"`.
///
/// # Examples
///
/// ```
/// use billing_engine::{relative_label, EvaluationClock, NextOccurrence};
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// let next = NextOccurrence::On(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert_eq!(relative_label(next, EvaluationClock::on(today)), "in 22 days");
/// assert_eq!(relative_label(NextOccurrence::Ended, EvaluationClock::on(today)), "Ended");
/// ```
pub fn relative_label(next: NextOccurrence, clock: EvaluationClock) -> String {
    match days_until(next, clock) {
        None => "Ended".to_string(),
        Some(0) => "Today".to_string(),
        Some(1) => "Tomorrow".to_string(),
        Some(days) if days < 0 => "Overdue".to_string(),
        Some(days) => format!("in {} days", days),
    }
}

/// Badge urgency for the next occurrence; ended schedules get no badge.
pub fn urgency(next: NextOccurrence, clock: EvaluationClock) -> Option<Urgency> {
    days_until(next, clock).map(|days| match days {
        d if d <= 0 => Urgency::Due,
        d if d <= SOON_THRESHOLD_DAYS => Urgency::Soon,
        _ => Urgency::Normal,
    })
}
