//! Past occurrences of a schedule.
//!
//! The history holds every anchor-aligned occurrence from the start date up
//! to `min(today, end)`, both inclusive, most recent first. One cycle after
//! the newest entry is exactly what [`next_occurrence`](crate::next_occurrence)
//! returns for the same inputs, unless that is `Ended`.

use chrono::NaiveDate;

use crate::clock::EvaluationClock;
use crate::cycle::{advance, cycles_between, BillingCycle};

/// All occurrences on or before `min(today, end)`, most recent first.
///
/// Each call computes a fresh sequence; calling again with a different clock
/// is independent of earlier calls.
///
/// # Examples
///
/// ```
/// use billing_engine::{occurrence_history, BillingCycle, EvaluationClock};
/// use chrono::NaiveDate;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
/// let history = occurrence_history(
///     d(1, 1),
///     BillingCycle::Week,
///     Some(d(1, 22)),
///     EvaluationClock::on(d(2, 1)),
/// );
/// assert_eq!(history, vec![d(1, 22), d(1, 15), d(1, 8), d(1, 1)]);
/// ```
pub fn occurrence_history(
    start: NaiveDate,
    cycle: BillingCycle,
    end: Option<NaiveDate>,
    clock: EvaluationClock,
) -> Vec<NaiveDate> {
    let mut occurrences = Vec::new();
    for_each_past_occurrence(start, cycle, end, clock, |date| occurrences.push(date));
    occurrences.reverse();
    occurrences
}

/// Number of occurrences [`occurrence_history`] would return.
pub fn payment_count(
    start: NaiveDate,
    cycle: BillingCycle,
    end: Option<NaiveDate>,
    clock: EvaluationClock,
) -> usize {
    let mut count = 0;
    for_each_past_occurrence(start, cycle, end, clock, |_| count += 1);
    count
}

/// Walk the anchor-aligned occurrences in ascending order up to the bound.
fn for_each_past_occurrence(
    start: NaiveDate,
    cycle: BillingCycle,
    end: Option<NaiveDate>,
    clock: EvaluationClock,
    mut visit: impl FnMut(NaiveDate),
) {
    let today = clock.today();
    let bound = end.map_or(today, |end| end.min(today));
    if start > bound {
        return;
    }

    let max_steps = cycles_between(start, bound, cycle).saturating_add(2);
    let mut previous: Option<NaiveDate> = None;
    let mut k: i64 = 0;

    loop {
        if k > max_steps {
            tracing::warn!(%start, %cycle, %bound, max_steps, "occurrence walk hit its step limit");
            return;
        }

        let current = advance(start, cycle, k);
        if current > bound {
            return;
        }
        // Saturation at the calendar limits is the only way two steps collide
        if previous == Some(current) {
            return;
        }

        visit(current);
        previous = Some(current);
        k += 1;
    }
}
