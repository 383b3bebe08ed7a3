//! Subscription records and their validation at the engine boundary.
//!
//! Records arrive from storage with string-typed dates and cycles. They are
//! checked once, when converted into a [`Subscription`]; from then on every
//! date is a real calendar date and every cycle a [`BillingCycle`], so the
//! schedule functions never see invalid input.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::clock::EvaluationClock;
use crate::cycle::BillingCycle;
use crate::error::{Result, ScheduleError};
use crate::history::{occurrence_history, payment_count};
use crate::label::{days_until, relative_label, urgency, Urgency};
use crate::resolver::{next_occurrence, NextOccurrence};

/// A subscription as stored, before validation.
///
/// Field names are camelCase; the snake_case column names used by the
/// backing table are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub price: f64,
    pub currency: String,
    #[serde(alias = "billing_cycle")]
    pub billing_cycle: String,
    #[serde(alias = "start_date")]
    pub start_date: String,
    #[serde(default, alias = "end_date")]
    pub end_date: Option<String>,
    #[serde(default = "default_active", alias = "is_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// A validated subscription the engine can schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: f64,
    pub currency: String,
    pub billing_cycle: BillingCycle,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
}

impl Subscription {
    /// Validate a stored record, reading timestamps with an offset on the
    /// calendar of `tz`. Plain dates and naive timestamps are already local.
    pub fn from_record<Tz: TimeZone>(record: SubscriptionRecord, tz: &Tz) -> Result<Self> {
        let validated = validate(&record, tz);
        if let Err(e) = &validated {
            tracing::debug!(id = %record.id, error = %e, "rejected subscription record");
        }
        let (billing_cycle, start_date, end_date) = validated?;

        Ok(Subscription {
            id: record.id,
            name: record.name,
            description: record.description,
            category: record.category,
            price: record.price,
            currency: record.currency,
            billing_cycle,
            start_date,
            end_date,
            is_active: record.is_active,
        })
    }
}

fn validate<Tz: TimeZone>(
    record: &SubscriptionRecord,
    tz: &Tz,
) -> Result<(BillingCycle, NaiveDate, Option<NaiveDate>)> {
    let cycle: BillingCycle = record.billing_cycle.parse()?;
    let start = parse_date_in(&record.start_date, tz)?;
    let end = record
        .end_date
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_date_in(s, tz))
        .transpose()?;

    if let Some(end) = end {
        if end < start {
            return Err(ScheduleError::InvalidDate(format!(
                "end date {} precedes start date {}",
                end, start
            )));
        }
    }

    Ok((cycle, start, end))
}

/// Parse a calendar date: `YYYY-MM-DD` or a naive `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| ScheduleError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Like [`parse_date`], but also accepts RFC 3339 instants and converts them
/// to their calendar date in `tz`. `2024-02-29T23:30:00Z` is Mar 1 in Berlin.
pub fn parse_date_in<Tz: TimeZone>(s: &str, tz: &Tz) -> Result<NaiveDate> {
    if let Ok(date) = parse_date(s) {
        return Ok(date);
    }
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|instant| instant.with_timezone(tz).date_naive())
        .map_err(|e| ScheduleError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Everything a detail view needs about one subscription at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub next: NextOccurrence,
    pub label: String,
    pub days_until: Option<i64>,
    pub urgency: Option<Urgency>,
    /// Past occurrences, most recent first.
    pub history: Vec<NaiveDate>,
    pub payment_count: usize,
}

impl Schedule {
    /// Sum paid so far at a constant `price` per occurrence.
    pub fn total_paid(&self, price: f64) -> f64 {
        price * self.payment_count as f64
    }
}

impl Subscription {
    pub fn next_occurrence(&self, clock: EvaluationClock) -> NextOccurrence {
        next_occurrence(self.start_date, self.billing_cycle, self.end_date, clock)
    }

    pub fn history(&self, clock: EvaluationClock) -> Vec<NaiveDate> {
        occurrence_history(self.start_date, self.billing_cycle, self.end_date, clock)
    }

    pub fn payment_count(&self, clock: EvaluationClock) -> usize {
        payment_count(self.start_date, self.billing_cycle, self.end_date, clock)
    }

    /// Next occurrence, label and history, all computed against `clock`.
    pub fn schedule(&self, clock: EvaluationClock) -> Schedule {
        let next = self.next_occurrence(clock);
        let history = self.history(clock);
        Schedule {
            next,
            label: relative_label(next, clock),
            days_until: days_until(next, clock),
            urgency: urgency(next, clock),
            payment_count: history.len(),
            history,
        }
    }
}

/// Order by next occurrence, soonest first; ended subscriptions go last and
/// keep their relative order.
pub fn sort_by_next_occurrence(subscriptions: &mut [Subscription], clock: EvaluationClock) {
    subscriptions.sort_by_cached_key(|sub| match sub.next_occurrence(clock) {
        NextOccurrence::On(date) => (false, Some(date)),
        NextOccurrence::Ended => (true, None),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: &str, cycle: &str, start: &str, end: Option<&str>) -> SubscriptionRecord {
        SubscriptionRecord {
            id: id.to_string(),
            name: format!("Service {id}"),
            description: None,
            category: None,
            price: 10.0,
            currency: "EUR".to_string(),
            billing_cycle: cycle.to_string(),
            start_date: start.to_string(),
            end_date: end.map(str::to_string),
            is_active: true,
        }
    }

    fn subscription(id: &str, cycle: &str, start: &str, end: Option<&str>) -> Subscription {
        Subscription::from_record(record(id, cycle, start, end), &Utc).unwrap()
    }

    // ── validation tests ────────────────────────────────────────────────

    #[test]
    fn test_valid_record_converts() {
        let sub = subscription("1", "month", "2024-01-31", Some("2024-12-31"));
        assert_eq!(sub.billing_cycle, BillingCycle::Month);
        assert_eq!(sub.start_date, date(2024, 1, 31));
        assert_eq!(sub.end_date, Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_invalid_cycle_rejected() {
        let err = Subscription::from_record(record("1", "daily", "2024-01-01", None), &Utc)
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidCycle(_)));
    }

    #[test]
    fn test_invalid_start_date_rejected() {
        let err = Subscription::from_record(record("1", "week", "2024-02-30", None), &Utc)
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidDate(_)));
    }

    #[test]
    fn test_end_before_start_rejected() {
        let err = Subscription::from_record(
            record("1", "week", "2024-02-01", Some("2024-01-01")),
            &Utc,
        )
        .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidDate(_)));
    }

    #[test]
    fn test_blank_end_date_is_none() {
        let sub = subscription("1", "week", "2024-02-01", Some(""));
        assert_eq!(sub.end_date, None);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-03-05").unwrap(), date(2024, 3, 5));
        assert_eq!(parse_date(" 2024-03-05T10:20:30 ").unwrap(), date(2024, 3, 5));
        assert!(parse_date("2024-03-05T00:00:00.000Z").is_err());
        assert!(parse_date("March 5").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_date_in_converts_instants_to_zone() {
        let berlin = FixedOffset::east_opt(3600).unwrap();
        let new_york = FixedOffset::west_opt(5 * 3600).unwrap();

        assert_eq!(
            parse_date_in("2024-02-29T23:30:00.000Z", &berlin).unwrap(),
            date(2024, 3, 1)
        );
        assert_eq!(
            parse_date_in("2024-02-29T23:30:00.000Z", &Utc).unwrap(),
            date(2024, 2, 29)
        );
        assert_eq!(
            parse_date_in("2024-03-01T03:00:00Z", &new_york).unwrap(),
            date(2024, 2, 29)
        );
        assert_eq!(
            parse_date_in("2024-03-05T23:30:00-05:00", &Utc).unwrap(),
            date(2024, 3, 6)
        );
    }

    #[test]
    fn test_parse_date_in_keeps_plain_dates_local() {
        let berlin = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(parse_date_in("2024-02-29", &berlin).unwrap(), date(2024, 2, 29));
        assert_eq!(
            parse_date_in("2024-02-29T23:30:00", &berlin).unwrap(),
            date(2024, 2, 29)
        );
        assert!(parse_date_in("2024-02-30T00:00:00Z", &berlin).is_err());
    }

    #[test]
    fn test_record_dates_read_on_caller_calendar() {
        let berlin = FixedOffset::east_opt(3600).unwrap();
        let stored = record(
            "1",
            "month",
            "2024-02-29T23:30:00.000Z",
            Some("2024-05-31T22:30:00.000Z"),
        );

        let sub = Subscription::from_record(stored.clone(), &berlin).unwrap();
        assert_eq!(sub.start_date, date(2024, 3, 1));
        assert_eq!(sub.end_date, Some(date(2024, 5, 31)));
        assert_eq!(
            sub.next_occurrence(EvaluationClock::on(date(2024, 3, 10))),
            NextOccurrence::On(date(2024, 4, 1))
        );

        let sub = Subscription::from_record(stored, &Utc).unwrap();
        assert_eq!(sub.start_date, date(2024, 2, 29));
        assert_eq!(
            sub.next_occurrence(EvaluationClock::on(date(2024, 3, 10))),
            NextOccurrence::On(date(2024, 3, 29))
        );
    }

    #[test]
    fn test_record_accepts_snake_case_columns() {
        let json = r#"{
            "id": "7",
            "name": "Spotify",
            "price": 12,
            "currency": "USD",
            "billing_cycle": "year",
            "start_date": "2025-01-01",
            "end_date": null,
            "is_active": false
        }"#;
        let record: SubscriptionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.billing_cycle, "year");
        assert!(!record.is_active);
        let sub = Subscription::from_record(record, &Utc).unwrap();
        assert_eq!(sub.end_date, None);
    }

    #[test]
    fn test_record_camel_case_defaults() {
        let json = r#"{
            "id": "1",
            "name": "Netflix",
            "price": 10,
            "currency": "EUR",
            "billingCycle": "month",
            "startDate": "2024-01-01"
        }"#;
        let record: SubscriptionRecord = serde_json::from_str(json).unwrap();
        assert!(record.is_active);
        assert_eq!(record.end_date, None);
    }

    // ── schedule tests ──────────────────────────────────────────────────

    #[test]
    fn test_schedule_bundles_results() {
        let sub = subscription("1", "month", "2024-01-01", None);
        let schedule = sub.schedule(EvaluationClock::on(date(2024, 1, 10)));
        assert_eq!(schedule.next, NextOccurrence::On(date(2024, 2, 1)));
        assert_eq!(schedule.label, "in 22 days");
        assert_eq!(schedule.days_until, Some(22));
        assert_eq!(schedule.urgency, Some(Urgency::Normal));
        assert_eq!(schedule.history, vec![date(2024, 1, 1)]);
        assert_eq!(schedule.payment_count, 1);
        assert_eq!(schedule.total_paid(sub.price), 10.0);
    }

    #[test]
    fn test_schedule_for_ended_subscription() {
        let sub = subscription("1", "week", "2024-01-01", Some("2024-01-22"));
        let schedule = sub.schedule(EvaluationClock::on(date(2024, 2, 1)));
        assert_eq!(schedule.next, NextOccurrence::Ended);
        assert_eq!(schedule.label, "Ended");
        assert_eq!(schedule.urgency, None);
        assert_eq!(schedule.payment_count, 4);
        assert_eq!(schedule.total_paid(2.5), 10.0);
    }

    #[test]
    fn test_sort_puts_ended_last() {
        let clock = EvaluationClock::on(date(2024, 3, 10));
        let mut subs = vec![
            subscription("ended-a", "week", "2024-01-01", Some("2024-01-22")),
            subscription("yearly", "year", "2023-06-01", None),
            subscription("ended-b", "month", "2023-01-01", Some("2023-06-01")),
            subscription("weekly", "week", "2024-03-04", None),
            subscription("monthly", "month", "2024-01-15", None),
        ];
        sort_by_next_occurrence(&mut subs, clock);
        let ids: Vec<&str> = subs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["weekly", "monthly", "yearly", "ended-a", "ended-b"]);
    }

    #[test]
    fn test_sort_keeps_input_order_for_equal_dates() {
        let clock = EvaluationClock::on(date(2024, 3, 10));
        let mut subs = vec![
            subscription("ended-c", "year", "2020-01-01", Some("2021-01-01")),
            subscription("monthly-b", "month", "2024-02-11", None),
            subscription("ended-a", "week", "2024-01-01", Some("2024-01-22")),
            subscription("monthly-a", "month", "2023-12-11", None),
        ];
        sort_by_next_occurrence(&mut subs, clock);
        let ids: Vec<&str> = subs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["monthly-b", "monthly-a", "ended-c", "ended-a"]);
    }
}
