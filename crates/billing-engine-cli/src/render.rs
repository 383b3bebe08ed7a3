//! Text rendering for list rows, detail views and history rows.

use billing_engine::{
    describe_cycle, format_amount, format_local_date, BillingCycle, EvaluationClock,
    FormatOptions, NextOccurrence, ScheduleError, Subscription, Urgency,
};
use chrono::NaiveDate;
use serde_json::{json, Value};

pub fn invalid_row(id: &str, error: &ScheduleError) -> String {
    format!("{}: couldn't load schedule ({})", id, error)
}

fn badge(urgency: Option<Urgency>) -> &'static str {
    match urgency {
        Some(Urgency::Due) => " [due]",
        Some(Urgency::Soon) => " [soon]",
        Some(Urgency::Normal) | None => "",
    }
}

/// One list line: name, amount per cycle, and next payment or end date.
pub fn list_row(sub: &Subscription, clock: EvaluationClock, options: &FormatOptions) -> String {
    let amount = format!(
        "{} / {}",
        format_amount(&sub.currency, sub.price),
        sub.billing_cycle
    );
    let next = sub.next_occurrence(clock);
    let status = match (next, sub.end_date) {
        (NextOccurrence::On(date), _) => format!(
            "Next payment: {} ({}){}",
            format_local_date(date, options),
            billing_engine::relative_label(next, clock),
            badge(billing_engine::urgency(next, clock))
        ),
        (NextOccurrence::Ended, Some(end)) => {
            format!("Ended at: {}", format_local_date(end, options))
        }
        (NextOccurrence::Ended, None) => "Ended".to_string(),
    };
    format!("{:<24} {:>18}  {}", sub.name, amount, status)
}

/// Detail view with the payment history, most recent first.
pub fn detail(sub: &Subscription, clock: EvaluationClock, options: &FormatOptions) -> String {
    let schedule = sub.schedule(clock);
    let mut lines = vec![sub.name.clone()];
    if let Some(description) = &sub.description {
        lines.push(description.clone());
    }
    lines.push(String::new());

    lines.push(format!("Billing Cycle: {}", describe_cycle(sub.billing_cycle)));
    lines.push(match schedule.next {
        NextOccurrence::On(date) => format!(
            "Next Payment: {} ({})",
            format_local_date(date, options),
            schedule.label
        ),
        NextOccurrence::Ended => "Next Payment: Ended".to_string(),
    });
    lines.push(format!(
        "Amount: {}",
        format_amount(&sub.currency, sub.price)
    ));
    if let Some(category) = &sub.category {
        lines.push(format!("Category: {}", category));
    }
    lines.push(format!(
        "Start Date: {}",
        format_local_date(sub.start_date, options)
    ));
    if let Some(end) = sub.end_date {
        lines.push(format!("End Date: {}", format_local_date(end, options)));
    }

    lines.push(String::new());
    lines.push(format!(
        "Payments: Total ({} payments) {}",
        schedule.payment_count,
        format_amount(&sub.currency, schedule.total_paid(sub.price))
    ));
    if schedule.history.is_empty() {
        lines.push("Previous payments will appear here".to_string());
    }
    for date in &schedule.history {
        lines.push(format!(
            "  {:<20} {}",
            format_local_date(*date, options),
            format_amount(&sub.currency, sub.price)
        ));
    }

    lines.join("\n")
}

pub fn detail_json(sub: &Subscription, clock: EvaluationClock) -> Value {
    let schedule = sub.schedule(clock);
    let total = schedule.total_paid(sub.price);
    json!({
        "subscription": sub,
        "schedule": schedule,
        "totalPaid": total,
    })
}

pub fn list_json(sub: &Subscription, clock: EvaluationClock) -> Value {
    let next = sub.next_occurrence(clock);
    json!({
        "subscription": sub,
        "next": next,
        "label": billing_engine::relative_label(next, clock),
        "urgency": billing_engine::urgency(next, clock),
    })
}

pub fn invalid_json(id: &str, error: &ScheduleError) -> Value {
    json!({ "id": id, "error": error.to_string() })
}

pub fn next_text(next: NextOccurrence, clock: EvaluationClock, options: &FormatOptions) -> String {
    match next {
        NextOccurrence::On(date) => format!(
            "{} ({})",
            format_local_date(date, options),
            billing_engine::relative_label(next, clock)
        ),
        NextOccurrence::Ended => "Ended".to_string(),
    }
}

pub fn dates_text(dates: &[NaiveDate], options: &FormatOptions) -> String {
    dates
        .iter()
        .map(|date| format_local_date(*date, options))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn advance_json(date: NaiveDate, cycle: BillingCycle, count: i64, result: NaiveDate) -> Value {
    json!({ "anchor": date, "cycle": cycle, "count": count, "date": result })
}
