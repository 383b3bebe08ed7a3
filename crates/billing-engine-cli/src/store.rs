//! File-backed stand-in for the subscription store.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use billing_engine::{ScheduleError, Subscription, SubscriptionRecord};
use chrono::{Local, TimeZone};
use chrono_tz::Tz;

/// A stored record after boundary validation.
#[derive(Debug)]
pub enum Entry {
    Ready(Subscription),
    /// The record could not be scheduled; rendered, never fatal.
    Invalid { id: String, error: ScheduleError },
}

impl Entry {
    pub fn id(&self) -> &str {
        match self {
            Entry::Ready(sub) => &sub.id,
            Entry::Invalid { id, .. } => id,
        }
    }
}

/// Read every record from a JSON array file.
pub fn load_records(path: &Path) -> Result<Vec<SubscriptionRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read subscriptions from {}", path.display()))?;
    let records: Vec<SubscriptionRecord> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse subscriptions in {}", path.display()))?;
    tracing::debug!(count = records.len(), path = %path.display(), "loaded subscription records");
    Ok(records)
}

/// Validate each record independently, reading stored instants in `tz`.
pub fn validate<Z: TimeZone>(records: Vec<SubscriptionRecord>, tz: &Z) -> Vec<Entry> {
    records
        .into_iter()
        .map(|record| {
            let id = record.id.clone();
            match Subscription::from_record(record, tz) {
                Ok(sub) => Entry::Ready(sub),
                Err(error) => {
                    tracing::warn!(%id, %error, "couldn't load schedule");
                    Entry::Invalid { id, error }
                }
            }
        })
        .collect()
}

/// Load and validate on the calendar of `timezone`, or the host zone.
pub fn load(path: &Path, timezone: Option<Tz>) -> Result<Vec<Entry>> {
    let records = load_records(path)?;
    Ok(match timezone {
        Some(tz) => validate(records, &tz),
        None => validate(records, &Local),
    })
}
